//! Deterministic `Clock` for tests.

use chrono::{DateTime, Utc};
use whisperchain_core::clock::Clock;

/// A clock pinned to one instant; every `now()` call returns it.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
