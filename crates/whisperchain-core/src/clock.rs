//! Time source abstraction.

use chrono::{DateTime, Utc};

/// Source of timestamps for new turns and aggregates.
///
/// Handlers take `&dyn Clock` so tests can pin time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the operating system.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
