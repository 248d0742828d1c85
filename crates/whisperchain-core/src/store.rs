//! Snapshot store abstraction.
//!
//! Aggregates are persisted as whole snapshots guarded by a version counter.
//! Every write presents the version it read; a mismatch is a concurrency
//! conflict that the caller resolves by reloading, not by the store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;

/// Version presented when saving an aggregate that does not exist yet.
pub const NEW_AGGREGATE_VERSION: i64 = 0;

/// A snapshot paired with the version under which it was loaded.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    /// The aggregate snapshot.
    pub value: T,
    /// Monotonically increasing version, starting at 1 for the first save.
    pub version: i64,
}

/// Repository trait for loading and saving aggregate snapshots with
/// optimistic concurrency.
#[async_trait]
pub trait SnapshotStore<T: Send + Sync>: Send + Sync {
    /// Load the latest snapshot for an aggregate, or `None` if it does not
    /// exist.
    async fn load(&self, id: Uuid) -> Result<Option<Versioned<T>>, DomainError>;

    /// Persist a new snapshot and return its version.
    ///
    /// `expected_version` is the version the caller loaded
    /// ([`NEW_AGGREGATE_VERSION`] for a first save). A mismatch with the
    /// stored version fails with [`DomainError::ConcurrencyConflict`].
    async fn save(&self, id: Uuid, expected_version: i64, value: &T) -> Result<i64, DomainError>;

    /// Delete an aggregate. Deleting a missing aggregate is a no-op.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
