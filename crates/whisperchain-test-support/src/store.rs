//! Test stores — in-memory and failing `SnapshotStore` implementations.
//!
//! `InMemoryStore` is the reference implementation of the snapshot CAS
//! contract, so whole HTTP flows can be tested without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;
use whisperchain_core::error::DomainError;
use whisperchain_core::store::{NEW_AGGREGATE_VERSION, SnapshotStore, Versioned};
use whisperchain_game::application::ports::GameStore;
use whisperchain_game::domain::aggregates::Game;

/// An in-memory snapshot store with the same optimistic-concurrency
/// behavior as the production store.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    items: Mutex<HashMap<Uuid, (T, i64)>>,
}

impl<T> InMemoryStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> SnapshotStore<T> for InMemoryStore<T> {
    async fn load(&self, id: Uuid) -> Result<Option<Versioned<T>>, DomainError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .get(&id)
            .map(|(value, version)| Versioned {
                value: value.clone(),
                version: *version,
            }))
    }

    async fn save(&self, id: Uuid, expected_version: i64, value: &T) -> Result<i64, DomainError> {
        let mut items = self.items.lock().unwrap();
        let actual = items
            .get(&id)
            .map_or(NEW_AGGREGATE_VERSION, |(_, version)| *version);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id: id,
                expected: expected_version,
                actual,
            });
        }
        let next = actual + 1;
        items.insert(id, (value.clone(), next));
        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.items.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[async_trait]
impl GameStore for InMemoryStore<Game> {
    async fn list_for_player(
        &self,
        player_id: Uuid,
    ) -> Result<Vec<Versioned<Game>>, DomainError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|(game, _)| game.players.iter().any(|p| p.id == player_id))
            .map(|(game, version)| Versioned {
                value: game.clone(),
                version: *version,
            })
            .collect())
    }
}

/// A snapshot store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl<T: Send + Sync> SnapshotStore<T> for FailingStore {
    async fn load(&self, _id: Uuid) -> Result<Option<Versioned<T>>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save(
        &self,
        _id: Uuid,
        _expected_version: i64,
        _value: &T,
    ) -> Result<i64, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

#[async_trait]
impl GameStore for FailingStore {
    async fn list_for_player(
        &self,
        _player_id: Uuid,
    ) -> Result<Vec<Versioned<Game>>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_rejects_stale_version() {
        // Arrange
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        store.save(id, NEW_AGGREGATE_VERSION, &"first").await.unwrap();

        // Act — a writer that read nothing tries to insert again.
        let result = store.save(id, NEW_AGGREGATE_VERSION, &"second").await;

        // Assert
        match result.unwrap_err() {
            DomainError::ConcurrencyConflict {
                aggregate_id,
                expected,
                actual,
            } => {
                assert_eq!(aggregate_id, id);
                assert_eq!(expected, 0);
                assert_eq!(actual, 1);
            }
            other => panic!("expected ConcurrencyConflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_save_advances_version_on_match() {
        // Arrange
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        let v1 = store.save(id, NEW_AGGREGATE_VERSION, &"first").await.unwrap();

        // Act
        let v2 = store.save(id, v1, &"second").await.unwrap();

        // Assert
        assert_eq!((v1, v2), (1, 2));
        let loaded = store.load(id).await.unwrap().unwrap();
        assert_eq!(loaded.value, "second");
        assert_eq!(loaded.version, 2);
    }

    #[tokio::test]
    async fn test_delete_is_a_noop_for_missing_aggregates() {
        let store = InMemoryStore::<&str>::new();
        store.delete(Uuid::new_v4()).await.unwrap();
    }
}
