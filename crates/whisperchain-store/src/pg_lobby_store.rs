//! PostgreSQL implementation of the lobby snapshot store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use whisperchain_core::error::DomainError;
use whisperchain_core::store::{NEW_AGGREGATE_VERSION, SnapshotStore, Versioned};
use whisperchain_lobby::domain::aggregates::Lobby;

use crate::infra;

/// PostgreSQL-backed lobby store.
#[derive(Debug, Clone)]
pub struct PgLobbyStore {
    pool: PgPool,
}

impl PgLobbyStore {
    /// Creates a new `PgLobbyStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_version(&self, id: Uuid) -> Result<i64, DomainError> {
        let row = sqlx::query("SELECT version FROM lobbies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infra("lobby version lookup failed", e))?;
        match row {
            Some(row) => row
                .try_get("version")
                .map_err(|e| infra("lobby version column malformed", e)),
            None => Ok(NEW_AGGREGATE_VERSION),
        }
    }
}

fn decode_lobby(row: &sqlx::postgres::PgRow) -> Result<Versioned<Lobby>, DomainError> {
    let snapshot: serde_json::Value = row
        .try_get("snapshot")
        .map_err(|e| infra("lobby snapshot column malformed", e))?;
    let version: i64 = row
        .try_get("version")
        .map_err(|e| infra("lobby version column malformed", e))?;
    let lobby: Lobby = serde_json::from_value(snapshot)
        .map_err(|e| infra("lobby snapshot deserialization failed", e))?;
    Ok(Versioned {
        value: lobby,
        version,
    })
}

#[async_trait]
impl SnapshotStore<Lobby> for PgLobbyStore {
    async fn load(&self, id: Uuid) -> Result<Option<Versioned<Lobby>>, DomainError> {
        let row = sqlx::query("SELECT snapshot, version FROM lobbies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infra("lobby load failed", e))?;
        row.as_ref().map(decode_lobby).transpose()
    }

    async fn save(
        &self,
        id: Uuid,
        expected_version: i64,
        lobby: &Lobby,
    ) -> Result<i64, DomainError> {
        let snapshot = serde_json::to_value(lobby)
            .map_err(|e| infra("lobby snapshot serialization failed", e))?;

        if expected_version == NEW_AGGREGATE_VERSION {
            let result = sqlx::query(
                "INSERT INTO lobbies (id, snapshot, version)
                 VALUES ($1, $2, 1)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(id)
            .bind(&snapshot)
            .execute(&self.pool)
            .await
            .map_err(|e| infra("lobby insert failed", e))?;

            if result.rows_affected() == 0 {
                let actual = self.current_version(id).await?;
                return Err(DomainError::ConcurrencyConflict {
                    aggregate_id: id,
                    expected: expected_version,
                    actual,
                });
            }
            return Ok(1);
        }

        let row = sqlx::query(
            "UPDATE lobbies
             SET snapshot = $2, version = version + 1, updated_at = NOW()
             WHERE id = $1 AND version = $3
             RETURNING version",
        )
        .bind(id)
        .bind(&snapshot)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infra("lobby update failed", e))?;

        match row {
            Some(row) => row
                .try_get("version")
                .map_err(|e| infra("lobby version column malformed", e)),
            None => {
                let actual = self.current_version(id).await?;
                Err(DomainError::ConcurrencyConflict {
                    aggregate_id: id,
                    expected: expected_version,
                    actual,
                })
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM lobbies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| infra("lobby delete failed", e))?;
        Ok(())
    }
}
