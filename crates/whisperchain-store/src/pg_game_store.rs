//! PostgreSQL implementation of the `GameStore` port.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use whisperchain_core::error::DomainError;
use whisperchain_core::store::{NEW_AGGREGATE_VERSION, SnapshotStore, Versioned};
use whisperchain_game::application::ports::GameStore;
use whisperchain_game::domain::aggregates::Game;

use crate::infra;

/// PostgreSQL-backed game store. The roster is denormalized into a
/// `player_ids` array column so `list_for_player` stays an index scan.
#[derive(Debug, Clone)]
pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    /// Creates a new `PgGameStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_version(&self, id: Uuid) -> Result<i64, DomainError> {
        let row = sqlx::query("SELECT version FROM games WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infra("game version lookup failed", e))?;
        match row {
            Some(row) => row
                .try_get("version")
                .map_err(|e| infra("game version column malformed", e)),
            None => Ok(NEW_AGGREGATE_VERSION),
        }
    }
}

fn decode_game(row: &sqlx::postgres::PgRow) -> Result<Versioned<Game>, DomainError> {
    let snapshot: serde_json::Value = row
        .try_get("snapshot")
        .map_err(|e| infra("game snapshot column malformed", e))?;
    let version: i64 = row
        .try_get("version")
        .map_err(|e| infra("game version column malformed", e))?;
    let game: Game = serde_json::from_value(snapshot)
        .map_err(|e| infra("game snapshot deserialization failed", e))?;
    Ok(Versioned {
        value: game,
        version,
    })
}

pub(crate) fn roster_ids(game: &Game) -> Vec<Uuid> {
    game.players.iter().map(|p| p.id).collect()
}

#[async_trait]
impl SnapshotStore<Game> for PgGameStore {
    async fn load(&self, id: Uuid) -> Result<Option<Versioned<Game>>, DomainError> {
        let row = sqlx::query("SELECT snapshot, version FROM games WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infra("game load failed", e))?;
        row.as_ref().map(decode_game).transpose()
    }

    async fn save(&self, id: Uuid, expected_version: i64, game: &Game) -> Result<i64, DomainError> {
        let snapshot = serde_json::to_value(game)
            .map_err(|e| infra("game snapshot serialization failed", e))?;
        let player_ids = roster_ids(game);

        if expected_version == NEW_AGGREGATE_VERSION {
            let result = sqlx::query(
                "INSERT INTO games (id, snapshot, player_ids, version)
                 VALUES ($1, $2, $3, 1)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(id)
            .bind(&snapshot)
            .bind(&player_ids)
            .execute(&self.pool)
            .await
            .map_err(|e| infra("game insert failed", e))?;

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
            "UPDATE games
             SET snapshot = $2, player_ids = $3, version = version + 1, updated_at = NOW()
             WHERE id = $1 AND version = $4
             RETURNING version",
        )
        .bind(id)
        .bind(&snapshot)
        .bind(&player_ids)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infra("game update failed", e))?;

        match row {
            Some(row) => row
                .try_get("version")
                .map_err(|e| infra("game version column malformed", e)),
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
        sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| infra("game delete failed", e))?;
        Ok(())
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn list_for_player(
        &self,
        player_id: Uuid,
    ) -> Result<Vec<Versioned<Game>>, DomainError> {
        let rows = sqlx::query(
            "SELECT snapshot, version FROM games
             WHERE $1 = ANY(player_ids)
             ORDER BY created_at DESC",
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infra("game listing failed", e))?;
        rows.iter().map(decode_game).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whisperchain_core::clock::SystemClock;
    use whisperchain_core::player::Player;

    #[test]
    fn test_roster_ids_preserves_join_order() {
        // Arrange
        let players = vec![
            Player::new(Uuid::new_v4(), "Alice"),
            Player::new(Uuid::new_v4(), "Bob"),
        ];
        let expected: Vec<Uuid> = players.iter().map(|p| p.id).collect();
        let game = Game::new(Uuid::new_v4(), players, &SystemClock).unwrap();

        // Act / Assert
        assert_eq!(roster_ids(&game), expected);
    }
}
