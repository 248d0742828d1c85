//! Aggregate root for the Lobby context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use whisperchain_core::clock::Clock;
use whisperchain_core::error::DomainError;
use whisperchain_core::player::Player;

/// The aggregate root for a lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lobby {
    /// Aggregate identifier.
    pub id: Uuid,
    /// The player who opened the lobby. Always on the roster.
    pub host: Player,
    /// Roster in join order, host first, unique by player id.
    pub players: Vec<Player>,
    /// Set once a game has been created from this lobby.
    pub game_id: Option<Uuid>,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
}

impl Lobby {
    /// Opens a lobby with the host as its first member.
    #[must_use]
    pub fn new(id: Uuid, host: Player, clock: &dyn Clock) -> Self {
        let players = vec![host.clone()];
        Self {
            id,
            host,
            players,
            game_id: None,
            created_at: clock.now(),
        }
    }

    /// Whether a game has been created from this lobby.
    #[must_use]
    pub fn is_game_started(&self) -> bool {
        self.game_id.is_some()
    }

    /// Adds a player to the roster. Idempotent for existing members.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` once the game has started.
    pub fn with_player(mut self, player: Player) -> Result<Self, DomainError> {
        if self.players.contains(&player) {
            return Ok(self);
        }
        if self.is_game_started() {
            return Err(DomainError::InvalidState(
                "the lobby's game has already started".into(),
            ));
        }
        self.players.push(player);
        Ok(self)
    }

    /// Removes a player from the roster. A no-op for non-members.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AccessDenied` when the host tries to leave and
    /// `DomainError::InvalidState` once the game has started.
    pub fn without_player(mut self, player_id: Uuid) -> Result<Self, DomainError> {
        if player_id == self.host.id {
            return Err(DomainError::AccessDenied(
                "the host cannot leave the lobby".into(),
            ));
        }
        if self.is_game_started() {
            return Err(DomainError::InvalidState(
                "the lobby's game has already started".into(),
            ));
        }
        self.players.retain(|p| p.id != player_id);
        Ok(self)
    }

    /// Records the game created from this lobby's roster.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if a game has already started.
    pub fn with_game(mut self, game_id: Uuid) -> Result<Self, DomainError> {
        if self.is_game_started() {
            return Err(DomainError::InvalidState(
                "the lobby's game has already started".into(),
            ));
        }
        self.game_id = Some(game_id);
        Ok(self)
    }
}
