//! Commands for the Lobby context.

use uuid::Uuid;
use whisperchain_core::command::Command;
use whisperchain_core::player::Player;

/// Command to open a new lobby.
#[derive(Debug, Clone)]
pub struct CreateLobby {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The opening player, who becomes the host.
    pub host: Player,
}

impl Command for CreateLobby {
    fn command_type(&self) -> &'static str {
        "lobby.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to join an open lobby.
#[derive(Debug, Clone)]
pub struct JoinLobby {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The lobby to join.
    pub lobby_id: Uuid,
    /// The joining player.
    pub player: Player,
}

impl Command for JoinLobby {
    fn command_type(&self) -> &'static str {
        "lobby.join"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to leave an open lobby.
#[derive(Debug, Clone)]
pub struct LeaveLobby {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The lobby to leave.
    pub lobby_id: Uuid,
    /// The leaving player.
    pub player_id: Uuid,
}

impl Command for LeaveLobby {
    fn command_type(&self) -> &'static str {
        "lobby.leave"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a lobby.
#[derive(Debug, Clone)]
pub struct DeleteLobby {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The lobby to delete.
    pub lobby_id: Uuid,
    /// The requesting player; must be the host.
    pub requested_by: Uuid,
}

impl Command for DeleteLobby {
    fn command_type(&self) -> &'static str {
        "lobby.delete"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command recording that a game was created from this lobby's roster.
#[derive(Debug, Clone)]
pub struct MarkGameStarted {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The lobby whose roster seeded the game.
    pub lobby_id: Uuid,
    /// The created game.
    pub game_id: Uuid,
}

impl Command for MarkGameStarted {
    fn command_type(&self) -> &'static str {
        "lobby.mark_game_started"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
