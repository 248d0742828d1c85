//! Commands for the Game Play context.

use uuid::Uuid;
use whisperchain_core::command::Command;
use whisperchain_core::player::Player;

/// Command to create a game from a closed lobby's roster.
#[derive(Debug, Clone)]
pub struct CreateGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Roster snapshot in join order.
    pub players: Vec<Player>,
}

impl Command for CreateGame {
    fn command_type(&self) -> &'static str {
        "game.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to add a player to a game that has not started playing yet.
#[derive(Debug, Clone)]
pub struct JoinGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game to join.
    pub game_id: Uuid,
    /// The joining player.
    pub player: Player,
}

impl Command for JoinGame {
    fn command_type(&self) -> &'static str {
        "game.join"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to append a prompt turn to the author's current round.
#[derive(Debug, Clone)]
pub struct SubmitPrompt {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target game.
    pub game_id: Uuid,
    /// Roster id of the prompt author.
    pub author: Uuid,
    /// Prompt text.
    pub text: String,
}

impl Command for SubmitPrompt {
    fn command_type(&self) -> &'static str {
        "game.submit_prompt"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to illustrate the author's open prompt with a generated image.
#[derive(Debug, Clone)]
pub struct RequestImage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target game.
    pub game_id: Uuid,
    /// Roster id of the player requesting the image.
    pub author: Uuid,
}

impl Command for RequestImage {
    fn command_type(&self) -> &'static str {
        "game.request_image"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a game.
#[derive(Debug, Clone)]
pub struct DeleteGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game to delete.
    pub game_id: Uuid,
    /// Roster id of the requesting player.
    pub requested_by: Uuid,
}

impl Command for DeleteGame {
    fn command_type(&self) -> &'static str {
        "game.delete"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
