//! Command handlers for the Game Play context.
//!
//! Application-level functions that orchestrate domain logic: load the
//! latest snapshot, apply the pure transform, persist the result under the
//! version that was loaded. A concurrent writer surfaces as
//! `DomainError::ConcurrencyConflict`; handlers never retry internally.

use tracing::warn;
use uuid::Uuid;
use whisperchain_core::clock::Clock;
use whisperchain_core::error::DomainError;
use whisperchain_core::store::{NEW_AGGREGATE_VERSION, SnapshotStore, Versioned};

use crate::application::ports::{GameStore, ImageGenerator, ImageHost};
use crate::domain::aggregates::{Game, Turn, TurnKind};
use crate::domain::commands::{CreateGame, DeleteGame, JoinGame, RequestImage, SubmitPrompt};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct GameCommandResult {
    /// The persisted snapshot.
    pub game: Game,
    /// The version under which it was persisted.
    pub version: i64,
}

pub(crate) async fn load_game(
    store: &dyn GameStore,
    game_id: Uuid,
) -> Result<Versioned<Game>, DomainError> {
    store
        .load(game_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(game_id))
}

/// Handles `CreateGame`: snapshots the roster, allocates one empty round per
/// player, and persists the new aggregate.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty or duplicated roster, or
/// a store error.
pub async fn handle_create_game(
    command: &CreateGame,
    clock: &dyn Clock,
    store: &dyn GameStore,
) -> Result<GameCommandResult, DomainError> {
    let game = Game::new(Uuid::new_v4(), command.players.clone(), clock)?;
    let version = store.save(game.id, NEW_AGGREGATE_VERSION, &game).await?;
    Ok(GameCommandResult { game, version })
}

/// Handles `JoinGame`: adds the player to the roster with a fresh round
/// slot. A no-op for players already on the roster.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown game and
/// `DomainError::InvalidState` once play has begun.
pub async fn handle_join_game(
    command: &JoinGame,
    store: &dyn GameStore,
) -> Result<GameCommandResult, DomainError> {
    let Versioned {
        value: game,
        version,
    } = load_game(store, command.game_id).await?;
    let game = game.with_player(command.player.clone())?;
    let version = store.save(game.id, version, &game).await?;
    Ok(GameCommandResult { game, version })
}

/// Handles `SubmitPrompt`: appends a prompt turn to the round the rotation
/// derives for the author.
///
/// # Errors
///
/// Returns `DomainError::Validation` for blank text or an author not on the
/// roster, and `DomainError::InvalidState` for a finished game or a round
/// that already has an open prompt.
pub async fn handle_submit_prompt(
    command: &SubmitPrompt,
    clock: &dyn Clock,
    store: &dyn GameStore,
) -> Result<GameCommandResult, DomainError> {
    let text = command.text.trim();
    if text.is_empty() {
        return Err(DomainError::Validation("prompt must not be empty".into()));
    }
    let Versioned {
        value: game,
        version,
    } = load_game(store, command.game_id).await?;
    let game = game.with_turn(Turn::new(command.author, TurnKind::Prompt, text, clock))?;
    let version = store.save(game.id, version, &game).await?;
    Ok(GameCommandResult { game, version })
}

/// Handles `RequestImage`: looks up the author's open prompt, asks the
/// generator to illustrate it, re-publishes the result on the image host,
/// and appends the image turn.
///
/// Hosting is best-effort: a failed upload falls back to the generator's own
/// URL rather than losing the turn. Generator failures propagate.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if the author's round has no open
/// prompt, and `DomainError::Infrastructure` if image generation fails.
pub async fn handle_request_image(
    command: &RequestImage,
    clock: &dyn Clock,
    store: &dyn GameStore,
    generator: &dyn ImageGenerator,
    host: &dyn ImageHost,
) -> Result<GameCommandResult, DomainError> {
    let Versioned {
        value: game,
        version,
    } = load_game(store, command.game_id).await?;
    let prompt = game.most_recent_prompt_for(command.author)?;

    let generated_url = generator.generate(&prompt.content).await?;
    let image_url = match host.publish(&generated_url).await {
        Ok(url) => url,
        Err(err) => {
            warn!(game_id = %command.game_id, error = %err,
                "image host rejected upload, falling back to generated url");
            generated_url
        }
    };

    let game = game.with_turn(Turn::new(command.author, TurnKind::Image, image_url, clock))?;
    let version = store.save(game.id, version, &game).await?;
    Ok(GameCommandResult { game, version })
}

/// Handles `DeleteGame`: removes the aggregate from the store.
///
/// # Errors
///
/// Returns `DomainError::AccessDenied` when the requester is not on the
/// roster.
pub async fn handle_delete_game(
    command: &DeleteGame,
    store: &dyn GameStore,
) -> Result<(), DomainError> {
    let Versioned { value: game, .. } = load_game(store, command.game_id).await?;
    if !game.players.iter().any(|p| p.id == command.requested_by) {
        return Err(DomainError::AccessDenied(
            "only a participant may delete this game".into(),
        ));
    }
    store.delete(command.game_id).await
}
