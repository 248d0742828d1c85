//! Query handlers for the Game Play context.
//!
//! Read-only projections over stored game snapshots. The per-player view
//! resolves the round through the same offset derivation the write path
//! uses, so a player is always shown the round their next turn lands in.

use serde::Serialize;
use uuid::Uuid;
use whisperchain_core::error::DomainError;
use whisperchain_core::store::Versioned;

use crate::application::command_handlers::load_game;
use crate::application::ports::GameStore;
use crate::domain::aggregates::{Game, GamePhase, Turn};

/// What a player currently sees of a game: the relay chain they are
/// extending and the coarse game phase.
#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    /// The game this view belongs to.
    pub game_id: Uuid,
    /// Turns of the player's current round, in submission order.
    pub turns: Vec<Turn>,
    /// Phase as of the last append.
    pub phase: GamePhase,
}

/// Projects a player's current round.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown game and
/// `DomainError::Validation` if the player is not on the roster.
pub async fn get_round_for_player(
    game_id: Uuid,
    player_id: Uuid,
    store: &dyn GameStore,
) -> Result<RoundView, DomainError> {
    let Versioned { value: game, .. } = load_game(store, game_id).await?;
    let round = game.round_for_player(player_id)?;
    Ok(RoundView {
        game_id,
        turns: round.turns,
        phase: game.phase,
    })
}

/// The open prompt a player's next image should illustrate.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if the player's round is empty or
/// already illustrated for the current cycle.
pub async fn get_most_recent_prompt(
    game_id: Uuid,
    player_id: Uuid,
    store: &dyn GameStore,
) -> Result<Turn, DomainError> {
    let Versioned { value: game, .. } = load_game(store, game_id).await?;
    game.most_recent_prompt_for(player_id)
}

/// The full aggregate, for finished-game replay.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown game.
pub async fn get_game_by_id(game_id: Uuid, store: &dyn GameStore) -> Result<Game, DomainError> {
    Ok(load_game(store, game_id).await?.value)
}

/// All games whose roster contains the given player.
///
/// # Errors
///
/// Propagates store failures.
pub async fn list_games_for_player(
    player_id: Uuid,
    store: &dyn GameStore,
) -> Result<Vec<Game>, DomainError> {
    let games = store.list_for_player(player_id).await?;
    Ok(games.into_iter().map(|v| v.value).collect())
}
