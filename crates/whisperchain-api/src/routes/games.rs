//! Routes for the Game Play bounded context.
//!
//! `POST /` is the only cross-context handler: it creates a game from a
//! lobby's roster, then freezes the lobby. Everything else delegates to a
//! single game command or query.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use whisperchain_core::error::DomainError;
use whisperchain_game::application::command_handlers::{self, GameCommandResult};
use whisperchain_game::application::query_handlers::{self, RoundView};
use whisperchain_game::domain::aggregates::Game;
use whisperchain_game::domain::commands;
use whisperchain_lobby::application::command_handlers as lobby_command_handlers;
use whisperchain_lobby::application::query_handlers as lobby_query_handlers;
use whisperchain_lobby::domain::commands as lobby_commands;

use crate::error::ApiError;
use crate::extract::CurrentPlayer;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// The lobby whose roster seeds the game.
    pub lobby_id: Uuid,
}

/// Request body for POST /{game_id}/prompts.
#[derive(Debug, Deserialize)]
pub struct SubmitPromptRequest {
    /// Prompt text.
    pub prompt: String,
}

fn round_view_for(result: &GameCommandResult, player_id: Uuid) -> Result<RoundView, ApiError> {
    let round = result.game.round_for_player(player_id)?;
    Ok(RoundView {
        game_id: result.game.id,
        turns: round.turns,
        phase: result.game.phase,
    })
}

/// POST / — create a game from a lobby's roster (host only).
#[instrument(skip(state, player, request), fields(lobby_id = %request.lobby_id, player_id = %player.0.id))]
async fn create_game(
    State(state): State<AppState>,
    player: CurrentPlayer,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<RoundView>), ApiError> {
    let lobby = lobby_query_handlers::get_lobby_by_id(request.lobby_id, &*state.lobby_store).await?;
    if lobby.host.id != player.0.id {
        return Err(ApiError(DomainError::AccessDenied(
            "only the host may start the game".into(),
        )));
    }
    if lobby.is_game_started() {
        return Err(ApiError(DomainError::InvalidState(
            "the lobby's game has already started".into(),
        )));
    }

    let command = commands::CreateGame {
        correlation_id: Uuid::new_v4(),
        players: lobby.players.clone(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_game command");

    let result =
        command_handlers::handle_create_game(&command, state.clock.as_ref(), &*state.game_store)
            .await?;

    // The game is durable at this point; freezing the lobby is bookkeeping.
    lobby_command_handlers::handle_mark_game_started(
        &lobby_commands::MarkGameStarted {
            correlation_id: command.correlation_id,
            lobby_id: lobby.id,
            game_id: result.game.id,
        },
        &*state.lobby_store,
    )
    .await?;

    let view = round_view_for(&result, player.0.id)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET / — all games the caller participates in.
#[instrument(skip(state, player), fields(player_id = %player.0.id))]
async fn list_games(
    State(state): State<AppState>,
    player: CurrentPlayer,
) -> Result<Json<Vec<Game>>, ApiError> {
    let games = query_handlers::list_games_for_player(player.0.id, &*state.game_store).await?;
    Ok(Json(games))
}

/// GET /{game_id} — the caller's view of their current round.
#[instrument(skip(state, player), fields(game_id = %game_id, player_id = %player.0.id))]
async fn get_round(
    State(state): State<AppState>,
    player: CurrentPlayer,
    Path(game_id): Path<Uuid>,
) -> Result<Json<RoundView>, ApiError> {
    let view = query_handlers::get_round_for_player(game_id, player.0.id, &*state.game_store)
        .await?;
    Ok(Json(view))
}

/// GET /{game_id}/full — the whole aggregate, for finished-game replay.
#[instrument(skip(state, player), fields(game_id = %game_id, player_id = %player.0.id))]
async fn get_full_game(
    State(state): State<AppState>,
    player: CurrentPlayer,
    Path(game_id): Path<Uuid>,
) -> Result<Json<Game>, ApiError> {
    let game = query_handlers::get_game_by_id(game_id, &*state.game_store).await?;
    if !game.players.iter().any(|p| p.id == player.0.id) {
        return Err(ApiError(DomainError::AccessDenied(
            "only a participant may view this game".into(),
        )));
    }
    Ok(Json(game))
}

/// DELETE /{game_id}
#[instrument(skip(state, player), fields(game_id = %game_id, player_id = %player.0.id))]
async fn delete_game(
    State(state): State<AppState>,
    player: CurrentPlayer,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteGame {
        correlation_id: Uuid::new_v4(),
        game_id,
        requested_by: player.0.id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_game command");

    command_handlers::handle_delete_game(&command, &*state.game_store).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /{game_id}/prompts
#[instrument(skip(state, player, request), fields(game_id = %game_id, player_id = %player.0.id))]
async fn submit_prompt(
    State(state): State<AppState>,
    player: CurrentPlayer,
    Path(game_id): Path<Uuid>,
    Json(request): Json<SubmitPromptRequest>,
) -> Result<(StatusCode, Json<RoundView>), ApiError> {
    let command = commands::SubmitPrompt {
        correlation_id: Uuid::new_v4(),
        game_id,
        author: player.0.id,
        text: request.prompt,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_prompt command");

    let result =
        command_handlers::handle_submit_prompt(&command, state.clock.as_ref(), &*state.game_store)
            .await?;

    let view = round_view_for(&result, player.0.id)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /{game_id}/images — illustrate the caller's open prompt.
#[instrument(skip(state, player), fields(game_id = %game_id, player_id = %player.0.id))]
async fn request_image(
    State(state): State<AppState>,
    player: CurrentPlayer,
    Path(game_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RoundView>), ApiError> {
    let command = commands::RequestImage {
        correlation_id: Uuid::new_v4(),
        game_id,
        author: player.0.id,
    };

    info!(correlation_id = %command.correlation_id, "handling request_image command");

    let result = command_handlers::handle_request_image(
        &command,
        state.clock.as_ref(),
        &*state.game_store,
        &*state.image_generator,
        &*state.image_host,
    )
    .await?;

    let view = round_view_for(&result, player.0.id)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Returns the router for the game context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_game).get(list_games))
        .route("/{game_id}", get(get_round).delete(delete_game))
        .route("/{game_id}/full", get(get_full_game))
        .route("/{game_id}/prompts", post(submit_prompt))
        .route("/{game_id}/images", post(request_image))
}
