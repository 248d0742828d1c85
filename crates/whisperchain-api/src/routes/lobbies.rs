//! Routes for the Lobby bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use tracing::{info, instrument};
use uuid::Uuid;

use whisperchain_lobby::application::{command_handlers, query_handlers};
use whisperchain_lobby::domain::aggregates::Lobby;
use whisperchain_lobby::domain::commands;

use crate::error::ApiError;
use crate::extract::CurrentPlayer;
use crate::state::AppState;

/// POST /
#[instrument(skip(state, player), fields(player_id = %player.0.id))]
async fn create_lobby(
    State(state): State<AppState>,
    player: CurrentPlayer,
) -> Result<(StatusCode, Json<Lobby>), ApiError> {
    let command = commands::CreateLobby {
        correlation_id: Uuid::new_v4(),
        host: player.0,
    };

    info!(correlation_id = %command.correlation_id, "handling create_lobby command");

    let result =
        command_handlers::handle_create_lobby(&command, state.clock.as_ref(), &*state.lobby_store)
            .await?;

    Ok((StatusCode::CREATED, Json(result.lobby)))
}

/// GET /{lobby_id}
#[instrument(skip(state), fields(lobby_id = %lobby_id))]
async fn get_lobby(
    State(state): State<AppState>,
    Path(lobby_id): Path<Uuid>,
) -> Result<Json<Lobby>, ApiError> {
    let lobby = query_handlers::get_lobby_by_id(lobby_id, &*state.lobby_store).await?;
    Ok(Json(lobby))
}

/// PUT /{lobby_id}/join
#[instrument(skip(state, player), fields(lobby_id = %lobby_id, player_id = %player.0.id))]
async fn join_lobby(
    State(state): State<AppState>,
    player: CurrentPlayer,
    Path(lobby_id): Path<Uuid>,
) -> Result<Json<Lobby>, ApiError> {
    let command = commands::JoinLobby {
        correlation_id: Uuid::new_v4(),
        lobby_id,
        player: player.0,
    };

    info!(correlation_id = %command.correlation_id, "handling join_lobby command");

    let result = command_handlers::handle_join_lobby(&command, &*state.lobby_store).await?;

    Ok(Json(result.lobby))
}

/// PUT /{lobby_id}/leave
#[instrument(skip(state, player), fields(lobby_id = %lobby_id, player_id = %player.0.id))]
async fn leave_lobby(
    State(state): State<AppState>,
    player: CurrentPlayer,
    Path(lobby_id): Path<Uuid>,
) -> Result<Json<Lobby>, ApiError> {
    let command = commands::LeaveLobby {
        correlation_id: Uuid::new_v4(),
        lobby_id,
        player_id: player.0.id,
    };

    info!(correlation_id = %command.correlation_id, "handling leave_lobby command");

    let result = command_handlers::handle_leave_lobby(&command, &*state.lobby_store).await?;

    Ok(Json(result.lobby))
}

/// DELETE /{lobby_id}
#[instrument(skip(state, player), fields(lobby_id = %lobby_id, player_id = %player.0.id))]
async fn delete_lobby(
    State(state): State<AppState>,
    player: CurrentPlayer,
    Path(lobby_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteLobby {
        correlation_id: Uuid::new_v4(),
        lobby_id,
        requested_by: player.0.id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_lobby command");

    command_handlers::handle_delete_lobby(&command, &*state.lobby_store).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the lobby context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lobby))
        .route("/{lobby_id}", get(get_lobby).delete(delete_lobby))
        .route("/{lobby_id}/join", put(join_lobby))
        .route("/{lobby_id}/leave", put(leave_lobby))
}
