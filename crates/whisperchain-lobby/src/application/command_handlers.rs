//! Command handlers for the Lobby context.
//!
//! Same shape as the game context: load the latest snapshot, apply the pure
//! transform, persist under the loaded version.

use uuid::Uuid;
use whisperchain_core::clock::Clock;
use whisperchain_core::error::DomainError;
use whisperchain_core::store::{NEW_AGGREGATE_VERSION, SnapshotStore, Versioned};

use crate::application::ports::LobbyStore;
use crate::domain::aggregates::Lobby;
use crate::domain::commands::{CreateLobby, DeleteLobby, JoinLobby, LeaveLobby, MarkGameStarted};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct LobbyCommandResult {
    /// The persisted snapshot.
    pub lobby: Lobby,
    /// The version under which it was persisted.
    pub version: i64,
}

pub(crate) async fn load_lobby(
    store: &dyn LobbyStore,
    lobby_id: Uuid,
) -> Result<Versioned<Lobby>, DomainError> {
    store
        .load(lobby_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(lobby_id))
}

/// Handles `CreateLobby`.
///
/// # Errors
///
/// Propagates store failures.
pub async fn handle_create_lobby(
    command: &CreateLobby,
    clock: &dyn Clock,
    store: &dyn LobbyStore,
) -> Result<LobbyCommandResult, DomainError> {
    let lobby = Lobby::new(Uuid::new_v4(), command.host.clone(), clock);
    let version = store.save(lobby.id, NEW_AGGREGATE_VERSION, &lobby).await?;
    Ok(LobbyCommandResult { lobby, version })
}

/// Handles `JoinLobby`. A no-op for players already in the lobby.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown lobby and
/// `DomainError::InvalidState` once the lobby's game has started.
pub async fn handle_join_lobby(
    command: &JoinLobby,
    store: &dyn LobbyStore,
) -> Result<LobbyCommandResult, DomainError> {
    let Versioned {
        value: lobby,
        version,
    } = load_lobby(store, command.lobby_id).await?;
    let lobby = lobby.with_player(command.player.clone())?;
    let version = store.save(lobby.id, version, &lobby).await?;
    Ok(LobbyCommandResult { lobby, version })
}

/// Handles `LeaveLobby`.
///
/// # Errors
///
/// Returns `DomainError::AccessDenied` when the host tries to leave.
pub async fn handle_leave_lobby(
    command: &LeaveLobby,
    store: &dyn LobbyStore,
) -> Result<LobbyCommandResult, DomainError> {
    let Versioned {
        value: lobby,
        version,
    } = load_lobby(store, command.lobby_id).await?;
    let lobby = lobby.without_player(command.player_id)?;
    let version = store.save(lobby.id, version, &lobby).await?;
    Ok(LobbyCommandResult { lobby, version })
}

/// Handles `DeleteLobby`: only the host may delete a lobby.
///
/// # Errors
///
/// Returns `DomainError::AccessDenied` for any other requester.
pub async fn handle_delete_lobby(
    command: &DeleteLobby,
    store: &dyn LobbyStore,
) -> Result<(), DomainError> {
    let Versioned { value: lobby, .. } = load_lobby(store, command.lobby_id).await?;
    if lobby.host.id != command.requested_by {
        return Err(DomainError::AccessDenied(
            "only the host may delete this lobby".into(),
        ));
    }
    store.delete(command.lobby_id).await
}

/// Handles `MarkGameStarted`: freezes the lobby by recording its game.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if a game has already started.
pub async fn handle_mark_game_started(
    command: &MarkGameStarted,
    store: &dyn LobbyStore,
) -> Result<LobbyCommandResult, DomainError> {
    let Versioned {
        value: lobby,
        version,
    } = load_lobby(store, command.lobby_id).await?;
    let lobby = lobby.with_game(command.game_id)?;
    let version = store.save(lobby.id, version, &lobby).await?;
    Ok(LobbyCommandResult { lobby, version })
}
