//! Query handlers for the Lobby context.

use uuid::Uuid;
use whisperchain_core::error::DomainError;

use crate::application::command_handlers::load_lobby;
use crate::application::ports::LobbyStore;
use crate::domain::aggregates::Lobby;

/// Retrieves a lobby by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown lobby.
pub async fn get_lobby_by_id(lobby_id: Uuid, store: &dyn LobbyStore) -> Result<Lobby, DomainError> {
    Ok(load_lobby(store, lobby_id).await?.value)
}
