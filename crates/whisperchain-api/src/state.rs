//! Shared application state.

use std::sync::Arc;

use whisperchain_core::clock::Clock;
use whisperchain_game::application::ports::{GameStore, ImageGenerator, ImageHost};
use whisperchain_lobby::application::ports::LobbyStore;

/// Application state shared across all request handlers. Everything is held
/// behind ports so tests can swap in deterministic fakes.
#[derive(Clone)]
pub struct AppState {
    /// Source of time for new turns and aggregates.
    pub clock: Arc<dyn Clock>,
    /// Game snapshot store.
    pub game_store: Arc<dyn GameStore>,
    /// Lobby snapshot store.
    pub lobby_store: Arc<dyn LobbyStore>,
    /// Text-to-image generator.
    pub image_generator: Arc<dyn ImageGenerator>,
    /// Image re-hosting service.
    pub image_host: Arc<dyn ImageHost>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        game_store: Arc<dyn GameStore>,
        lobby_store: Arc<dyn LobbyStore>,
        image_generator: Arc<dyn ImageGenerator>,
        image_host: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            clock,
            game_store,
            lobby_store,
            image_generator,
            image_host,
        }
    }
}
