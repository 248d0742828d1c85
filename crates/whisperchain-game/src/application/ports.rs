//! Ports consumed by the Game Play application layer.

use async_trait::async_trait;
use uuid::Uuid;
use whisperchain_core::error::DomainError;
use whisperchain_core::store::{SnapshotStore, Versioned};

use crate::domain::aggregates::Game;

/// Store port for game snapshots, extending the generic snapshot contract
/// with a roster-scoped listing.
#[async_trait]
pub trait GameStore: SnapshotStore<Game> {
    /// All games whose roster contains the given player.
    async fn list_for_player(&self, player_id: Uuid)
    -> Result<Vec<Versioned<Game>>, DomainError>;
}

/// Port for the external text-to-image service.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Turns prompt text into the URL of a freshly generated image.
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;
}

/// Port for the image host that re-publishes generated images under stable
/// URLs.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads the image behind `source_url` and returns the hosted URL.
    async fn publish(&self, source_url: &str) -> Result<String, DomainError>;
}
