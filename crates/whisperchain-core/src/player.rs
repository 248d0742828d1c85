//! Player identity snapshot shared across bounded contexts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A participant as resolved by the upstream identity provider.
///
/// Equality is by identifier only. The display name is a snapshot taken when
/// the player entered a lobby and may go stale without affecting identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Opaque player identifier.
    pub id: Uuid,
    /// Display name snapshot.
    pub name: String,
}

impl Player {
    /// Creates a player reference.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}
