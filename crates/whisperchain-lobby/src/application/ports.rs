//! Ports consumed by the Lobby application layer.

use whisperchain_core::store::SnapshotStore;

use crate::domain::aggregates::Lobby;

/// Store port for lobby snapshots. Purely a naming alias over the generic
/// snapshot contract; every `SnapshotStore<Lobby>` qualifies.
pub trait LobbyStore: SnapshotStore<Lobby> {}

impl<S: SnapshotStore<Lobby> + ?Sized> LobbyStore for S {}
