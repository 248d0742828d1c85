//! Whisperchain — PostgreSQL snapshot stores.
//!
//! Aggregates are persisted as JSONB snapshots guarded by a `version`
//! column. Writes are compare-and-swap on the version; a lost race surfaces
//! as `DomainError::ConcurrencyConflict` for the caller to resolve.

pub mod pg_game_store;
pub mod pg_lobby_store;

use whisperchain_core::error::DomainError;

pub(crate) fn infra(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {err}"))
}
