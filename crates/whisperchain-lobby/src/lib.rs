//! Whisperchain — Lobby bounded context.
//!
//! Gathers players before a game starts. A lobby's roster is open until a
//! game is created from it; from then on the lobby only records which game
//! it became.

pub mod application;
pub mod domain;
