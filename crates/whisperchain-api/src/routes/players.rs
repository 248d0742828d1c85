//! Routes for the authenticated player.

use axum::{Json, Router, routing::get};
use whisperchain_core::player::Player;

use crate::extract::CurrentPlayer;
use crate::state::AppState;

/// GET /me — echoes the gateway-resolved identity.
async fn me(CurrentPlayer(player): CurrentPlayer) -> Json<Player> {
    Json(player)
}

/// Returns the router for the player context.
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
