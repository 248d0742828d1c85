//! Whisperchain API server library.
//!
//! The thin request layer over the bounded contexts: routers per context,
//! an identity extractor for the gateway-forwarded player headers, and the
//! error→HTTP mapping. The binary in `main.rs` wires production
//! infrastructure into [`state::AppState`] and serves [`build_router`].

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

/// Builds the full application router.
pub fn build_router(state: state::AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/players", routes::players::router())
        .nest("/api/v1/lobbies", routes::lobbies::router())
        .nest("/api/v1/games", routes::games::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
