//! Whisperchain API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use whisperchain_api::config::AppConfig;
use whisperchain_api::error::AppError;
use whisperchain_api::state::AppState;
use whisperchain_core::clock::SystemClock;
use whisperchain_media::cloudinary::CloudinaryImageHost;
use whisperchain_media::openai::OpenAiImageGenerator;
use whisperchain_store::pg_game_store::PgGameStore;
use whisperchain_store::pg_lobby_store::PgLobbyStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Whisperchain API server");

    let config = AppConfig::from_env()?;

    // Create database connection pool and apply pending migrations.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Build application state.
    let state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(PgGameStore::new(pool.clone())),
        Arc::new(PgLobbyStore::new(pool)),
        Arc::new(OpenAiImageGenerator::new(config.openai.clone())),
        Arc::new(CloudinaryImageHost::new(config.cloudinary.clone())),
    );

    let app = whisperchain_api::build_router(state);

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
