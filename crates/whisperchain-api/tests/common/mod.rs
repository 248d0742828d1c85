//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;
use whisperchain_core::clock::Clock;
use whisperchain_core::player::Player;
use whisperchain_game::domain::aggregates::Game;
use whisperchain_lobby::domain::aggregates::Lobby;
use whisperchain_test_support::{
    FixedClock, InMemoryStore, RecordingImageGenerator, StubImageHost,
};

use whisperchain_api::extract::{PLAYER_ID_HEADER, PLAYER_NAME_HEADER};
use whisperchain_api::state::AppState;

/// URL every hosted image resolves to in tests.
pub const HOSTED_IMAGE_URL: &str = "https://cdn.example/hosted.png";

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over in-memory stores and stub media clients.
/// Uses the same route structure as `main.rs`. Clone the router per request;
/// the underlying stores stay shared.
pub fn build_test_app() -> Router {
    let state = AppState::new(
        fixed_clock(),
        Arc::new(InMemoryStore::<Game>::new()),
        Arc::new(InMemoryStore::<Lobby>::new()),
        Arc::new(RecordingImageGenerator::new("https://img.example/raw.png")),
        Arc::new(StubImageHost::new(HOSTED_IMAGE_URL)),
    );
    whisperchain_api::build_router(state)
}

/// A throwaway player identity for tests.
pub fn player(name: &str) -> Player {
    Player::new(Uuid::new_v4(), name)
}

fn with_identity(
    builder: axum::http::request::Builder,
    player: &Player,
) -> axum::http::request::Builder {
    builder
        .header(PLAYER_ID_HEADER, player.id.to_string())
        .header(PLAYER_NAME_HEADER, player.name.clone())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, json)
}

/// Send a POST with a JSON body on behalf of `player`.
pub async fn post_json(
    app: &Router,
    player: &Player,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = with_identity(Request::builder().method("POST").uri(uri), player)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Send a bodyless POST on behalf of `player`.
pub async fn post_empty(
    app: &Router,
    player: &Player,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let request = with_identity(Request::builder().method("POST").uri(uri), player)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a bodyless PUT on behalf of `player`.
pub async fn put_empty(
    app: &Router,
    player: &Player,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let request = with_identity(Request::builder().method("PUT").uri(uri), player)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a GET on behalf of `player`.
pub async fn get_json(
    app: &Router,
    player: &Player,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let request = with_identity(Request::builder().method("GET").uri(uri), player)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a GET without identity headers.
pub async fn get_anonymous(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a DELETE on behalf of `player`.
pub async fn delete_req(app: &Router, player: &Player, uri: &str) -> StatusCode {
    let request = with_identity(Request::builder().method("DELETE").uri(uri), player)
        .body(Body::empty())
        .unwrap();
    send(app, request).await.0
}
