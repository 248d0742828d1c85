//! Integration tests for the Lobby bounded context.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_lobby_round_trip() {
    let app = common::build_test_app();
    let host = common::player("host");
    let guest = common::player("guest");

    // POST /api/v1/lobbies
    let (status, lobby) = common::post_empty(&app, &host, "/api/v1/lobbies").await;
    assert_eq!(status, StatusCode::CREATED);
    let lobby_id = lobby["id"].as_str().unwrap().to_owned();
    assert_eq!(lobby["host"]["id"], host.id.to_string());

    // PUT /api/v1/lobbies/{id}/join
    let (status, lobby) =
        common::put_empty(&app, &guest, &format!("/api/v1/lobbies/{lobby_id}/join")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lobby["players"].as_array().unwrap().len(), 2);

    // Joining again is a no-op.
    let (status, lobby) =
        common::put_empty(&app, &guest, &format!("/api/v1/lobbies/{lobby_id}/join")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lobby["players"].as_array().unwrap().len(), 2);

    // GET /api/v1/lobbies/{id}
    let (status, lobby) =
        common::get_json(&app, &host, &format!("/api/v1/lobbies/{lobby_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lobby["players"][1]["name"], "guest");

    // PUT /api/v1/lobbies/{id}/leave
    let (status, lobby) =
        common::put_empty(&app, &guest, &format!("/api/v1/lobbies/{lobby_id}/leave")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lobby["players"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_host_cannot_leave_their_own_lobby() {
    let app = common::build_test_app();
    let host = common::player("host");

    let (_, lobby) = common::post_empty(&app, &host, "/api/v1/lobbies").await;
    let lobby_id = lobby["id"].as_str().unwrap().to_owned();

    let (status, json) =
        common::put_empty(&app, &host, &format!("/api/v1/lobbies/{lobby_id}/leave")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "access_denied");
}

#[tokio::test]
async fn test_delete_lobby_requires_host() {
    let app = common::build_test_app();
    let host = common::player("host");
    let guest = common::player("guest");

    let (_, lobby) = common::post_empty(&app, &host, "/api/v1/lobbies").await;
    let lobby_id = lobby["id"].as_str().unwrap().to_owned();

    // A guest may not delete the lobby.
    let status = common::delete_req(&app, &guest, &format!("/api/v1/lobbies/{lobby_id}")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The host may.
    let status = common::delete_req(&app, &host, &format!("/api/v1/lobbies/{lobby_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::get_json(&app, &host, &format!("/api/v1/lobbies/{lobby_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_join_is_rejected_once_the_game_starts() {
    let app = common::build_test_app();
    let host = common::player("host");
    let late = common::player("late-comer");

    let (_, lobby) = common::post_empty(&app, &host, "/api/v1/lobbies").await;
    let lobby_id = lobby["id"].as_str().unwrap().to_owned();

    // Start the game from the lobby.
    let (status, _) = common::post_json(
        &app,
        &host,
        "/api/v1/games",
        &serde_json::json!({ "lobby_id": lobby_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The roster is frozen now.
    let (status, json) =
        common::put_empty(&app, &late, &format!("/api/v1/lobbies/{lobby_id}/join")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_state");
}
