mod utils;

use axum::http::StatusCode;
use serde_json::json;
use utils::TestApp;

#[tokio::test]
async fn request_accept_lifecycle_makes_friends_on_both_sides() {
    let app = TestApp::new();
    let alice = app.register_player("alice").await;
    let bob = app.register_player("bob").await;

    // Alice asks, Bob sees it pending.
    let (status, _) = app
        .post(
            "/friends/requests",
            Some(&alice.token),
            Some(json!({ "to": bob.player_uuid })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, pending) = app.get("/friends/requests", Some(&bob.token)).await;
    assert_eq!(status, StatusCode::OK);
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["from_uuid"], alice.player_uuid.as_str());
    assert_eq!(pending[0]["from_username"], "alice");

    // Bob accepts.
    let (status, body) = app
        .post(
            "/friends/requests/accept",
            Some(&bob.token),
            Some(json!({ "from": alice.player_uuid })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");

    // Both sides now list each other as friends, not as others.
    for (me, friend_name) in [(&alice, "bob"), (&bob, "alice")] {
        let (status, friends) = app.get("/friends", Some(&me.token)).await;
        assert_eq!(status, StatusCode::OK);

        let friend_list = friends["friends"].as_array().unwrap();
        assert_eq!(friend_list.len(), 1);
        assert_eq!(friend_list[0]["username"], friend_name);
        assert!(friends["others"].as_array().unwrap().is_empty());
    }

    // The request is consumed.
    let (_, pending) = app.get("/friends/requests", Some(&bob.token)).await;
    assert!(pending.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_request_leaves_players_unrelated() {
    let app = TestApp::new();
    let alice = app.register_player("alice").await;
    let bob = app.register_player("bob").await;

    app.post(
        "/friends/requests",
        Some(&alice.token),
        Some(json!({ "to": bob.player_uuid })),
    )
    .await;

    let (status, body) = app
        .post(
            "/friends/requests/reject",
            Some(&bob.token),
            Some(json!({ "from": alice.player_uuid })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");

    let (_, friends) = app.get("/friends", Some(&bob.token)).await;
    assert!(friends["friends"].as_array().unwrap().is_empty());
    assert_eq!(friends["others"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn self_request_is_a_validation_error() {
    let app = TestApp::new();
    let alice = app.register_player("alice").await;

    let (status, _) = app
        .post(
            "/friends/requests",
            Some(&alice.token),
            Some(json!({ "to": alice.player_uuid })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_request_is_a_validation_error() {
    let app = TestApp::new();
    let alice = app.register_player("alice").await;
    let bob = app.register_player("bob").await;

    let payload = json!({ "to": bob.player_uuid });
    let (status, _) = app
        .post("/friends/requests", Some(&alice.token), Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post("/friends/requests", Some(&alice.token), Some(payload))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resolving_a_missing_request_is_not_found() {
    let app = TestApp::new();
    let alice = app.register_player("alice").await;
    let bob = app.register_player("bob").await;

    let (status, _) = app
        .post(
            "/friends/requests/accept",
            Some(&bob.token),
            Some(json!({ "from": alice.player_uuid })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn friends_endpoints_require_authentication() {
    let app = TestApp::new();

    let (status, _) = app.get("/friends", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/friends/requests", None, Some(json!({ "to": "anyone" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
