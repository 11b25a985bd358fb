use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::graph::{RequestOutcome, ResolveOutcome};
use super::types::{
    FriendRequestView, FriendsResponse, ResolveFriendRequestPayload, SendFriendRequestPayload,
};
use crate::profile::ProfileResponse;
use crate::session::SessionClaims;
use crate::shared::{AppError, AppState};

/// HTTP handler for the friends page
///
/// GET /friends
/// The caller's friends' profiles, plus the remaining players they
/// could still befriend.
#[instrument(name = "list_friends", skip(state, claims))]
pub async fn list_friends(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<FriendsResponse>, AppError> {
    let friend_uuids = state.social_graph.friends_of(&claims.player_uuid).await?;

    let mut friends = Vec::new();
    for uuid in &friend_uuids {
        if let Some(profile) = state.profile_repository.get_profile(uuid).await? {
            friends.push(ProfileResponse::from(profile));
        }
    }

    let others: Vec<ProfileResponse> = state
        .profile_repository
        .list_profiles()
        .await?
        .into_iter()
        .filter(|p| p.player_uuid != claims.player_uuid)
        .filter(|p| !friend_uuids.contains(&p.player_uuid))
        .map(ProfileResponse::from)
        .collect();

    Ok(Json(FriendsResponse { friends, others }))
}

/// HTTP handler for listing requests addressed to the caller
///
/// GET /friends/requests
#[instrument(name = "list_friend_requests", skip(state, claims))]
pub async fn list_friend_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<FriendRequestView>>, AppError> {
    let pending = state
        .social_graph
        .pending_requests_for(&claims.player_uuid)
        .await?;

    let mut views = Vec::with_capacity(pending.len());
    for request in pending {
        let from_username = state
            .profile_repository
            .get_profile(&request.from_uuid)
            .await?
            .map(|p| p.username)
            .unwrap_or_else(|| request.from_uuid.clone());
        views.push(FriendRequestView {
            from_uuid: request.from_uuid,
            from_username,
            created_at: request.created_at,
        });
    }

    Ok(Json(views))
}

/// HTTP handler for sending a friend request
///
/// POST /friends/requests
#[instrument(name = "send_friend_request", skip(state, claims, payload))]
pub async fn send_friend_request(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(payload): Json<SendFriendRequestPayload>,
) -> Result<Json<Value>, AppError> {
    if payload.to == claims.player_uuid {
        return Err(AppError::Validation(
            "Cannot send a friend request to yourself".to_string(),
        ));
    }

    // The addressee must actually exist.
    state
        .profile_repository
        .get_profile(&payload.to)
        .await?
        .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;

    let outcome = state
        .social_graph
        .send_request(&claims.player_uuid, &payload.to)
        .await?;

    match outcome {
        RequestOutcome::Sent => {
            info!(from = %claims.player_uuid, to = %payload.to, "Friend request sent");
            Ok(Json(json!({ "status": "sent" })))
        }
        RequestOutcome::AlreadyFriends => {
            Err(AppError::Validation("Already friends".to_string()))
        }
        RequestOutcome::AlreadyRequested => {
            Err(AppError::Validation("Request already pending".to_string()))
        }
    }
}

/// HTTP handler for accepting a pending request
///
/// POST /friends/requests/accept
#[instrument(name = "accept_friend_request", skip(state, claims, payload))]
pub async fn accept_friend_request(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(payload): Json<ResolveFriendRequestPayload>,
) -> Result<Json<Value>, AppError> {
    let outcome = state
        .social_graph
        .accept_request(&payload.from, &claims.player_uuid)
        .await?;

    match outcome {
        ResolveOutcome::Resolved => {
            info!(from = %payload.from, to = %claims.player_uuid, "Friend request accepted");
            Ok(Json(json!({ "status": "accepted" })))
        }
        ResolveOutcome::RequestNotFound => {
            Err(AppError::NotFound("Friend request not found".to_string()))
        }
    }
}

/// HTTP handler for rejecting a pending request
///
/// POST /friends/requests/reject
#[instrument(name = "reject_friend_request", skip(state, claims, payload))]
pub async fn reject_friend_request(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(payload): Json<ResolveFriendRequestPayload>,
) -> Result<Json<Value>, AppError> {
    let outcome = state
        .social_graph
        .reject_request(&payload.from, &claims.player_uuid)
        .await?;

    match outcome {
        ResolveOutcome::Resolved => Ok(Json(json!({ "status": "rejected" }))),
        ResolveOutcome::RequestNotFound => {
            Err(AppError::NotFound("Friend request not found".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::ProfileModel;
    use crate::profile::repository::{InMemoryProfileRepository, ProfileRepository};
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn claims_for(player_uuid: &str) -> SessionClaims {
        SessionClaims {
            session_id: "session-1".to_string(),
            player_uuid: player_uuid.to_string(),
            username: format!("name-{}", player_uuid),
            exp: 4102444800,
            iat: 0,
        }
    }

    async fn app_as(player_uuid: &str, all_players: &[&str]) -> Router {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        for uuid in all_players {
            profiles
                .create_profile(&ProfileModel::new(
                    uuid.to_string(),
                    format!("name-{}", uuid),
                ))
                .await
                .unwrap();
        }

        let state = AppStateBuilder::new()
            .with_profile_repository(profiles)
            .build();

        Router::new()
            .route("/friends", get(list_friends))
            .route(
                "/friends/requests",
                get(list_friend_requests).post(send_friend_request),
            )
            .route("/friends/requests/accept", post(accept_friend_request))
            .route("/friends/requests/reject", post(reject_friend_request))
            .layer(Extension(claims_for(player_uuid)))
            .with_state(state)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_friends_splits_friends_and_others() {
        let app = app_as("alice", &["alice", "bob", "carol"]).await;

        let request = Request::builder()
            .method("GET")
            .uri("/friends")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let friends: FriendsResponse = serde_json::from_slice(&body).unwrap();

        // No friendships yet: everyone else shows up as "others".
        assert!(friends.friends.is_empty());
        assert_eq!(friends.others.len(), 2);
    }

    #[tokio::test]
    async fn test_send_friend_request_to_self_is_rejected() {
        let app = app_as("alice", &["alice", "bob"]).await;

        let response = app
            .oneshot(post_json("/friends/requests", r#"{"to": "alice"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_send_friend_request_to_unknown_player_is_404() {
        let app = app_as("alice", &["alice", "bob"]).await;

        let response = app
            .oneshot(post_json("/friends/requests", r#"{"to": "ghost"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_send_friend_request_succeeds() {
        let app = app_as("alice", &["alice", "bob"]).await;

        let response = app
            .oneshot(post_json("/friends/requests", r#"{"to": "bob"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_accept_missing_request_is_404() {
        let app = app_as("alice", &["alice", "bob"]).await;

        let response = app
            .oneshot(post_json("/friends/requests/accept", r#"{"from": "bob"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
