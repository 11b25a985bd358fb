use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use keydash::profile::repository::InMemoryProfileRepository;
use keydash::score::repository::InMemoryScoreRepository;
use keydash::score::LeaderboardService;
use keydash::session::repository::InMemorySessionRepository;
use keydash::session::service::SessionService;
use keydash::shared::AppState;
use keydash::social::InMemorySocialGraph;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A registered player with a live session token
pub struct TestPlayer {
    pub token: String,
    pub player_uuid: String,
    #[allow(dead_code)] // Not every suite reads the name back
    pub username: String,
}

/// Full application wired over in-memory storage
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let profile_repository = Arc::new(InMemoryProfileRepository::new());
        let session_service = Arc::new(SessionService::new(
            Arc::new(InMemorySessionRepository::new()),
            profile_repository.clone(),
        ));
        let leaderboard = Arc::new(LeaderboardService::new(
            profile_repository.clone(),
            Arc::new(InMemoryScoreRepository::new()),
        ));
        let state = AppState::new(
            session_service,
            leaderboard,
            profile_repository,
            Arc::new(InMemorySocialGraph::new()),
        );

        Self {
            router: keydash::build_router(state),
        }
    }

    /// POST /session with the given username and unpack the response
    pub async fn register_player(&self, username: &str) -> TestPlayer {
        let (status, body) = self
            .post(
                "/session",
                None,
                Some(serde_json::json!({ "username": username })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "session creation failed: {}", body);

        TestPlayer {
            token: body["session_id"].as_str().unwrap().to_string(),
            player_uuid: body["player_uuid"].as_str().unwrap().to_string(),
            username: body["username"].as_str().unwrap().to_string(),
        }
    }

    /// Submit a finished game for the player and assert it succeeded
    #[allow(dead_code)] // Used by the score suite only
    pub async fn submit_score(&self, player: &TestPlayer, mode: &str, wpm: f64, accuracy: f64) {
        let (status, body) = self
            .post(
                "/scores",
                Some(&player.token),
                Some(serde_json::json!({
                    "game_mode": mode,
                    "wpm": wpm,
                    "accuracy": accuracy,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "score submission failed: {}", body);
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send("POST", uri, token, body).await
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
