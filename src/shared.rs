use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::profile::repository::ProfileRepository;
use crate::score::service::LeaderboardService;
use crate::session::service::SessionService;
use crate::social::graph::SocialGraph;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub leaderboard: Arc<LeaderboardService>,
    pub profile_repository: Arc<dyn ProfileRepository + Send + Sync>,
    pub social_graph: Arc<dyn SocialGraph + Send + Sync>,
}

impl AppState {
    pub fn new(
        session_service: Arc<SessionService>,
        leaderboard: Arc<LeaderboardService>,
        profile_repository: Arc<dyn ProfileRepository + Send + Sync>,
        social_graph: Arc<dyn SocialGraph + Send + Sync>,
    ) -> Self {
        Self {
            session_service,
            leaderboard,
            profile_repository,
            social_graph,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::profile::repository::InMemoryProfileRepository;
    use crate::score::repository::{InMemoryScoreRepository, ScoreRepository};
    use crate::session::repository::{InMemorySessionRepository, SessionRepository};
    use crate::social::graph::InMemorySocialGraph;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        session_repository: Option<Arc<dyn SessionRepository + Send + Sync>>,
        profile_repository: Option<Arc<dyn ProfileRepository + Send + Sync>>,
        score_repository: Option<Arc<dyn ScoreRepository + Send + Sync>>,
        social_graph: Option<Arc<dyn SocialGraph + Send + Sync>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                session_repository: None,
                profile_repository: None,
                score_repository: None,
                social_graph: None,
            }
        }

        pub fn with_session_repository(
            mut self,
            repo: Arc<dyn SessionRepository + Send + Sync>,
        ) -> Self {
            self.session_repository = Some(repo);
            self
        }

        pub fn with_profile_repository(
            mut self,
            repo: Arc<dyn ProfileRepository + Send + Sync>,
        ) -> Self {
            self.profile_repository = Some(repo);
            self
        }

        pub fn with_score_repository(
            mut self,
            repo: Arc<dyn ScoreRepository + Send + Sync>,
        ) -> Self {
            self.score_repository = Some(repo);
            self
        }

        pub fn with_social_graph(mut self, graph: Arc<dyn SocialGraph + Send + Sync>) -> Self {
            self.social_graph = Some(graph);
            self
        }

        pub fn build(self) -> AppState {
            let session_repository = self
                .session_repository
                .unwrap_or_else(|| Arc::new(InMemorySessionRepository::new()));
            let profile_repository = self
                .profile_repository
                .unwrap_or_else(|| Arc::new(InMemoryProfileRepository::new()));
            let score_repository = self
                .score_repository
                .unwrap_or_else(|| Arc::new(InMemoryScoreRepository::new()));
            let social_graph = self
                .social_graph
                .unwrap_or_else(|| Arc::new(InMemorySocialGraph::new()));

            let session_service = Arc::new(SessionService::new(
                session_repository,
                profile_repository.clone(),
            ));
            let leaderboard = Arc::new(LeaderboardService::new(
                profile_repository.clone(),
                score_repository,
            ));

            AppState::new(
                session_service,
                leaderboard,
                profile_repository,
                social_graph,
            )
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
