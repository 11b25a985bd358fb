// Library crate for the keydash typing-game server
// This file exposes the public API for integration tests

pub mod charts;
pub mod modes;
pub mod profile;
pub mod score;
pub mod session;
pub mod shared;
pub mod social;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export commonly used types for easier access in tests
pub use modes::GameMode;
pub use profile::repository::ProfileRepository;
pub use score::{LeaderboardService, ScoreError};
pub use shared::{AppError, AppState};

/// Builds the full application router over the given state.
/// Everything under the authenticated group requires a valid Bearer
/// token; session creation and the mode table are open.
pub fn build_router(state: AppState) -> Router {
    let authenticated = Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route(
            "/scores",
            post(score::handlers::submit_score).get(score::handlers::my_scores),
        )
        .route("/leaderboard", get(score::handlers::global_leaderboard))
        .route("/leaderboard/:mode", get(score::handlers::mode_leaderboard))
        .route("/charts/progress", get(charts::progress_chart))
        .route("/friends", get(social::list_friends))
        .route(
            "/friends/requests",
            get(social::list_friend_requests).post(social::send_friend_request),
        )
        .route(
            "/friends/requests/accept",
            post(social::accept_friend_request),
        )
        .route(
            "/friends/requests/reject",
            post(social::reject_friend_request),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::jwt_auth,
        ));

    Router::new()
        .route("/", get(|| async { "keydash server" }))
        .route("/session", post(session::create_session))
        .route("/modes", get(modes::list_modes))
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
