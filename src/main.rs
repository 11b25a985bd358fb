use std::sync::Arc;

use keydash::profile::repository::{
    InMemoryProfileRepository, PostgresProfileRepository, ProfileRepository,
};
use keydash::score::repository::{
    InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository,
};
use keydash::score::LeaderboardService;
use keydash::session::repository::{
    InMemorySessionRepository, PostgresSessionRepository, SessionRepository,
};
use keydash::session::service::SessionService;
use keydash::shared::AppState;
use keydash::social::{InMemorySocialGraph, PostgresSocialGraph, SocialGraph};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keydash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting keydash server");

    // Storage backends: PostgreSQL when DATABASE_URL is set, in-memory
    // otherwise (development and tests).
    let (session_repository, profile_repository, score_repository, social_graph): (
        Arc<dyn SessionRepository + Send + Sync>,
        Arc<dyn ProfileRepository + Send + Sync>,
        Arc<dyn ScoreRepository + Send + Sync>,
        Arc<dyn SocialGraph + Send + Sync>,
    ) = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("Failed to connect to database");
            info!("Using PostgreSQL storage");
            (
                Arc::new(PostgresSessionRepository::new(pool.clone())),
                Arc::new(PostgresProfileRepository::new(pool.clone())),
                Arc::new(PostgresScoreRepository::new(pool.clone())),
                Arc::new(PostgresSocialGraph::new(pool)),
            )
        }
        Err(_) => {
            info!("DATABASE_URL not set, using in-memory storage");
            (
                Arc::new(InMemorySessionRepository::new()),
                Arc::new(InMemoryProfileRepository::new()),
                Arc::new(InMemoryScoreRepository::new()),
                Arc::new(InMemorySocialGraph::new()),
            )
        }
    };

    let session_service = Arc::new(SessionService::new(
        session_repository,
        profile_repository.clone(),
    ));
    let leaderboard = Arc::new(LeaderboardService::new(
        profile_repository.clone(),
        score_repository,
    ));

    let app_state = AppState::new(
        session_service,
        leaderboard,
        profile_repository,
        social_graph,
    );
    let app = keydash::build_router(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await.unwrap();
}
