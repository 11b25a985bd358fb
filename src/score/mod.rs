pub mod service;

mod errors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod types;

pub use errors::ScoreError;
pub use models::ScoreModel;
pub use repository::{InMemoryScoreRepository, ScoreRepository};
pub use service::LeaderboardService;
pub use types::{ModeLeaderboardEntry, SubmitScoreRequest, SubmitScoreResponse};
