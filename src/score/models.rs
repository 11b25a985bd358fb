use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::modes::GameMode;

/// Database model for the scores table
///
/// One row per finished game. Rows are append-only: once recorded a
/// score entry is never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoreModel {
    pub id: String,
    pub player_uuid: String,
    pub mode: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub score: f64,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreModel {
    /// Creates a new score entry stamped with the current time
    pub fn new(player_uuid: String, mode: GameMode, wpm: f64, accuracy: f64, score: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            player_uuid,
            mode: mode.code().to_string(),
            wpm,
            accuracy,
            score,
            recorded_at: Utc::now(),
        }
    }
}
