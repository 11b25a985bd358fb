use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the player_profiles table
///
/// The best-* fields each track the maximum value ever recorded for
/// that metric across the player's score history. `rank` is the dense
/// global position (1 = best); it is `None` only for players created
/// after the most recent ranking pass.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProfileModel {
    pub player_uuid: String,
    pub username: String,
    pub picture_url: Option<String>,
    pub best_wpm: f64,
    pub best_accuracy: f64,
    pub best_score: f64,
    pub rank: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl ProfileModel {
    /// Creates a fresh profile with zeroed bests and no rank yet
    pub fn new(player_uuid: String, username: String) -> Self {
        Self {
            player_uuid,
            username,
            picture_url: None,
            best_wpm: 0.0,
            best_accuracy: 0.0,
            best_score: 0.0,
            rank: None,
            created_at: Utc::now(),
        }
    }

    /// Folds a finished game into the best-* fields. Each metric is
    /// raised independently. Returns true when the best composite
    /// score rose, which is the only case that can change the global
    /// ranking order.
    pub fn absorb_result(&mut self, wpm: f64, accuracy: f64, score: f64) -> bool {
        if wpm > self.best_wpm {
            self.best_wpm = wpm;
        }
        if accuracy > self.best_accuracy {
            self.best_accuracy = accuracy;
        }
        if score > self.best_score {
            self.best_score = score;
            return true;
        }
        false
    }
}
