use serde::{Deserialize, Serialize};

use super::models::ProfileModel;

/// Wire representation of a player profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    pub player_uuid: String,
    pub username: String,
    pub picture_url: Option<String>,
    pub best_wpm: f64,
    pub best_accuracy: f64,
    pub best_score: f64,
    pub rank: Option<i64>,
}

impl From<ProfileModel> for ProfileResponse {
    fn from(model: ProfileModel) -> Self {
        Self {
            player_uuid: model.player_uuid,
            username: model.username,
            picture_url: model.picture_url,
            best_wpm: model.best_wpm,
            best_accuracy: model.best_accuracy,
            best_score: model.best_score,
            rank: model.rank,
        }
    }
}

/// Request body for profile updates. Best-* metrics and rank are owned
/// by the score-submission flow and are not writable here.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub picture_url: Option<String>,
}
