use serde::{Deserialize, Serialize};

use super::models::ScoreModel;
use crate::profile::ProfileResponse;

/// Request body for submitting a finished game
///
/// `score` is optional: when the client omits it the server computes
/// `wpm * accuracy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitScoreRequest {
    pub game_mode: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub score: Option<f64>,
}

/// Response to a score submission: the stored entry plus the caller's
/// profile as it stands after bests and ranking settled.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitScoreResponse {
    pub entry: ScoreModel,
    pub profile: ProfileResponse,
}

/// Query parameters for score-history reads
#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    pub mode: Option<String>,
}

/// One row of a per-mode leaderboard, joined with the player's name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeLeaderboardEntry {
    pub player_uuid: String,
    pub username: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_score_field_is_optional() {
        let request: SubmitScoreRequest =
            serde_json::from_str(r#"{"game_mode": "eng_dict", "wpm": 60.0, "accuracy": 95.0}"#)
                .unwrap();

        assert_eq!(request.game_mode, "eng_dict");
        assert!(request.score.is_none());
    }

    #[test]
    fn submit_request_accepts_explicit_score() {
        let request: SubmitScoreRequest = serde_json::from_str(
            r#"{"game_mode": "paragraph", "wpm": 60.0, "accuracy": 95.0, "score": 5700.0}"#,
        )
        .unwrap();

        assert_eq!(request.score, Some(5700.0));
    }

    #[test]
    fn submit_request_rejects_non_numeric_wpm() {
        let result: Result<SubmitScoreRequest, _> = serde_json::from_str(
            r#"{"game_mode": "paragraph", "wpm": "fast", "accuracy": 95.0}"#,
        );
        assert!(result.is_err());
    }
}
