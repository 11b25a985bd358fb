use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, instrument};

use super::errors::ScoreError;
use super::models::ScoreModel;
use super::repository::ScoreRepository;
use super::types::{ModeLeaderboardEntry, SubmitScoreRequest, SubmitScoreResponse};
use crate::modes::GameMode;
use crate::profile::models::ProfileModel;
use crate::profile::repository::ProfileRepository;
use crate::profile::ProfileResponse;

const DEFAULT_MODE_LEADERBOARD_LIMIT: i64 = 50;

/// Service owning the score-submission flow and the derived views it
/// keeps consistent: per-player best metrics and the global ranking.
pub struct LeaderboardService {
    profiles: Arc<dyn ProfileRepository + Send + Sync>,
    scores: Arc<dyn ScoreRepository + Send + Sync>,
    // Serializes the read-then-write-all ranking pass. Without it two
    // concurrent submissions could interleave and persist stale ranks.
    rank_lock: AsyncMutex<()>,
}

impl LeaderboardService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository + Send + Sync>,
        scores: Arc<dyn ScoreRepository + Send + Sync>,
    ) -> Self {
        Self {
            profiles,
            scores,
            rank_lock: AsyncMutex::new(()),
        }
    }

    /// Records a finished game for the given player.
    ///
    /// Validation happens before anything is persisted: an unknown
    /// mode code or malformed metric leaves the score history and all
    /// profiles untouched. On success the entry is stored, the
    /// player's best metrics reflect it, and the global ranking has
    /// been recomputed if the player's best score rose.
    #[instrument(skip(self, request), fields(game_mode = %request.game_mode))]
    pub async fn submit_score(
        &self,
        player_uuid: &str,
        request: SubmitScoreRequest,
    ) -> Result<SubmitScoreResponse, ScoreError> {
        let mode = GameMode::from_code(&request.game_mode)?;
        validate_metrics(request.wpm, request.accuracy, request.score)?;

        let score_value = request
            .score
            .unwrap_or(request.wpm * request.accuracy);

        let _guard = self.rank_lock.lock().await;

        let mut profile = self
            .profiles
            .get_profile(player_uuid)
            .await?
            .ok_or_else(|| ScoreError::ProfileNotFound(player_uuid.to_string()))?;

        let entry = ScoreModel::new(
            player_uuid.to_string(),
            mode,
            request.wpm,
            request.accuracy,
            score_value,
        );
        self.scores.record_score(&entry).await?;

        let best_score_raised = profile.absorb_result(entry.wpm, entry.accuracy, entry.score);
        self.profiles.update_profile(&profile).await?;

        info!(
            player_uuid = %player_uuid,
            mode = %entry.mode,
            score = entry.score,
            best_score_raised,
            "Score recorded"
        );

        // Only a new personal-best composite score can change the
        // global ordering.
        let profile = if best_score_raised {
            self.recompute_ranks().await?;
            self.profiles
                .get_profile(player_uuid)
                .await?
                .ok_or_else(|| ScoreError::ProfileNotFound(player_uuid.to_string()))?
        } else {
            profile
        };

        Ok(SubmitScoreResponse {
            entry,
            profile: ProfileResponse::from(profile),
        })
    }

    /// A player's own entries, best first, optionally for one mode.
    pub async fn player_scores(
        &self,
        player_uuid: &str,
        mode: Option<&str>,
    ) -> Result<Vec<ScoreModel>, ScoreError> {
        let mode = match mode {
            Some(code) => Some(GameMode::from_code(code)?),
            None => None,
        };
        self.scores
            .scores_for_player(player_uuid, mode.map(|m| m.code()))
            .await
    }

    /// Every profile in global-ranking order: ranked players first by
    /// rank, players awaiting their first ranking pass after them by
    /// best score.
    pub async fn global_ranking(&self) -> Result<Vec<ProfileModel>, ScoreError> {
        let mut profiles = self.profiles.list_profiles().await?;
        profiles.sort_by(|a, b| match (a.rank, b.rank) {
            (Some(ra), Some(rb)) => ra.cmp(&rb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_best_scores(a, b),
        });
        Ok(profiles)
    }

    /// The highest entries for one mode, labeled with player names.
    pub async fn mode_leaderboard(
        &self,
        mode_code: &str,
    ) -> Result<Vec<ModeLeaderboardEntry>, ScoreError> {
        let mode = GameMode::from_code(mode_code)?;
        let entries = self
            .scores
            .top_scores_for_mode(mode.code(), DEFAULT_MODE_LEADERBOARD_LIMIT)
            .await?;

        let usernames: HashMap<String, String> = self
            .profiles
            .list_profiles()
            .await?
            .into_iter()
            .map(|p| (p.player_uuid, p.username))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let username = usernames
                    .get(&entry.player_uuid)
                    .cloned()
                    .unwrap_or_else(|| entry.player_uuid.clone());
                ModeLeaderboardEntry {
                    player_uuid: entry.player_uuid,
                    username,
                    wpm: entry.wpm,
                    accuracy: entry.accuracy,
                    score: entry.score,
                }
            })
            .collect())
    }

    /// Reassigns dense ranks 1..N over all profiles by best score
    /// descending. Equal best scores are ordered by player UUID so the
    /// result is deterministic and no two players share a rank.
    async fn recompute_ranks(&self) -> Result<(), ScoreError> {
        let mut profiles = self.profiles.list_profiles().await?;
        profiles.sort_by(compare_best_scores);

        let ranks: Vec<(String, i64)> = profiles
            .iter()
            .enumerate()
            .map(|(index, profile)| (profile.player_uuid.clone(), (index + 1) as i64))
            .collect();

        debug!(ranked_players = ranks.len(), "Recomputing global ranking");
        self.profiles.save_ranks(&ranks).await?;
        Ok(())
    }
}

fn compare_best_scores(a: &ProfileModel, b: &ProfileModel) -> Ordering {
    b.best_score
        .partial_cmp(&a.best_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.player_uuid.cmp(&b.player_uuid))
}

fn validate_metrics(wpm: f64, accuracy: f64, score: Option<f64>) -> Result<(), ScoreError> {
    if !wpm.is_finite() || wpm < 0.0 {
        return Err(ScoreError::Validation(
            "wpm must be a non-negative number".to_string(),
        ));
    }
    if !accuracy.is_finite() || !(0.0..=100.0).contains(&accuracy) {
        return Err(ScoreError::Validation(
            "accuracy must be between 0 and 100".to_string(),
        ));
    }
    if let Some(score) = score {
        if !score.is_finite() || score < 0.0 {
            return Err(ScoreError::Validation(
                "score must be a non-negative number".to_string(),
            ));
        }
    }
    Ok(())
}
