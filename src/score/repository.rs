use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::errors::ScoreError;
use super::models::ScoreModel;

/// Trait for score repository operations
///
/// Score rows are append-only; there are deliberately no update or
/// delete operations here.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn record_score(&self, entry: &ScoreModel) -> Result<(), ScoreError>;

    /// A player's entries, best score first, optionally restricted to
    /// one mode code.
    async fn scores_for_player(
        &self,
        player_uuid: &str,
        mode: Option<&str>,
    ) -> Result<Vec<ScoreModel>, ScoreError>;

    /// The highest entries recorded for one mode, across all players.
    async fn top_scores_for_mode(
        &self,
        mode: &str,
        limit: i64,
    ) -> Result<Vec<ScoreModel>, ScoreError>;
}

/// In-memory implementation of ScoreRepository for development and testing
pub struct InMemoryScoreRepository {
    entries: Mutex<Vec<ScoreModel>>,
}

impl Default for InMemoryScoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

fn sort_best_first(entries: &mut [ScoreModel]) {
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.recorded_at.cmp(&b.recorded_at))
    });
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    #[instrument(skip(self, entry))]
    async fn record_score(&self, entry: &ScoreModel) -> Result<(), ScoreError> {
        debug!(
            player_uuid = %entry.player_uuid,
            mode = %entry.mode,
            score = entry.score,
            "Recording score in memory"
        );

        let mut entries = self.entries.lock().unwrap();
        entries.push(entry.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn scores_for_player(
        &self,
        player_uuid: &str,
        mode: Option<&str>,
    ) -> Result<Vec<ScoreModel>, ScoreError> {
        let entries = self.entries.lock().unwrap();
        let mut matching: Vec<ScoreModel> = entries
            .iter()
            .filter(|e| e.player_uuid == player_uuid)
            .filter(|e| mode.map(|m| e.mode == m).unwrap_or(true))
            .cloned()
            .collect();
        sort_best_first(&mut matching);

        debug!(
            player_uuid = %player_uuid,
            entry_count = matching.len(),
            "Fetched player scores from memory"
        );
        Ok(matching)
    }

    #[instrument(skip(self))]
    async fn top_scores_for_mode(
        &self,
        mode: &str,
        limit: i64,
    ) -> Result<Vec<ScoreModel>, ScoreError> {
        let entries = self.entries.lock().unwrap();
        let mut matching: Vec<ScoreModel> =
            entries.iter().filter(|e| e.mode == mode).cloned().collect();
        sort_best_first(&mut matching);
        matching.truncate(limit.max(0) as usize);
        Ok(matching)
    }
}

/// PostgreSQL implementation of score repository
pub struct PostgresScoreRepository {
    pool: PgPool,
}

impl PostgresScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreRepository for PostgresScoreRepository {
    #[instrument(skip(self, entry))]
    async fn record_score(&self, entry: &ScoreModel) -> Result<(), ScoreError> {
        debug!(
            player_uuid = %entry.player_uuid,
            mode = %entry.mode,
            score = entry.score,
            "Recording score in database"
        );

        sqlx::query(
            "INSERT INTO scores (id, player_uuid, mode, wpm, accuracy, score, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&entry.id)
        .bind(&entry.player_uuid)
        .bind(&entry.mode)
        .bind(entry.wpm)
        .bind(entry.accuracy)
        .bind(entry.score)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to record score in database");
            ScoreError::Repository(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn scores_for_player(
        &self,
        player_uuid: &str,
        mode: Option<&str>,
    ) -> Result<Vec<ScoreModel>, ScoreError> {
        let entries = match mode {
            Some(mode) => {
                sqlx::query_as::<_, ScoreModel>(
                    "SELECT id, player_uuid, mode, wpm, accuracy, score, recorded_at \
                     FROM scores WHERE player_uuid = $1 AND mode = $2 \
                     ORDER BY score DESC, recorded_at ASC",
                )
                .bind(player_uuid)
                .bind(mode)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ScoreModel>(
                    "SELECT id, player_uuid, mode, wpm, accuracy, score, recorded_at \
                     FROM scores WHERE player_uuid = $1 \
                     ORDER BY score DESC, recorded_at ASC",
                )
                .bind(player_uuid)
                .fetch_all(&self.pool)
                .await
            }
        };

        entries.map_err(|e| {
            warn!(error = %e, player_uuid = %player_uuid, "Failed to fetch player scores");
            ScoreError::Repository(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn top_scores_for_mode(
        &self,
        mode: &str,
        limit: i64,
    ) -> Result<Vec<ScoreModel>, ScoreError> {
        sqlx::query_as::<_, ScoreModel>(
            "SELECT id, player_uuid, mode, wpm, accuracy, score, recorded_at \
             FROM scores WHERE mode = $1 \
             ORDER BY score DESC, recorded_at ASC LIMIT $2",
        )
        .bind(mode)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, mode = %mode, "Failed to fetch mode leaderboard");
            ScoreError::Repository(e.to_string())
        })
    }
}
