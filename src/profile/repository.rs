use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::ProfileModel;
use crate::shared::AppError;

/// Trait for profile repository operations
///
/// `save_ranks` rewrites the rank of every listed player as one unit:
/// after it returns, reads observe the complete new ordering.
#[async_trait]
pub trait ProfileRepository {
    async fn create_profile(&self, profile: &ProfileModel) -> Result<(), AppError>;
    async fn get_profile(&self, player_uuid: &str) -> Result<Option<ProfileModel>, AppError>;
    async fn update_profile(&self, profile: &ProfileModel) -> Result<(), AppError>;
    async fn list_profiles(&self) -> Result<Vec<ProfileModel>, AppError>;
    async fn save_ranks(&self, ranks: &[(String, i64)]) -> Result<(), AppError>;
}

/// In-memory implementation of ProfileRepository for development and testing
pub struct InMemoryProfileRepository {
    profiles: Mutex<HashMap<String, ProfileModel>>,
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProfileRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated profiles
    pub fn with_profiles(profiles: Vec<ProfileModel>) -> Self {
        let mut map = HashMap::new();
        for profile in profiles {
            map.insert(profile.player_uuid.clone(), profile);
        }

        Self {
            profiles: Mutex::new(map),
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    #[instrument(skip(self, profile))]
    async fn create_profile(&self, profile: &ProfileModel) -> Result<(), AppError> {
        debug!(player_uuid = %profile.player_uuid, username = %profile.username, "Creating profile in memory");

        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&profile.player_uuid) {
            warn!(player_uuid = %profile.player_uuid, "Profile already exists in memory");
            return Err(AppError::DatabaseError(
                "Profile already exists".to_string(),
            ));
        }
        profiles.insert(profile.player_uuid.clone(), profile.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_profile(&self, player_uuid: &str) -> Result<Option<ProfileModel>, AppError> {
        let profiles = self.profiles.lock().unwrap();
        let profile = profiles.get(player_uuid).cloned();

        match &profile {
            Some(p) => {
                debug!(player_uuid = %player_uuid, username = %p.username, "Profile found in memory")
            }
            None => debug!(player_uuid = %player_uuid, "Profile not found in memory"),
        }

        Ok(profile)
    }

    #[instrument(skip(self, profile))]
    async fn update_profile(&self, profile: &ProfileModel) -> Result<(), AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        if !profiles.contains_key(&profile.player_uuid) {
            warn!(player_uuid = %profile.player_uuid, "Profile not found for update in memory");
            return Err(AppError::NotFound("Profile not found".to_string()));
        }
        profiles.insert(profile.player_uuid.clone(), profile.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_profiles(&self) -> Result<Vec<ProfileModel>, AppError> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.values().cloned().collect())
    }

    #[instrument(skip(self, ranks))]
    async fn save_ranks(&self, ranks: &[(String, i64)]) -> Result<(), AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        for (player_uuid, rank) in ranks {
            match profiles.get_mut(player_uuid) {
                Some(profile) => profile.rank = Some(*rank),
                None => {
                    warn!(player_uuid = %player_uuid, "Profile missing during rank rewrite");
                    return Err(AppError::NotFound(format!(
                        "Profile not found: {}",
                        player_uuid
                    )));
                }
            }
        }

        debug!(ranked_players = ranks.len(), "Ranks rewritten in memory");
        Ok(())
    }
}

/// PostgreSQL implementation of profile repository
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    #[instrument(skip(self, profile))]
    async fn create_profile(&self, profile: &ProfileModel) -> Result<(), AppError> {
        debug!(player_uuid = %profile.player_uuid, username = %profile.username, "Creating profile in database");

        sqlx::query(
            "INSERT INTO player_profiles \
             (player_uuid, username, picture_url, best_wpm, best_accuracy, best_score, rank, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&profile.player_uuid)
        .bind(&profile.username)
        .bind(&profile.picture_url)
        .bind(profile.best_wpm)
        .bind(profile.best_accuracy)
        .bind(profile.best_score)
        .bind(profile.rank)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create profile in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_profile(&self, player_uuid: &str) -> Result<Option<ProfileModel>, AppError> {
        let profile = sqlx::query_as::<_, ProfileModel>(
            "SELECT player_uuid, username, picture_url, best_wpm, best_accuracy, best_score, rank, created_at \
             FROM player_profiles WHERE player_uuid = $1",
        )
        .bind(player_uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, player_uuid = %player_uuid, "Failed to fetch profile from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(profile)
    }

    #[instrument(skip(self, profile))]
    async fn update_profile(&self, profile: &ProfileModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE player_profiles \
             SET username = $2, picture_url = $3, best_wpm = $4, best_accuracy = $5, best_score = $6, rank = $7 \
             WHERE player_uuid = $1",
        )
        .bind(&profile.player_uuid)
        .bind(&profile.username)
        .bind(&profile.picture_url)
        .bind(profile.best_wpm)
        .bind(profile.best_accuracy)
        .bind(profile.best_score)
        .bind(profile.rank)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, player_uuid = %profile.player_uuid, "Failed to update profile in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(player_uuid = %profile.player_uuid, "Profile not found for update");
            return Err(AppError::NotFound("Profile not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_profiles(&self) -> Result<Vec<ProfileModel>, AppError> {
        sqlx::query_as::<_, ProfileModel>(
            "SELECT player_uuid, username, picture_url, best_wpm, best_accuracy, best_score, rank, created_at \
             FROM player_profiles",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list profiles from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    /// Rewrites every player's rank inside a single transaction so a
    /// concurrent reader never observes a half-applied ordering.
    #[instrument(skip(self, ranks))]
    async fn save_ranks(&self, ranks: &[(String, i64)]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to open rank rewrite transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        for (player_uuid, rank) in ranks {
            sqlx::query("UPDATE player_profiles SET rank = $2 WHERE player_uuid = $1")
                .bind(player_uuid)
                .bind(rank)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    warn!(error = %e, player_uuid = %player_uuid, "Failed to write rank");
                    AppError::DatabaseError(e.to_string())
                })?;
        }

        tx.commit().await.map_err(|e| {
            warn!(error = %e, "Failed to commit rank rewrite transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(ranked_players = ranks.len(), "Ranks rewritten in database");
        Ok(())
    }
}
