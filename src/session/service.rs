use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    creator::{SessionCreationConfig, SessionCreator},
    generators::{DefaultUuidGenerator, PetNameUsernameGenerator},
    repository::SessionRepository,
    token::TokenConfig,
    types::{SessionClaims, SessionResponse},
};
use crate::profile::repository::ProfileRepository;
use crate::shared::AppError;

/// Service for handling session business logic
pub struct SessionService {
    session_creator: SessionCreator,
    token_config: TokenConfig,
    repository: Arc<dyn SessionRepository + Send + Sync>,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository + Send + Sync>,
        profile_repository: Arc<dyn ProfileRepository + Send + Sync>,
    ) -> Self {
        let token_config = TokenConfig::new();

        let session_creator = SessionCreator::new(
            Arc::new(DefaultUuidGenerator::new()),
            Arc::new(PetNameUsernameGenerator::new()),
            repository.clone(),
            profile_repository,
            token_config.clone(),
            SessionCreationConfig::default(),
        );

        Self {
            session_creator,
            token_config,
            repository,
        }
    }

    /// Creates a new session (and the player's profile) and returns a
    /// JWT token
    #[instrument(skip(self, requested_username))]
    pub async fn create_session(
        &self,
        requested_username: Option<String>,
    ) -> Result<SessionResponse, AppError> {
        self.session_creator.create_session(requested_username).await
    }

    /// Validates a session token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub async fn validate_session(&self, token: &str) -> Result<SessionClaims, AppError> {
        // First validate JWT token structure and signature
        let claims = self.token_config.validate_token(token)?;

        // Then validate session exists in database and hasn't been revoked
        match self.repository.get_session(&claims.session_id).await? {
            Some(session_model) => {
                if session_model.is_expired() {
                    warn!(
                        session_id = %claims.session_id,
                        "Session found in database but has expired"
                    );
                    return Err(AppError::Unauthorized("Session has expired".to_string()));
                }

                Ok(claims)
            }
            None => {
                warn!(
                    session_id = %claims.session_id,
                    "Session not found in database - may have been revoked"
                );
                Err(AppError::Unauthorized(
                    "Session not found or has been revoked".to_string(),
                ))
            }
        }
    }

    /// Revokes a session by removing it from the database. The
    /// player's profile stays: only the login goes away.
    #[instrument(skip(self))]
    pub async fn revoke_session(&self, session_id: &str) -> Result<(), AppError> {
        self.repository.delete_session(session_id).await?;
        info!(session_id = %session_id, "Session revoked");
        Ok(())
    }

    /// Extends a session's expiration time
    #[instrument(skip(self))]
    pub async fn extend_session(&self, session_id: &str) -> Result<(), AppError> {
        let mut session = self
            .repository
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

        session.extend_expiration(self.token_config.expiration_days);
        self.repository.update_session(&session).await?;

        Ok(())
    }

    /// Cleans up expired sessions from the database
    #[instrument(skip(self))]
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        let removed_count = self.repository.cleanup_expired_sessions().await?;

        info!(
            removed_sessions = removed_count,
            "Expired sessions cleanup completed"
        );
        Ok(removed_count)
    }
}
