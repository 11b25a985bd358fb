use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    generators::{UsernameGenerator, UuidGenerator},
    models::SessionModel,
    repository::SessionRepository,
    token::TokenConfig,
    types::SessionResponse,
};
use crate::profile::models::ProfileModel;
use crate::profile::repository::ProfileRepository;
use crate::shared::AppError;

const MAX_USERNAME_LENGTH: usize = 32;

/// Configuration for session creation
#[derive(Clone)]
pub struct SessionCreationConfig {
    pub expiration_days: i64,
}

impl Default for SessionCreationConfig {
    fn default() -> Self {
        Self {
            expiration_days: 7, // Default to 7 days
        }
    }
}

/// Orchestrates session creation: player identity, profile
/// registration, session persistence and token issuance.
///
/// Profiles are created here and nowhere else; the submission flow
/// only ever updates them.
pub struct SessionCreator {
    uuid_generator: Arc<dyn UuidGenerator>,
    username_generator: Arc<dyn UsernameGenerator>,
    session_repository: Arc<dyn SessionRepository + Send + Sync>,
    profile_repository: Arc<dyn ProfileRepository + Send + Sync>,
    token_config: TokenConfig,
    config: SessionCreationConfig,
}

impl SessionCreator {
    pub fn new(
        uuid_generator: Arc<dyn UuidGenerator>,
        username_generator: Arc<dyn UsernameGenerator>,
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        profile_repository: Arc<dyn ProfileRepository + Send + Sync>,
        token_config: TokenConfig,
        config: SessionCreationConfig,
    ) -> Self {
        Self {
            uuid_generator,
            username_generator,
            session_repository,
            profile_repository,
            token_config,
            config,
        }
    }

    /// Creates a new session, registering the player's profile as part
    /// of the flow
    #[instrument(skip(self, requested_username))]
    pub async fn create_session(
        &self,
        requested_username: Option<String>,
    ) -> Result<SessionResponse, AppError> {
        // Step 1: Resolve username (requested or generated)
        let username = self.resolve_username(requested_username).await?;
        info!(username = %username, "Resolved username");

        // Step 2: Generate player identity
        let player_uuid = self.uuid_generator.generate().await;

        // Step 3: Register the player's profile
        let profile = ProfileModel::new(player_uuid.clone(), username.clone());
        self.profile_repository.create_profile(&profile).await?;
        info!(player_uuid = %player_uuid, "Registered player profile");

        // Step 4: Store the session
        let session_model = SessionModel::new(
            player_uuid.clone(),
            username.clone(),
            self.config.expiration_days,
        );
        self.session_repository
            .create_session(&session_model)
            .await?;
        info!(session_id = %session_model.id, "Stored session");

        // Step 5: Issue the JWT
        let token = self.token_config.create_token(
            session_model.id.clone(),
            player_uuid.clone(),
            username.clone(),
        )?;

        Ok(SessionResponse {
            session_id: token,
            username,
            player_uuid,
        })
    }

    async fn resolve_username(&self, requested: Option<String>) -> Result<String, AppError> {
        match requested {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Ok(self.username_generator.generate().await);
                }
                if name.len() > MAX_USERNAME_LENGTH {
                    return Err(AppError::Validation(format!(
                        "Username must be at most {} characters",
                        MAX_USERNAME_LENGTH
                    )));
                }
                Ok(name)
            }
            None => Ok(self.username_generator.generate().await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::repository::InMemoryProfileRepository;
    use crate::session::generators::{DefaultUuidGenerator, PetNameUsernameGenerator};
    use crate::session::repository::InMemorySessionRepository;

    fn create_test_session_creator() -> (SessionCreator, Arc<InMemoryProfileRepository>) {
        let profile_repository = Arc::new(InMemoryProfileRepository::new());
        let creator = SessionCreator::new(
            Arc::new(DefaultUuidGenerator::new()),
            Arc::new(PetNameUsernameGenerator::new()),
            Arc::new(InMemorySessionRepository::new()),
            profile_repository.clone(),
            TokenConfig::new(),
            SessionCreationConfig::default(),
        );
        (creator, profile_repository)
    }

    #[tokio::test]
    async fn test_create_session_registers_profile() {
        let (creator, profiles) = create_test_session_creator();

        let response = creator.create_session(None).await.unwrap();

        assert!(response.session_id.contains('.')); // JWT has dots
        assert!(!response.username.is_empty());

        let profile = profiles
            .get_profile(&response.player_uuid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.username, response.username);
        assert_eq!(profile.best_score, 0.0);
        assert!(profile.rank.is_none());
    }

    #[tokio::test]
    async fn test_create_session_honors_requested_username() {
        let (creator, _) = create_test_session_creator();

        let response = creator
            .create_session(Some("  speedy-typist  ".to_string()))
            .await
            .unwrap();
        assert_eq!(response.username, "speedy-typist");
    }

    #[tokio::test]
    async fn test_create_session_rejects_oversized_username() {
        let (creator, _) = create_test_session_creator();

        let result = creator.create_session(Some("x".repeat(64))).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_requested_username_falls_back_to_generated() {
        let (creator, _) = create_test_session_creator();

        let response = creator.create_session(Some("   ".to_string())).await.unwrap();
        assert!(!response.username.trim().is_empty());
    }

    #[tokio::test]
    async fn test_create_multiple_sessions_unique() {
        let (creator, _) = create_test_session_creator();

        let first = creator.create_session(None).await.unwrap();
        let second = creator.create_session(None).await.unwrap();

        assert_ne!(first.session_id, second.session_id);
        assert_ne!(first.player_uuid, second.player_uuid);
    }
}
