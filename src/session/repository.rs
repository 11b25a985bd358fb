use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::SessionModel;
use crate::shared::AppError;

/// Trait for session repository operations
#[async_trait]
pub trait SessionRepository {
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError>;
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionModel>, AppError>;
    async fn update_session(&self, session: &SessionModel) -> Result<(), AppError>;
    async fn delete_session(&self, session_id: &str) -> Result<(), AppError>;
    async fn cleanup_expired_sessions(&self) -> Result<u64, AppError>;
}

/// In-memory implementation of SessionRepository for development and testing
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, SessionModel>>,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    #[instrument(skip(self, session))]
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError> {
        debug!(session_id = %session.id, player_uuid = %session.player_uuid, "Creating session in memory");

        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(&session.id) {
            warn!(session_id = %session.id, "Session already exists in memory");
            return Err(AppError::DatabaseError(
                "Session already exists".to_string(),
            ));
        }
        sessions.insert(session.id.clone(), session.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionModel>, AppError> {
        let sessions = self.sessions.lock().unwrap();
        let session = sessions.get(session_id).cloned();

        match &session {
            Some(s) => {
                debug!(session_id = %session_id, username = %s.username, "Session found in memory")
            }
            None => debug!(session_id = %session_id, "Session not found in memory"),
        }

        Ok(session)
    }

    #[instrument(skip(self, session))]
    async fn update_session(&self, session: &SessionModel) -> Result<(), AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        if !sessions.contains_key(&session.id) {
            warn!(session_id = %session.id, "Session not found for update in memory");
            return Err(AppError::NotFound("Session not found".to_string()));
        }
        sessions.insert(session.id.clone(), session.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.remove(session_id).is_none() {
            warn!(session_id = %session_id, "Session not found for deletion in memory");
            return Err(AppError::NotFound("Session not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        let now = Utc::now();
        let initial_count = sessions.len();

        sessions.retain(|_, session| session.expires_at > now);

        let removed_count = initial_count - sessions.len();
        debug!(
            expired_sessions_removed = removed_count,
            "Expired sessions cleaned up from memory"
        );
        Ok(removed_count as u64)
    }
}

/// PostgreSQL implementation of session repository
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    #[instrument(skip(self, session))]
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError> {
        debug!(session_id = %session.id, player_uuid = %session.player_uuid, "Creating session in database");

        sqlx::query(
            "INSERT INTO user_sessions (id, player_uuid, username, created_at, expires_at, last_accessed) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&session.id)
        .bind(&session.player_uuid)
        .bind(&session.username)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.last_accessed)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create session in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionModel>, AppError> {
        sqlx::query_as::<_, SessionModel>(
            "SELECT id, player_uuid, username, created_at, expires_at, last_accessed \
             FROM user_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, session_id = %session_id, "Failed to fetch session from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self, session))]
    async fn update_session(&self, session: &SessionModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE user_sessions SET username = $2, expires_at = $3, last_accessed = $4 WHERE id = $1",
        )
        .bind(&session.id)
        .bind(&session.username)
        .bind(session.expires_at)
        .bind(session.last_accessed)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, session_id = %session.id, "Failed to update session in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(session_id = %session.id, "Session not found for update");
            return Err(AppError::NotFound("Session not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, session_id = %session_id, "Failed to delete session from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(session_id = %session_id, "Session not found for deletion");
            return Err(AppError::NotFound("Session not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to cleanup expired sessions");
                AppError::DatabaseError(e.to_string())
            })?;

        let rows_affected = result.rows_affected();
        debug!(
            expired_sessions_removed = rows_affected,
            "Expired sessions cleaned up"
        );
        Ok(rows_affected)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_session(username: &str, expiration_days: i64) -> SessionModel {
        SessionModel::new(
            format!("player-{}", username),
            username.to_string(),
            expiration_days,
        )
    }

    fn create_expired_session(username: &str) -> SessionModel {
        let mut session = create_test_session(username, 7);
        session.expires_at = Utc::now() - Duration::hours(1);
        session
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let repo = InMemorySessionRepository::new();
        let session = create_test_session("test-user", 7);

        repo.create_session(&session).await.unwrap();

        let retrieved = repo.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(retrieved.id, session.id);
        assert_eq!(retrieved.player_uuid, session.player_uuid);
        assert_eq!(retrieved.username, session.username);
    }

    #[tokio::test]
    async fn test_get_nonexistent_session() {
        let repo = InMemorySessionRepository::new();

        let result = repo.get_session("nonexistent-id").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_session() {
        let repo = InMemorySessionRepository::new();
        let session = create_test_session("test-user", 7);

        repo.create_session(&session).await.unwrap();

        let result = repo.create_session(&session).await;
        assert!(matches!(result.unwrap_err(), AppError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_update_session() {
        let repo = InMemorySessionRepository::new();
        let mut session = create_test_session("test-user", 7);

        repo.create_session(&session).await.unwrap();

        session.last_accessed = Some(Utc::now());
        session.extend_expiration(14);
        repo.update_session(&session).await.unwrap();

        let retrieved = repo.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(retrieved.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn test_update_nonexistent_session() {
        let repo = InMemorySessionRepository::new();
        let session = create_test_session("test-user", 7);

        let result = repo.update_session(&session).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_session() {
        let repo = InMemorySessionRepository::new();
        let session = create_test_session("test-user", 7);

        repo.create_session(&session).await.unwrap();
        repo.delete_session(&session.id).await.unwrap();

        let result = repo.get_session(&session.id).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_session() {
        let repo = InMemorySessionRepository::new();

        let result = repo.delete_session("nonexistent-id").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cleanup_expired_sessions() {
        let repo = InMemorySessionRepository::new();

        let expired_session = create_expired_session("expired-user");
        repo.create_session(&expired_session).await.unwrap();

        let valid_session = create_test_session("valid-user", 7);
        repo.create_session(&valid_session).await.unwrap();

        let removed_count = repo.cleanup_expired_sessions().await.unwrap();
        assert_eq!(removed_count, 1);

        assert!(repo
            .get_session(&expired_session.id)
            .await
            .unwrap()
            .is_none());
        assert!(repo.get_session(&valid_session.id).await.unwrap().is_some());
    }
}
