use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for user sessions table
///
/// A session belongs to exactly one player; the player's profile is
/// long-lived while sessions come and go.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SessionModel {
    pub id: String, // UUID v4 as string
    pub player_uuid: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
}

impl SessionModel {
    /// Creates a new session model with generated ID and timestamps
    pub fn new(player_uuid: String, username: String, expiration_days: i64) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(expiration_days);

        Self {
            id: Uuid::new_v4().to_string(),
            player_uuid,
            username,
            created_at: now,
            expires_at,
            last_accessed: Some(now),
        }
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Extends the session expiration by the given number of days
    pub fn extend_expiration(&mut self, days: i64) {
        self.expires_at = Utc::now() + chrono::Duration::days(days);
    }
}
