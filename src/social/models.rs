use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the friend_requests table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct FriendRequestModel {
    pub from_uuid: String,
    pub to_uuid: String,
    pub created_at: DateTime<Utc>,
}

impl FriendRequestModel {
    pub fn new(from_uuid: String, to_uuid: String) -> Self {
        Self {
            from_uuid,
            to_uuid,
            created_at: Utc::now(),
        }
    }
}
