use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::ProfileResponse;

/// Response for the friends page: the caller's friends plus everyone
/// they could still befriend
#[derive(Debug, Serialize, Deserialize)]
pub struct FriendsResponse {
    pub friends: Vec<ProfileResponse>,
    pub others: Vec<ProfileResponse>,
}

/// Request body for sending a friend request
#[derive(Debug, Serialize, Deserialize)]
pub struct SendFriendRequestPayload {
    pub to: String,
}

/// Request body for accepting or rejecting a pending request
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveFriendRequestPayload {
    pub from: String,
}

/// One pending request, labeled with the sender's name
#[derive(Debug, Serialize, Deserialize)]
pub struct FriendRequestView {
    pub from_uuid: String,
    pub from_username: String,
    pub created_at: DateTime<Utc>,
}
