use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::models::FriendRequestModel;
use crate::shared::AppError;

/// Result of sending a friend request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// Request stored and now pending
    Sent,
    /// The two players are already friends
    AlreadyFriends,
    /// An equivalent request (in either direction) is already pending
    AlreadyRequested,
}

/// Result of accepting or rejecting a pending request
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// The request existed and was resolved
    Resolved,
    /// No such pending request
    RequestNotFound,
}

/// Narrow interface to the friendship capability.
///
/// The rest of the application only reads friend lists and forwards
/// request/accept/reject calls; friendship bookkeeping lives entirely
/// behind this trait.
#[async_trait]
pub trait SocialGraph {
    async fn friends_of(&self, player_uuid: &str) -> Result<Vec<String>, AppError>;
    async fn are_friends(&self, a: &str, b: &str) -> Result<bool, AppError>;
    async fn send_request(&self, from: &str, to: &str) -> Result<RequestOutcome, AppError>;
    async fn pending_requests_for(
        &self,
        player_uuid: &str,
    ) -> Result<Vec<FriendRequestModel>, AppError>;
    async fn accept_request(&self, from: &str, to: &str) -> Result<ResolveOutcome, AppError>;
    async fn reject_request(&self, from: &str, to: &str) -> Result<ResolveOutcome, AppError>;
}

/// Friendships are unordered pairs; store them under a canonical order
fn ordered_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[derive(Default)]
struct GraphState {
    friendships: HashSet<(String, String)>,
    requests: Vec<FriendRequestModel>,
}

/// In-memory implementation of SocialGraph for development and testing
pub struct InMemorySocialGraph {
    state: Mutex<GraphState>,
}

impl Default for InMemorySocialGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySocialGraph {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GraphState::default()),
        }
    }
}

#[async_trait]
impl SocialGraph for InMemorySocialGraph {
    #[instrument(skip(self))]
    async fn friends_of(&self, player_uuid: &str) -> Result<Vec<String>, AppError> {
        let state = self.state.lock().unwrap();
        let mut friends: Vec<String> = state
            .friendships
            .iter()
            .filter_map(|(a, b)| {
                if a == player_uuid {
                    Some(b.clone())
                } else if b == player_uuid {
                    Some(a.clone())
                } else {
                    None
                }
            })
            .collect();
        friends.sort();

        debug!(player_uuid = %player_uuid, friend_count = friends.len(), "Listed friends from memory");
        Ok(friends)
    }

    #[instrument(skip(self))]
    async fn are_friends(&self, a: &str, b: &str) -> Result<bool, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.friendships.contains(&ordered_pair(a, b)))
    }

    #[instrument(skip(self))]
    async fn send_request(&self, from: &str, to: &str) -> Result<RequestOutcome, AppError> {
        let mut state = self.state.lock().unwrap();

        if state.friendships.contains(&ordered_pair(from, to)) {
            debug!(from = %from, to = %to, "Players already friends");
            return Ok(RequestOutcome::AlreadyFriends);
        }

        let pending = state.requests.iter().any(|r| {
            (r.from_uuid == from && r.to_uuid == to) || (r.from_uuid == to && r.to_uuid == from)
        });
        if pending {
            debug!(from = %from, to = %to, "Request already pending");
            return Ok(RequestOutcome::AlreadyRequested);
        }

        state
            .requests
            .push(FriendRequestModel::new(from.to_string(), to.to_string()));

        info!(from = %from, to = %to, "Friend request stored in memory");
        Ok(RequestOutcome::Sent)
    }

    #[instrument(skip(self))]
    async fn pending_requests_for(
        &self,
        player_uuid: &str,
    ) -> Result<Vec<FriendRequestModel>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .requests
            .iter()
            .filter(|r| r.to_uuid == player_uuid)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn accept_request(&self, from: &str, to: &str) -> Result<ResolveOutcome, AppError> {
        let mut state = self.state.lock().unwrap();

        let before = state.requests.len();
        state
            .requests
            .retain(|r| !(r.from_uuid == from && r.to_uuid == to));
        if state.requests.len() == before {
            return Ok(ResolveOutcome::RequestNotFound);
        }

        state.friendships.insert(ordered_pair(from, to));

        info!(from = %from, to = %to, "Friend request accepted in memory");
        Ok(ResolveOutcome::Resolved)
    }

    #[instrument(skip(self))]
    async fn reject_request(&self, from: &str, to: &str) -> Result<ResolveOutcome, AppError> {
        let mut state = self.state.lock().unwrap();

        let before = state.requests.len();
        state
            .requests
            .retain(|r| !(r.from_uuid == from && r.to_uuid == to));
        if state.requests.len() == before {
            return Ok(ResolveOutcome::RequestNotFound);
        }

        info!(from = %from, to = %to, "Friend request rejected in memory");
        Ok(ResolveOutcome::Resolved)
    }
}

/// PostgreSQL implementation of the social graph
///
/// Friendships are stored once per pair with player_a < player_b.
pub struct PostgresSocialGraph {
    pool: PgPool,
}

impl PostgresSocialGraph {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SocialGraph for PostgresSocialGraph {
    #[instrument(skip(self))]
    async fn friends_of(&self, player_uuid: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT CASE WHEN player_a = $1 THEN player_b ELSE player_a END \
             FROM friendships WHERE player_a = $1 OR player_b = $1 \
             ORDER BY 1",
        )
        .bind(player_uuid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, player_uuid = %player_uuid, "Failed to list friends");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn are_friends(&self, a: &str, b: &str) -> Result<bool, AppError> {
        let (first, second) = ordered_pair(a, b);
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM friendships WHERE player_a = $1 AND player_b = $2)",
        )
        .bind(first)
        .bind(second)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to check friendship");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn send_request(&self, from: &str, to: &str) -> Result<RequestOutcome, AppError> {
        if self.are_friends(from, to).await? {
            return Ok(RequestOutcome::AlreadyFriends);
        }

        let pending = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM friend_requests \
             WHERE (from_uuid = $1 AND to_uuid = $2) OR (from_uuid = $2 AND to_uuid = $1))",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to check pending requests");
            AppError::DatabaseError(e.to_string())
        })?;
        if pending {
            return Ok(RequestOutcome::AlreadyRequested);
        }

        let request = FriendRequestModel::new(from.to_string(), to.to_string());
        sqlx::query(
            "INSERT INTO friend_requests (from_uuid, to_uuid, created_at) VALUES ($1, $2, $3)",
        )
        .bind(&request.from_uuid)
        .bind(&request.to_uuid)
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to store friend request");
            AppError::DatabaseError(e.to_string())
        })?;

        info!(from = %from, to = %to, "Friend request stored in database");
        Ok(RequestOutcome::Sent)
    }

    #[instrument(skip(self))]
    async fn pending_requests_for(
        &self,
        player_uuid: &str,
    ) -> Result<Vec<FriendRequestModel>, AppError> {
        sqlx::query_as::<_, FriendRequestModel>(
            "SELECT from_uuid, to_uuid, created_at FROM friend_requests \
             WHERE to_uuid = $1 ORDER BY created_at ASC",
        )
        .bind(player_uuid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, player_uuid = %player_uuid, "Failed to list pending requests");
            AppError::DatabaseError(e.to_string())
        })
    }

    /// Deleting the request and recording the friendship happen in one
    /// transaction.
    #[instrument(skip(self))]
    async fn accept_request(&self, from: &str, to: &str) -> Result<ResolveOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to open accept transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        let deleted = sqlx::query(
            "DELETE FROM friend_requests WHERE from_uuid = $1 AND to_uuid = $2",
        )
        .bind(from)
        .bind(to)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to delete friend request");
            AppError::DatabaseError(e.to_string())
        })?;

        if deleted.rows_affected() == 0 {
            return Ok(ResolveOutcome::RequestNotFound);
        }

        let (first, second) = ordered_pair(from, to);
        sqlx::query(
            "INSERT INTO friendships (player_a, player_b, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(first)
        .bind(second)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to record friendship");
            AppError::DatabaseError(e.to_string())
        })?;

        tx.commit().await.map_err(|e| {
            warn!(error = %e, "Failed to commit accept transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        info!(from = %from, to = %to, "Friend request accepted in database");
        Ok(ResolveOutcome::Resolved)
    }

    #[instrument(skip(self))]
    async fn reject_request(&self, from: &str, to: &str) -> Result<ResolveOutcome, AppError> {
        let deleted = sqlx::query(
            "DELETE FROM friend_requests WHERE from_uuid = $1 AND to_uuid = $2",
        )
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to delete friend request");
            AppError::DatabaseError(e.to_string())
        })?;

        if deleted.rows_affected() == 0 {
            return Ok(ResolveOutcome::RequestNotFound);
        }

        info!(from = %from, to = %to, "Friend request rejected in database");
        Ok(ResolveOutcome::Resolved)
    }
}
