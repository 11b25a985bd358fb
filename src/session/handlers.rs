use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::types::{CreateSessionRequest, SessionResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new session
///
/// POST /session
/// Accepts an optional username; returns a JWT token as session_id,
/// the resolved username and the player's identity. The player's
/// profile is registered as part of this call.
#[instrument(name = "create_session", skip(state, request))]
pub async fn create_session(
    State(state): State<AppState>,
    request: Option<Json<CreateSessionRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    let requested_username = request.and_then(|Json(body)| body.username);

    let session = state
        .session_service
        .create_session(requested_username)
        .await?;

    info!(
        username = %session.username,
        player_uuid = %session.player_uuid,
        "Session created successfully"
    );

    Ok(Json(session))
}
