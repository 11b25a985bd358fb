use axum::{extract::State, Extension, Json};
use tracing::{info, instrument};

use super::types::{ProfileResponse, UpdateProfileRequest};
use crate::session::SessionClaims;
use crate::shared::{AppError, AppState};

const MAX_USERNAME_LENGTH: usize = 32;

/// HTTP handler for reading the caller's own profile
///
/// GET /profile
#[instrument(name = "get_profile", skip(state, claims))]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .profile_repository
        .get_profile(&claims.player_uuid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse::from(profile)))
}

/// HTTP handler for editing the caller's own profile
///
/// PUT /profile
/// Only the display name and picture are writable; best metrics and
/// rank belong to the score-submission flow.
#[instrument(name = "update_profile", skip(state, claims, request))]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut profile = state
        .profile_repository
        .get_profile(&claims.player_uuid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    if let Some(username) = request.username {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::Validation("Username must not be empty".to_string()));
        }
        if username.len() > MAX_USERNAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LENGTH
            )));
        }
        profile.username = username;
    }

    if let Some(picture_url) = request.picture_url {
        profile.picture_url = Some(picture_url);
    }

    state.profile_repository.update_profile(&profile).await?;

    info!(
        player_uuid = %profile.player_uuid,
        username = %profile.username,
        "Profile updated"
    );

    Ok(Json(ProfileResponse::from(profile)))
}
