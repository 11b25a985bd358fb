use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use tracing::{info, instrument};

use super::models::ScoreModel;
use super::types::{ModeLeaderboardEntry, ScoreQuery, SubmitScoreRequest, SubmitScoreResponse};
use crate::profile::ProfileResponse;
use crate::session::SessionClaims;
use crate::shared::{AppError, AppState};

/// HTTP handler for submitting a finished game
///
/// POST /scores
/// Persists the entry, updates the caller's best metrics and, when the
/// best score rose, the global ranking.
#[instrument(name = "submit_score", skip(state, claims, request))]
pub async fn submit_score(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<SubmitScoreRequest>,
) -> Result<Json<SubmitScoreResponse>, AppError> {
    info!(
        player_uuid = %claims.player_uuid,
        game_mode = %request.game_mode,
        "Score submission received"
    );

    let response = state
        .leaderboard
        .submit_score(&claims.player_uuid, request)
        .await?;

    Ok(Json(response))
}

/// HTTP handler for the caller's own score history
///
/// GET /scores?mode=<code>
/// Entries best first, optionally restricted to one mode.
#[instrument(name = "my_scores", skip(state, claims))]
pub async fn my_scores(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<ScoreQuery>,
) -> Result<Json<Vec<ScoreModel>>, AppError> {
    let scores = state
        .leaderboard
        .player_scores(&claims.player_uuid, query.mode.as_deref())
        .await?;

    Ok(Json(scores))
}

/// HTTP handler for the global ranking list
///
/// GET /leaderboard
/// Profiles in rank order; players awaiting their first ranking pass
/// come last.
#[instrument(name = "global_leaderboard", skip(state))]
pub async fn global_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let ranking = state.leaderboard.global_ranking().await?;

    Ok(Json(ranking.into_iter().map(ProfileResponse::from).collect()))
}

/// HTTP handler for a single mode's top scores
///
/// GET /leaderboard/:mode
#[instrument(name = "mode_leaderboard", skip(state))]
pub async fn mode_leaderboard(
    State(state): State<AppState>,
    Path(mode): Path<String>,
) -> Result<Json<Vec<ModeLeaderboardEntry>>, AppError> {
    let board = state.leaderboard.mode_leaderboard(&mode).await?;

    Ok(Json(board))
}
