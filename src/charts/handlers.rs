use axum::{
    extract::{Query, State},
    Extension, Json,
};
use tracing::instrument;

use super::{progress_series, ChartSeries};
use crate::modes::GameMode;
use crate::score::types::ScoreQuery;
use crate::session::SessionClaims;
use crate::shared::{AppError, AppState};

/// HTTP handler for the caller's score-progress chart data
///
/// GET /charts/progress?mode=<code>
/// One chronological (recorded_at, score) series per mode.
#[instrument(name = "progress_chart", skip(state, claims))]
pub async fn progress_chart(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<ScoreQuery>,
) -> Result<Json<Vec<ChartSeries>>, AppError> {
    let mode = match query.mode.as_deref() {
        Some(code) => Some(
            GameMode::from_code(code)
                .map_err(|e| AppError::NotFound(e.to_string()))?,
        ),
        None => None,
    };

    let entries = state
        .leaderboard
        .player_scores(&claims.player_uuid, None)
        .await?;

    Ok(Json(progress_series(&entries, mode)))
}
