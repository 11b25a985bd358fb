use axum::Json;
use strum::IntoEnumIterator;
use tracing::instrument;

use super::{GameMode, GameModeInfo};

/// HTTP handler for listing the available game modes
///
/// GET /modes
/// Returns the mode table the client uses to build its dropdown
#[instrument(name = "list_modes")]
pub async fn list_modes() -> Json<Vec<GameModeInfo>> {
    Json(GameMode::iter().map(GameModeInfo::from).collect())
}
