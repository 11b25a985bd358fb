use thiserror::Error;

use crate::modes::UnknownMode;
use crate::shared::AppError;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Unknown game mode: {0}")]
    UnknownMode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Profile not found for player {0}")]
    ProfileNotFound(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<UnknownMode> for ScoreError {
    fn from(err: UnknownMode) -> Self {
        ScoreError::UnknownMode(err.0)
    }
}

impl From<AppError> for ScoreError {
    fn from(err: AppError) -> Self {
        ScoreError::Repository(err.to_string())
    }
}

/// Conversion used at the handler boundary to pick HTTP status codes.
impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::UnknownMode(code) => {
                AppError::NotFound(format!("Unknown game mode: {}", code))
            }
            ScoreError::Validation(msg) => AppError::Validation(msg),
            ScoreError::ProfileNotFound(msg) => {
                AppError::NotFound(format!("Profile not found for player {}", msg))
            }
            ScoreError::Repository(msg) => AppError::DatabaseError(msg),
        }
    }
}
