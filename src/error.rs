use thiserror::Error;

use crate::storage::StorageError;

pub type AppResult<T> = core::result::Result<T, AppError>;

/// Errors surfaced at the command-line boundary.
///
/// The trackers themselves never fail: missing records are no-ops and
/// persistence failures are logged. These variants cover what the
/// presentation layer rejects before calling into a view-model.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for AppError {
    fn from(value: dialoguer::Error) -> Self {
        Self::Config(value.to_string())
    }
}
