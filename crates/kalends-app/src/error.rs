use kalends_recur::RecurrenceError;
use thiserror::Error;

/// Application errors - wraps the library layers plus file and argument handling
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    CoreError(#[from] kalends_core::error::CoreError),

    #[error(transparent)]
    RecurrenceError(#[from] RecurrenceError),

    #[error("Invalid event {name:?}: {reason}")]
    InvalidEvent { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid agenda file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid time format {0:?}")]
    InvalidTimeFormat(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
