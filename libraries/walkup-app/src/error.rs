/// Application error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised while setting up the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Storage(#[from] walkup_storage::StorageError),

    #[error(transparent)]
    Playback(#[from] walkup_playback::PlaybackError),

    #[error(transparent)]
    Walkup(#[from] walkup_core::WalkupError),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
