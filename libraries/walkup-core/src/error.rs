/// Core error types for the walk-up manager
use thiserror::Error;

use crate::types::PlayerId;

/// Result type alias using `WalkupError`
pub type Result<T> = std::result::Result<T, WalkupError>;

/// Core error type for the walk-up manager
#[derive(Error, Debug)]
pub enum WalkupError {
    /// User input rejected before any mutation happened
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Player not found in the roster
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// Rejected lineup order
    #[error("Invalid lineup: {0}")]
    InvalidLineup(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Playback mechanism errors
    #[error("Playback error: {0}")]
    Playback(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl WalkupError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid lineup error
    pub fn invalid_lineup(msg: impl Into<String>) -> Self {
        Self::InvalidLineup(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Whether this error is a user-input validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
