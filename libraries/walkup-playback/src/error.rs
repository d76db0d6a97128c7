//! Error types for playback

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Local audio output failed to start or decode
    #[error("Audio output error: {0}")]
    Output(String),

    /// Embed surface could not be rendered
    #[error("Embed error: {0}")]
    Embed(String),

    /// Operation not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl PlaybackError {
    /// Create an output error
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    /// Create an embed error
    pub fn embed(msg: impl Into<String>) -> Self {
        Self::Embed(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<PlaybackError> for walkup_core::WalkupError {
    fn from(err: PlaybackError) -> Self {
        walkup_core::WalkupError::playback(err.to_string())
    }
}
