//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The player service task has ended
    #[error("Player service is not running")]
    ServiceClosed,

    /// The service dropped a reply channel
    #[error("Player service did not reply")]
    NoReply,

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Collaborator failure
    #[error(transparent)]
    Core(#[from] cadence_core::CadenceError),

    /// Persisted value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<PlaybackError> for cadence_core::CadenceError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::Core(inner) => inner,
            PlaybackError::Serialization(e) => cadence_core::CadenceError::Serialization(e),
            other => cadence_core::CadenceError::Other(other.to_string()),
        }
    }
}
