/// Library-specific errors
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library error types
#[derive(Error, Debug)]
pub enum LibraryError {
    /// File or directory not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Path is not usable for the requested operation
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Tag writing error
    #[error("Tag writing error: {0}")]
    TagWrite(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<LibraryError> for cadence_core::CadenceError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Io(e) => cadence_core::CadenceError::Io(e),
            other => cadence_core::CadenceError::metadata(other.to_string()),
        }
    }
}
