//! Error types for study state operations.

use common::StorageError;

/// Error type for study state operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The key-value store could not be read or written.
    Storage(String),

    /// A persisted blob is not valid JSON for its state.
    Encoding(String),

    /// No note exists with the given id.
    NotFound(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
            Error::Encoding(msg) => write!(f, "Encoding error: {}", msg),
            Error::NotFound(id) => write!(f, "Note not found: {}", id),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

/// Result type alias for study state operations.
pub type Result<T> = std::result::Result<T, Error>;
