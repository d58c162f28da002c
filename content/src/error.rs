//! Error types for content store operations.
//!
//! This module defines [`Error`], the primary error type for all content
//! operations, along with a convenient [`Result`] type alias.

use common::{StorageError, WriteError};

/// Error type for content store operations.
///
/// # Error Categories
///
/// - [`Storage`](Error::Storage): the collection or upload store could not be
///   read or written.
/// - [`Encoding`](Error::Encoding): a persisted collection is not a valid JSON
///   array of records.
/// - [`InvalidInput`](Error::InvalidInput): a required field is missing or the
///   request body is malformed.
/// - [`PayloadTooLarge`](Error::PayloadTooLarge): an upload exceeds the ceiling
///   for its kind.
/// - [`NotFound`](Error::NotFound): an uploaded file does not exist.
/// - [`Backpressure`](Error::Backpressure): the collection's write queue is full.
/// - [`Internal`](Error::Internal): invariant violations, e.g. a stopped writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Storage(String),
    Encoding(String),
    InvalidInput(String),
    PayloadTooLarge(String),
    NotFound(String),
    Backpressure,
    Internal(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
            Error::Encoding(msg) => write!(f, "Encoding error: {}", msg),
            Error::InvalidInput(msg) => write!(f, "{}", msg),
            Error::PayloadTooLarge(msg) => write!(f, "{}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::Backpressure => write!(f, "Too many pending writes, retry later"),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Storage(msg) => Error::Storage(msg),
            StorageError::InvalidKey(key) => Error::InvalidInput(format!("invalid path: {}", key)),
            StorageError::Internal(msg) => Error::Internal(msg),
        }
    }
}

impl From<WriteError> for Error {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Backpressure => Error::Backpressure,
            WriteError::Shutdown => Error::Internal("collection writer has stopped".to_string()),
            WriteError::ApplyError(_, msg) => Error::Storage(msg),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

/// Result type alias for content store operations.
pub type Result<T> = std::result::Result<T, Error>;
