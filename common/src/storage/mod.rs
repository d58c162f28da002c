//! Key-value blob storage shared by the content API and the study state.
//!
//! Every persisted structure in the portal is a whole blob addressed by a
//! slash-separated key (`videos.json`, `videos/1700000000000-intro.mp4`,
//! `notes`). Writers replace a blob in full; there is no partial update.

pub mod config;
pub mod factory;
pub mod in_memory;
pub mod local;

use async_trait::async_trait;
use bytes::Bytes;

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// I/O failures from the underlying backend.
    Storage(String),

    /// The key is not acceptable to the backend, e.g. it escapes the root.
    InvalidKey(String),

    /// Unexpected internal errors.
    Internal(String),
}

impl std::error::Error for StorageError {}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Storage(msg) => write!(f, "Storage error: {}", msg),
            StorageError::InvalidKey(key) => write!(f, "Invalid storage key: {}", key),
            StorageError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Storage(err.to_string())
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Read access to a blob store.
#[async_trait]
pub trait StorageRead: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if there is none.
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>>;

    /// Returns whether a blob exists under `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Read/write access to a blob store.
#[async_trait]
pub trait Storage: StorageRead {
    /// Replaces the blob stored under `key`.
    async fn put(&self, key: &str, value: Bytes) -> StorageResult<()>;

    /// Removes the blob stored under `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;
}

/// Validates a blob key.
///
/// Keys are relative, slash-separated and may not contain empty, `.` or `..`
/// segments or backslashes.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::flat("videos.json")]
    #[case::nested("videos/1700000000000-intro.mp4")]
    #[case::dotted_name("cheatsheets/1700000000000-.hidden")]
    fn should_accept_relative_keys(#[case] key: &str) {
        assert!(validate_key(key).is_ok());
    }

    #[rstest]
    #[case::empty("")]
    #[case::absolute("/etc/passwd")]
    #[case::parent("videos/../../secret")]
    #[case::current("./videos.json")]
    #[case::empty_segment("videos//a.mp4")]
    #[case::backslash("videos\\a.mp4")]
    fn should_reject_escaping_keys(#[case] key: &str) {
        // when
        let result = validate_key(key);

        // then
        assert_eq!(result, Err(StorageError::InvalidKey(key.to_string())));
    }
}
