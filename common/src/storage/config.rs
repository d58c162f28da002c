//! Storage configuration.

use serde::{Deserialize, Serialize};

/// Selects the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum StorageConfig {
    /// Volatile storage, for tests and throwaway runs.
    #[default]
    InMemory,
    /// Blobs stored as files below a root directory.
    Local(LocalStorageConfig),
}

/// Configuration for the local filesystem backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root directory; created on open if missing.
    pub path: String,
}
