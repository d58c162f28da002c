//! Storage factory for creating storage instances from configuration.

use std::sync::Arc;

use super::config::StorageConfig;
use super::in_memory::InMemoryStorage;
use super::local::LocalStorage;
use super::{Storage, StorageResult};

/// Creates a storage instance based on configuration.
///
/// # Example
///
/// ```rust,ignore
/// let storage = create_storage(&StorageConfig::Local(LocalStorageConfig {
///     path: "server/data".to_string(),
/// }))?;
/// ```
pub fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    match config {
        StorageConfig::InMemory => Ok(Arc::new(InMemoryStorage::new())),
        StorageConfig::Local(local_config) => {
            let storage = LocalStorage::open(&local_config.path)?;
            tracing::debug!(path = %local_config.path, "opened local storage");
            Ok(Arc::new(storage))
        }
    }
}
