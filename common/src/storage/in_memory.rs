//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use super::{Storage, StorageError, StorageRead, StorageResult, validate_key};

/// Volatile blob store backed by a hash map.
#[derive(Default)]
pub struct InMemoryStorage {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all stored keys in sorted order.
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| StorageError::Internal("storage lock poisoned".into()))?;
        let mut keys: Vec<String> = blobs.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl StorageRead for InMemoryStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        validate_key(key)?;
        let blobs = self
            .blobs
            .read()
            .map_err(|_| StorageError::Internal("storage lock poisoned".into()))?;
        Ok(blobs.get(key).cloned())
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn put(&self, key: &str, value: Bytes) -> StorageResult<()> {
        validate_key(key)?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| StorageError::Internal("storage lock poisoned".into()))?;
        blobs.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| StorageError::Internal("storage lock poisoned".into()))?;
        blobs.remove(key);
        Ok(())
    }
}
