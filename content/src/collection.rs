//! A record collection persisted as a single JSON array blob.
//!
//! Reads load the whole blob. Inserts go through the collection's write
//! coordinator, which performs the read-modify-write cycle for one insert at
//! a time so that concurrent creates never overwrite each other.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use common::{
    Applier, Storage, WriteCoordinator, WriteCoordinatorConfig, WriteCoordinatorHandle,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::Record;

/// Decodes a collection blob. A missing blob is an empty collection.
fn decode<R: Record>(key: &str, blob: Option<Bytes>) -> Result<Vec<R>> {
    match blob {
        None => Ok(Vec::new()),
        Some(bytes) => serde_json::from_slice(&bytes)
            .map_err(|e| Error::Encoding(format!("collection '{}' is corrupt: {}", key, e))),
    }
}

fn encode<R: Record>(records: &[R]) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec_pretty(records)?))
}

/// Applies inserts to a collection blob.
struct InsertApplier<R: Record> {
    key: String,
    storage: Arc<dyn Storage>,
    _record: PhantomData<fn() -> R>,
}

#[async_trait]
impl<R: Record> Applier for InsertApplier<R> {
    type Write = R;
    type Output = R;

    async fn apply(&mut self, mut record: R) -> std::result::Result<R, String> {
        let blob = self.storage.get(&self.key).await.map_err(|e| e.to_string())?;
        let mut records: Vec<R> = decode(&self.key, blob).map_err(|e| e.to_string())?;

        while records.iter().any(|r| r.id() == record.id()) {
            record.set_id(Uuid::new_v4().to_string());
        }

        records.insert(0, record.clone());
        let blob = encode(&records).map_err(|e| e.to_string())?;
        self.storage.put(&self.key, blob).await.map_err(|e| e.to_string())?;

        tracing::debug!(
            collection = %self.key,
            id = %record.id(),
            size = records.len(),
            "record inserted"
        );
        Ok(record)
    }
}

/// A JSON-array-backed collection of records, most recent first.
pub struct Collection<R: Record> {
    name: &'static str,
    key: String,
    storage: Arc<dyn Storage>,
    writer: WriteCoordinatorHandle<InsertApplier<R>>,
}

impl<R: Record> Collection<R> {
    /// Opens the collection stored at `<name>.json`, creating an empty one if
    /// missing, and starts its writer task.
    pub async fn open(
        name: &'static str,
        storage: Arc<dyn Storage>,
        config: WriteCoordinatorConfig,
    ) -> Result<Self> {
        let key = format!("{}.json", name);
        if !storage.exists(&key).await? {
            storage.put(&key, Bytes::from_static(b"[]")).await?;
            tracing::info!(collection = name, "initialized empty collection");
        }

        let applier = InsertApplier {
            key: key.clone(),
            storage: storage.clone(),
            _record: PhantomData,
        };
        let (writer, _task) = WriteCoordinator::spawn(name, config, applier);

        Ok(Self {
            name,
            key,
            storage,
            writer,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns every record, most recently created first.
    pub async fn list(&self) -> Result<Vec<R>> {
        let blob = self.storage.get(&self.key).await?;
        decode(&self.key, blob)
    }

    /// Prepends `record` and persists the collection.
    ///
    /// The record's id is replaced if it collides with an existing one; the
    /// stored record is returned.
    pub async fn insert(&self, record: R) -> Result<R> {
        Ok(self.writer.write(record).await?)
    }

    /// Verifies the collection blob can be read.
    pub async fn check(&self) -> Result<()> {
        self.storage.get(&self.key).await?;
        Ok(())
    }
}
