//! Whole-blob JSON persistence shared by the study containers.

use bytes::Bytes;
use common::Storage;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Reads the state stored under `key`, or the default state if there is none.
pub(crate) async fn load<T>(storage: &dyn Storage, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match storage.get(key).await? {
        Some(blob) => Ok(serde_json::from_slice(&blob)?),
        None => Ok(T::default()),
    }
}

/// Replaces the state stored under `key`.
pub(crate) async fn save<T: Serialize>(storage: &dyn Storage, key: &str, state: &T) -> Result<()> {
    let blob = serde_json::to_vec(state)?;
    let size = blob.len();
    storage.put(key, Bytes::from(blob)).await?;
    tracing::trace!(key, bytes = size, "study state saved");
    Ok(())
}
