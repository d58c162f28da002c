//! Configuration for opening a [`ContentDb`](crate::ContentDb).

use common::{StorageConfig, WriteCoordinatorConfig};

use crate::uploads::UploadLimits;

/// Configuration for the content store.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Where the collection blobs (`videos.json`, ...) live.
    pub data: StorageConfig,

    /// Where uploaded media files live.
    pub uploads: StorageConfig,

    /// Per-kind upload size ceilings.
    pub upload_limits: UploadLimits,

    /// Queue settings for each collection's writer.
    pub writer: WriteCoordinatorConfig,
}
