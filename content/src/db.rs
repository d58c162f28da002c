//! The content store: three collections plus the upload storage.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{Clock, Storage, SystemClock, WriteCoordinatorConfig, create_storage};
use uuid::Uuid;

use crate::collection::Collection;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    CheatSheetRecord, NewCheatSheet, NewStrategy, NewVideoLink, NewVideoUpload,
    StrategyRecord, VideoRecord, VideoSource,
};
use crate::uploads::{MediaKind, UploadLimits, UploadStore};

/// Builder for [`ContentDb`] over explicit storage instances.
pub struct ContentDbBuilder {
    data: Arc<dyn Storage>,
    uploads: Arc<dyn Storage>,
    limits: UploadLimits,
    writer: WriteCoordinatorConfig,
    clock: Arc<dyn Clock>,
}

impl ContentDbBuilder {
    pub fn new(data: Arc<dyn Storage>, uploads: Arc<dyn Storage>) -> Self {
        Self {
            data,
            uploads,
            limits: UploadLimits::default(),
            writer: WriteCoordinatorConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_upload_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_writer_config(mut self, writer: WriteCoordinatorConfig) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn build(self) -> Result<ContentDb> {
        let videos = Collection::open("videos", self.data.clone(), self.writer.clone()).await?;
        let strategies =
            Collection::open("strategies", self.data.clone(), self.writer.clone()).await?;
        let cheat_sheets = Collection::open("cheatsheets", self.data, self.writer).await?;
        tracing::info!(
            collections = ?[videos.name(), strategies.name(), cheat_sheets.name()],
            "content store opened"
        );

        Ok(ContentDb {
            videos,
            strategies,
            cheat_sheets,
            uploads: UploadStore::new(self.uploads, self.limits),
            clock: self.clock,
        })
    }
}

/// Video, strategy and cheat sheet collections with their uploaded files.
///
/// `ContentDb` is shared across request handlers behind an `Arc`. Reads go
/// straight to storage; each collection serializes its own inserts.
pub struct ContentDb {
    videos: Collection<VideoRecord>,
    strategies: Collection<StrategyRecord>,
    cheat_sheets: Collection<CheatSheetRecord>,
    uploads: UploadStore,
    clock: Arc<dyn Clock>,
}

impl ContentDb {
    /// Opens the store described by `config`.
    pub async fn open(config: Config) -> Result<Self> {
        let data = create_storage(&config.data)?;
        let uploads = create_storage(&config.uploads)?;
        ContentDbBuilder::new(data, uploads)
            .with_upload_limits(config.upload_limits)
            .with_writer_config(config.writer)
            .build()
            .await
    }

    /// Rejects an upload of `size` bytes that exceeds the ceiling for `kind`.
    pub fn check_upload_size(&self, kind: MediaKind, size: usize) -> Result<()> {
        self.uploads.check_size(kind, size)
    }

    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.clock.now())
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>> {
        self.videos.list().await
    }

    /// Registers an externally hosted video.
    pub async fn add_video_link(&self, new: NewVideoLink) -> Result<VideoRecord> {
        let record = VideoRecord {
            id: Self::new_id(),
            title: new.title,
            source: VideoSource::External { url: new.url },
            category: new.category,
            created_at: self.now(),
        };
        self.videos.insert(record).await
    }

    /// Stores an uploaded video file and registers it.
    pub async fn add_video_upload(&self, new: NewVideoUpload) -> Result<VideoRecord> {
        let submitted_at = self.clock.now();
        let stored = self
            .uploads
            .store(MediaKind::Video, &new.file.file_name, new.file.bytes, submitted_at)
            .await?;

        let record = VideoRecord {
            id: Self::new_id(),
            title: new.title,
            source: VideoSource::Stored {
                path: stored.public_path.clone(),
            },
            category: new.category,
            created_at: DateTime::<Utc>::from(submitted_at),
        };
        match self.videos.insert(record).await {
            Ok(record) => Ok(record),
            Err(e) => {
                self.uploads.discard(&stored).await;
                Err(e)
            }
        }
    }

    pub async fn list_strategies(&self) -> Result<Vec<StrategyRecord>> {
        self.strategies.list().await
    }

    pub async fn add_strategy(&self, new: NewStrategy) -> Result<StrategyRecord> {
        let record = StrategyRecord {
            id: Self::new_id(),
            title: new.title,
            content: new.content,
            created_at: self.now(),
        };
        self.strategies.insert(record).await
    }

    pub async fn list_cheat_sheets(&self) -> Result<Vec<CheatSheetRecord>> {
        self.cheat_sheets.list().await
    }

    /// Stores an uploaded cheat sheet document and registers it.
    pub async fn add_cheat_sheet(&self, new: NewCheatSheet) -> Result<CheatSheetRecord> {
        let submitted_at = self.clock.now();
        let stored = self
            .uploads
            .store(
                MediaKind::CheatSheet,
                &new.file.file_name,
                new.file.bytes,
                submitted_at,
            )
            .await?;

        let record = CheatSheetRecord {
            id: Self::new_id(),
            title: new.title,
            path: stored.public_path.clone(),
            created_at: DateTime::<Utc>::from(submitted_at),
        };
        match self.cheat_sheets.insert(record).await {
            Ok(record) => Ok(record),
            Err(e) => {
                self.uploads.discard(&stored).await;
                Err(e)
            }
        }
    }

    /// Reads an uploaded file by its path below `/uploads/`.
    pub async fn read_upload(&self, path: &str) -> Result<bytes::Bytes> {
        self.uploads.read(path).await
    }

    /// Lightweight check that every backing store is readable.
    pub async fn check_storage(&self) -> Result<()> {
        self.videos.check().await?;
        self.strategies.check().await?;
        self.cheat_sheets.check().await?;
        self.uploads.check().await
    }
}
