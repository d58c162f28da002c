//! Storage of uploaded media files.
//!
//! Files are stored under `<kind-dir>/<epoch-ms>-<sanitized-name>` in the
//! upload storage and exposed to clients as `/uploads/<kind-dir>/<file>`.

use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;
use tokio::sync::Mutex;
use common::Storage;
use common::clock::epoch_millis;

use crate::error::{Error, Result};

/// URL prefix under which uploaded files are served.
pub const UPLOADS_ROUTE_PREFIX: &str = "/uploads";

/// The kinds of media accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    CheatSheet,
}

impl MediaKind {
    /// Subdirectory of the upload storage holding files of this kind.
    pub fn dir(&self) -> &'static str {
        match self {
            MediaKind::Video => "videos",
            MediaKind::CheatSheet => "cheatsheets",
        }
    }
}

/// Per-kind upload size ceilings in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub video: usize,
    pub document: usize,
}

impl UploadLimits {
    pub fn for_kind(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Video => self.video,
            MediaKind::CheatSheet => self.document,
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            video: 200 * 1024 * 1024,
            document: 50 * 1024 * 1024,
        }
    }
}

/// A file written to the upload storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Storage key, e.g. `videos/1700000000000-intro.mp4`.
    pub key: String,
    /// Public path, e.g. `/uploads/videos/1700000000000-intro.mp4`.
    pub public_path: String,
}

/// Makes a client-supplied file name safe to use as a single path segment.
///
/// Directory components are dropped, whitespace runs become `-`, anything
/// outside `[A-Za-z0-9._-]` becomes `_` and leading dots are removed.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut out = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
        } else {
            out.push('_');
        }
    }

    let trimmed = out.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Writes uploaded files and reads them back for the static route.
pub struct UploadStore {
    storage: Arc<dyn Storage>,
    limits: UploadLimits,
    /// Held while a name is chosen and written, one per kind directory.
    video_names: Mutex<()>,
    document_names: Mutex<()>,
}

impl UploadStore {
    pub fn new(storage: Arc<dyn Storage>, limits: UploadLimits) -> Self {
        Self {
            storage,
            limits,
            video_names: Mutex::new(()),
            document_names: Mutex::new(()),
        }
    }

    fn names_lock(&self, kind: MediaKind) -> &Mutex<()> {
        match kind {
            MediaKind::Video => &self.video_names,
            MediaKind::CheatSheet => &self.document_names,
        }
    }

    /// Rejects payloads over the ceiling for `kind`.
    pub fn check_size(&self, kind: MediaKind, size: usize) -> Result<()> {
        let limit = self.limits.for_kind(kind);
        if size > limit {
            return Err(Error::PayloadTooLarge(format!(
                "{} upload of {} bytes exceeds the {} byte limit",
                kind.dir(),
                size,
                limit
            )));
        }
        Ok(())
    }

    /// Stores `bytes` under a name derived from the submission time and the
    /// original file name.
    ///
    /// If the name is already taken, the millisecond component is bumped
    /// until a free name is found. Stores of the same kind are serialized so
    /// two uploads can never pick the same free name.
    pub async fn store(
        &self,
        kind: MediaKind,
        original_name: &str,
        bytes: Bytes,
        submitted_at: SystemTime,
    ) -> Result<StoredUpload> {
        self.check_size(kind, bytes.len())?;

        let name = sanitize_file_name(original_name);
        let _reserved = self.names_lock(kind).lock().await;
        let mut millis = epoch_millis(submitted_at);
        let key = loop {
            let candidate = format!("{}/{}-{}", kind.dir(), millis, name);
            if !self.storage.exists(&candidate).await? {
                break candidate;
            }
            millis += 1;
        };

        let size = bytes.len();
        self.storage.put(&key, bytes).await?;
        tracing::info!(key = %key, bytes = size, "stored upload");

        Ok(StoredUpload {
            public_path: format!("{}/{}", UPLOADS_ROUTE_PREFIX, key),
            key,
        })
    }

    /// Reads an uploaded file by its storage key.
    pub async fn read(&self, key: &str) -> Result<Bytes> {
        self.storage
            .get(key)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{}/{}", UPLOADS_ROUTE_PREFIX, key)))
    }

    /// Best-effort removal, used when the record for an upload cannot be saved.
    pub async fn discard(&self, upload: &StoredUpload) {
        if let Err(e) = self.storage.delete(&upload.key).await {
            tracing::warn!(key = %upload.key, error = %e, "failed to remove orphaned upload");
        }
    }

    /// Verifies the upload storage is reachable.
    pub async fn check(&self) -> Result<()> {
        self.storage.exists(MediaKind::Video.dir()).await?;
        Ok(())
    }
}
