//! Request parsing for the content server.
//!
//! JSON bodies are read as raw bytes and decoded here so that malformed input
//! is reported as a 400 with the standard error body. Multipart uploads are
//! read field by field, enforcing the upload ceiling while streaming.

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use bytes::BytesMut;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::model::{NewCheatSheet, NewStrategy, NewVideoLink, NewVideoUpload, UploadedFile};
use crate::uploads::MediaKind;
use crate::ContentDb;

/// Largest accepted JSON request body.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Body of `POST /api/videos/link`.
#[derive(Debug, Default, Deserialize)]
pub struct VideoLinkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
}

impl VideoLinkRequest {
    pub fn into_new(self) -> Result<NewVideoLink> {
        NewVideoLink::new(self.title, self.url, self.category)
    }
}

/// Body of `POST /api/strategies`.
#[derive(Debug, Default, Deserialize)]
pub struct StrategyRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl StrategyRequest {
    pub fn into_new(self) -> Result<NewStrategy> {
        NewStrategy::new(self.title, self.content)
    }
}

/// Decodes a JSON request body that axum has already buffered.
pub fn from_json_body<T: DeserializeOwned>(
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<T> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge(rejection.body_text())
        } else {
            Error::InvalidInput(rejection.body_text())
        }
    })?;
    serde_json::from_slice(&body)
        .map_err(|e| Error::InvalidInput(format!("invalid JSON body: {}", e)))
}

/// Fields collected from a multipart upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Reads every field of `multipart`, taking the file from `file_field`.
    ///
    /// The file is rejected with [`Error::PayloadTooLarge`] as soon as it
    /// grows past the ceiling for `kind`. Unknown fields are skipped.
    pub async fn read(
        multipart: std::result::Result<Multipart, MultipartRejection>,
        file_field: &str,
        kind: MediaKind,
        db: &ContentDb,
    ) -> Result<Self> {
        let mut multipart = multipart.map_err(|rejection| Error::InvalidInput(rejection.body_text()))?;
        let mut form = UploadForm::default();

        while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.title = Some(field.text().await.map_err(multipart_error)?),
                "category" => form.category = Some(field.text().await.map_err(multipart_error)?),
                _ if name == file_field => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let mut buffer = BytesMut::new();
                    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                        db.check_upload_size(kind, buffer.len() + chunk.len())?;
                        buffer.extend_from_slice(&chunk);
                    }
                    form.file = Some(UploadedFile {
                        file_name,
                        bytes: buffer.freeze(),
                    });
                }
                _ => tracing::debug!(field = %name, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    pub fn into_video(self) -> Result<NewVideoUpload> {
        NewVideoUpload::new(self.title, self.category, self.file)
    }

    pub fn into_cheat_sheet(self) -> Result<NewCheatSheet> {
        NewCheatSheet::new(self.title, self.file)
    }
}

fn multipart_error(err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(err.body_text())
    } else {
        Error::InvalidInput(format!("invalid multipart body: {}", err.body_text()))
    }
}
