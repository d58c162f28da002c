//! Core data types for the content store.
//!
//! Records are what the API persists and returns; the `New*` types are
//! validated create requests. A `New*` value can only be built with every
//! required field present, so the store never sees a partial submission.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Category assigned to videos submitted without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// A record stored in a collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

/// Where a video's bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VideoSource {
    /// An externally hosted video, e.g. an embed URL.
    External { url: String },
    /// An uploaded file, referenced by its `/uploads/...` path.
    Stored { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub source: VideoSource,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheatSheetRecord {
    pub id: String,
    pub title: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

macro_rules! impl_record {
    ($($ty:ty),*) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_record!(VideoRecord, StrategyRecord, CheatSheetRecord);

/// A file received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The client-supplied file name, unsanitized.
    pub file_name: String,
    pub bytes: Bytes,
}

/// Validated request to register an externally hosted video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideoLink {
    pub title: String,
    pub url: String,
    pub category: String,
}

impl NewVideoLink {
    pub fn new(title: Option<String>, url: Option<String>, category: Option<String>) -> Result<Self> {
        match (present(title), present(url)) {
            (Some(title), Some(url)) => Ok(Self {
                title,
                url,
                category: category_or_default(category),
            }),
            _ => Err(Error::InvalidInput("title and url are required".to_string())),
        }
    }
}

/// Validated request to upload a video file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideoUpload {
    pub title: String,
    pub category: String,
    pub file: UploadedFile,
}

impl NewVideoUpload {
    pub fn new(
        title: Option<String>,
        category: Option<String>,
        file: Option<UploadedFile>,
    ) -> Result<Self> {
        let file = file.ok_or_else(|| Error::InvalidInput("video file is required".to_string()))?;
        let title = present(title).ok_or_else(|| Error::InvalidInput("title is required".to_string()))?;
        Ok(Self {
            title,
            category: category_or_default(category),
            file,
        })
    }
}

/// Validated request to publish a strategy write-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStrategy {
    pub title: String,
    pub content: String,
}

impl NewStrategy {
    pub fn new(title: Option<String>, content: Option<String>) -> Result<Self> {
        match (present(title), present(content)) {
            (Some(title), Some(content)) => Ok(Self { title, content }),
            _ => Err(Error::InvalidInput(
                "title and content are required".to_string(),
            )),
        }
    }
}

/// Validated request to upload a cheat sheet document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheatSheet {
    pub title: String,
    pub file: UploadedFile,
}

impl NewCheatSheet {
    pub fn new(title: Option<String>, file: Option<UploadedFile>) -> Result<Self> {
        let file = file.ok_or_else(|| Error::InvalidInput("file is required".to_string()))?;
        let title = present(title).ok_or_else(|| Error::InvalidInput("title is required".to_string()))?;
        Ok(Self { title, file })
    }
}

/// Treats empty strings as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn category_or_default(category: Option<String>) -> String {
    present(category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn file() -> Option<UploadedFile> {
        Some(UploadedFile {
            file_name: "intro.mp4".to_string(),
            bytes: Bytes::from_static(b"abc"),
        })
    }

    #[test]
    fn should_default_video_category() {
        // when
        let link = NewVideoLink::new(s("Intro"), s("https://example.com/v"), s("")).unwrap();

        // then
        assert_eq!(link.category, DEFAULT_CATEGORY);
    }

    #[rstest]
    #[case::missing_title(None, s("https://example.com/v"))]
    #[case::empty_title(s(""), s("https://example.com/v"))]
    #[case::missing_url(s("Intro"), None)]
    #[case::both_missing(None, None)]
    fn should_require_title_and_url(#[case] title: Option<String>, #[case] url: Option<String>) {
        // when
        let result = NewVideoLink::new(title, url, None);

        // then
        assert_eq!(
            result,
            Err(Error::InvalidInput("title and url are required".to_string()))
        );
    }

    #[test]
    fn should_check_upload_file_before_title() {
        assert_eq!(
            NewVideoUpload::new(None, None, None),
            Err(Error::InvalidInput("video file is required".to_string()))
        );
        assert_eq!(
            NewVideoUpload::new(None, None, file()),
            Err(Error::InvalidInput("title is required".to_string()))
        );
        assert_eq!(
            NewCheatSheet::new(s("Pairs"), None),
            Err(Error::InvalidInput("file is required".to_string()))
        );
        assert_eq!(
            NewCheatSheet::new(s(""), file()),
            Err(Error::InvalidInput("title is required".to_string()))
        );
    }

    #[rstest]
    #[case::missing_content(s("Risk 101"), None)]
    #[case::empty_content(s("Risk 101"), s(""))]
    #[case::missing_title(None, s("Never risk >2%"))]
    fn should_require_strategy_fields(
        #[case] title: Option<String>,
        #[case] content: Option<String>,
    ) {
        assert_eq!(
            NewStrategy::new(title, content),
            Err(Error::InvalidInput(
                "title and content are required".to_string()
            ))
        );
    }

    #[test]
    fn should_serialize_linked_video_with_url_field() {
        // given
        let record = VideoRecord {
            id: "v1".to_string(),
            title: "Intro".to_string(),
            source: VideoSource::External {
                url: "https://example.com/v".to_string(),
            },
            category: "General".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };

        // when
        let json = serde_json::to_value(&record).unwrap();

        // then
        assert_eq!(
            json,
            serde_json::json!({
                "id": "v1",
                "title": "Intro",
                "url": "https://example.com/v",
                "category": "General",
                "createdAt": "2024-05-01T12:00:00Z"
            })
        );
    }

    #[test]
    fn should_deserialize_stored_video_from_path_field() {
        // given
        let json = r#"{"id":"v2","title":"Upload","path":"/uploads/videos/1-a.mp4",
            "category":"General","createdAt":"2024-05-01T12:00:00.000Z"}"#;

        // when
        let record: VideoRecord = serde_json::from_str(json).unwrap();

        // then
        assert_eq!(
            record.source,
            VideoSource::Stored {
                path: "/uploads/videos/1-a.mp4".to_string()
            }
        );
    }
}
