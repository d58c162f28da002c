//! Persisted study state records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kinds of content whose completion is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Strategy,
}

/// Completion state of one content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Id of the video or strategy; not checked against the catalog.
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub completed: bool,
}

impl ProgressEntry {
    pub fn is_for(&self, id: &str, content_type: ContentType) -> bool {
        self.id == id && self.content_type == content_type
    }
}

/// A personal note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub content: String,
    /// Insertion-ordered, without duplicates.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Drops repeated tags, keeping the first occurrence of each.
pub(crate) fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}
