//! Completion tracking for videos and strategies.

use std::sync::Arc;

use common::Storage;

use crate::error::Result;
use crate::model::{ContentType, ProgressEntry};
use crate::state;

/// Key under which the entry set is stored.
pub const PROGRESS_KEY: &str = "progress";

/// Catalog size assumed by [`ProgressTracker::completion_percentage`].
pub const DEFAULT_ASSUMED_TOTAL: usize = 20;

/// Tracks which content items the learner has completed.
///
/// Entries are unique per `(id, type)`. Marking an item incomplete keeps its
/// entry with `completed = false`.
pub struct ProgressTracker {
    storage: Arc<dyn Storage>,
    entries: Vec<ProgressEntry>,
    assumed_total: usize,
}

impl ProgressTracker {
    /// Loads the tracker from `storage`, starting empty if nothing is stored.
    pub async fn open(storage: Arc<dyn Storage>) -> Result<Self> {
        let entries: Vec<ProgressEntry> = state::load(storage.as_ref(), PROGRESS_KEY).await?;
        tracing::debug!(entries = entries.len(), "progress loaded");
        Ok(Self {
            storage,
            entries,
            assumed_total: DEFAULT_ASSUMED_TOTAL,
        })
    }

    /// Overrides the catalog size used by [`completion_percentage`](Self::completion_percentage).
    pub fn with_assumed_total(mut self, total: usize) -> Self {
        self.assumed_total = total;
        self
    }

    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    /// Marks an item completed, adding an entry for it if needed.
    pub async fn mark_completed(&mut self, id: &str, content_type: ContentType) -> Result<()> {
        let mut next = self.entries.clone();
        match next.iter_mut().find(|e| e.is_for(id, content_type)) {
            Some(entry) => entry.completed = true,
            None => next.push(ProgressEntry {
                id: id.to_string(),
                content_type,
                completed: true,
            }),
        }
        self.commit(next).await
    }

    /// Marks an item not completed. Items without an entry are left alone.
    pub async fn mark_incomplete(&mut self, id: &str, content_type: ContentType) -> Result<()> {
        let mut next = self.entries.clone();
        if let Some(entry) = next.iter_mut().find(|e| e.is_for(id, content_type)) {
            entry.completed = false;
        }
        self.commit(next).await
    }

    pub fn is_completed(&self, id: &str, content_type: ContentType) -> bool {
        self.entries
            .iter()
            .any(|e| e.is_for(id, content_type) && e.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.completed).count()
    }

    /// Completed items as a whole percentage of the assumed catalog size.
    ///
    /// This is an approximation; the result exceeds 100 once more items are
    /// completed than the assumed total.
    pub fn completion_percentage(&self) -> u32 {
        percentage(self.completed_count(), self.assumed_total)
    }

    /// Completed items as a whole percentage of `total`.
    pub fn completion_percentage_of(&self, total: usize) -> u32 {
        percentage(self.completed_count(), total)
    }

    /// Completed items of one type as a whole percentage of `total`.
    pub fn type_completion_percentage(&self, content_type: ContentType, total: usize) -> u32 {
        let completed = self
            .entries
            .iter()
            .filter(|e| e.content_type == content_type && e.completed)
            .count();
        percentage(completed, total)
    }

    async fn commit(&mut self, next: Vec<ProgressEntry>) -> Result<()> {
        state::save(self.storage.as_ref(), PROGRESS_KEY, &next).await?;
        self.entries = next;
        Ok(())
    }
}

/// Rounds `part / total` to the nearest whole percent; an empty total is 0%.
fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}
