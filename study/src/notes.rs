//! Personal notes with tags.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{Clock, Storage};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{Note, dedup_tags};
use crate::state;

/// Key under which the note set is stored.
pub const NOTES_KEY: &str = "notes";

/// Creates, edits and looks up the learner's notes.
///
/// Notes are kept in creation order. Every mutation persists the full set
/// before it becomes visible; a failed write leaves the manager unchanged.
pub struct NotesManager {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    notes: Vec<Note>,
}

impl NotesManager {
    /// Loads the notes from `storage`, starting empty if nothing is stored.
    pub async fn open(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Result<Self> {
        let notes: Vec<Note> = state::load(storage.as_ref(), NOTES_KEY).await?;
        tracing::debug!(notes = notes.len(), "notes loaded");
        Ok(Self {
            storage,
            clock,
            notes,
        })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn find(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Notes carrying exactly `tag`.
    pub fn find_by_tag(&self, tag: &str) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.has_tag(tag)).collect()
    }

    /// Appends a new note and returns it.
    pub async fn create(&mut self, content: impl Into<String>, tags: Vec<String>) -> Result<Note> {
        let now = self.now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            tags: dedup_tags(tags),
            created_at: now,
            updated_at: now,
        };

        let mut next = self.notes.clone();
        next.push(note.clone());
        self.commit(next).await?;
        tracing::debug!(id = %note.id, "note created");
        Ok(note)
    }

    /// Replaces the content and tags of note `id`.
    pub async fn update(
        &mut self,
        id: &str,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Note> {
        let mut next = self.notes.clone();
        let note = next
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        note.content = content.into();
        note.tags = dedup_tags(tags);
        note.updated_at = self.now();
        let updated = note.clone();

        self.commit(next).await?;
        tracing::debug!(id, "note updated");
        Ok(updated)
    }

    /// Removes note `id` and returns it.
    pub async fn delete(&mut self, id: &str) -> Result<Note> {
        let position = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut next = self.notes.clone();
        let removed = next.remove(position);
        self.commit(next).await?;
        tracing::debug!(id, "note deleted");
        Ok(removed)
    }

    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.clock.now())
    }

    async fn commit(&mut self, next: Vec<Note>) -> Result<()> {
        state::save(self.storage.as_ref(), NOTES_KEY, &next).await?;
        self.notes = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use common::{InMemoryStorage, MockClock, StorageError, StorageRead, StorageResult};
    use std::time::Duration;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|t| t.to_string()).collect()
    }

    async fn manager() -> (NotesManager, Arc<InMemoryStorage>, Arc<MockClock>) {
        let storage = Arc::new(InMemoryStorage::new());
        let clock = Arc::new(MockClock::at_millis(1_700_000_000_000));
        let notes = NotesManager::open(storage.clone(), clock.clone()).await.unwrap();
        (notes, storage, clock)
    }

    #[tokio::test]
    async fn should_create_note_with_equal_timestamps() {
        // given
        let (mut notes, _storage, _clock) = manager().await;

        // when
        let note = notes
            .create("Wait for the retest", tags(&["breakout", "patience"]))
            .await
            .unwrap();

        // then
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(notes.find(&note.id), Some(&note));
    }

    #[tokio::test]
    async fn should_append_new_notes() {
        // given
        let (mut notes, _storage, _clock) = manager().await;

        // when
        let first = notes.create("first", vec![]).await.unwrap();
        let second = notes.create("second", vec![]).await.unwrap();

        // then
        assert_eq!(notes.notes(), &[first, second]);
    }

    #[tokio::test]
    async fn should_bump_updated_at_but_keep_created_at() {
        // given
        let (mut notes, _storage, clock) = manager().await;
        let note = notes.create("draft", vec![]).await.unwrap();
        clock.advance(Duration::from_secs(90));

        // when
        let updated = notes
            .update(&note.id, "final", tags(&["swing"]))
            .await
            .unwrap();

        // then
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at > note.updated_at);
        assert_eq!(updated.content, "final");
        assert_eq!(updated.tags, tags(&["swing"]));
    }

    #[tokio::test]
    async fn should_match_tags_exactly() {
        // given
        let (mut notes, _storage, _clock) = manager().await;
        let a = notes.create("a", tags(&["Risk"])).await.unwrap();
        notes.create("b", tags(&["risk "])).await.unwrap();

        // when
        let found = notes.find_by_tag("Risk");

        // then
        assert_eq!(found, vec![&a]);
        assert!(notes.find_by_tag("risk").is_empty());
    }

    #[tokio::test]
    async fn should_drop_duplicate_tags() {
        let (mut notes, _storage, _clock) = manager().await;
        let note = notes.create("x", tags(&["a", "b", "a"])).await.unwrap();
        assert_eq!(note.tags, tags(&["a", "b"]));
    }

    #[tokio::test]
    async fn should_delete_note() {
        // given
        let (mut notes, _storage, _clock) = manager().await;
        let note = notes.create("gone soon", vec![]).await.unwrap();

        // when
        let removed = notes.delete(&note.id).await.unwrap();

        // then
        assert_eq!(removed, note);
        assert_eq!(notes.find(&note.id), None);
        assert!(notes.notes().is_empty());
    }

    #[tokio::test]
    async fn should_report_unknown_ids_without_writing() {
        // given
        let (mut notes, storage, _clock) = manager().await;
        notes.create("keep", vec![]).await.unwrap();
        let before = storage.get(NOTES_KEY).await.unwrap();

        // when
        let updated = notes.update("missing", "x", vec![]).await;
        let deleted = notes.delete("missing").await;

        // then
        assert_eq!(updated, Err(Error::NotFound("missing".to_string())));
        assert_eq!(deleted, Err(Error::NotFound("missing".to_string())));
        assert_eq!(storage.get(NOTES_KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn should_rehydrate_from_storage() {
        // given
        let (mut notes, storage, clock) = manager().await;
        let kept = notes.create("kept", tags(&["a"])).await.unwrap();
        let dropped = notes.create("dropped", vec![]).await.unwrap();
        notes.delete(&dropped.id).await.unwrap();

        // when
        let reopened = NotesManager::open(storage, clock).await.unwrap();

        // then
        assert_eq!(reopened.notes(), &[kept]);
    }

    #[tokio::test]
    async fn should_leave_state_unchanged_when_write_fails() {
        struct ReadOnlyStorage(InMemoryStorage);

        #[async_trait]
        impl StorageRead for ReadOnlyStorage {
            async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
                self.0.get(key).await
            }
        }

        #[async_trait]
        impl Storage for ReadOnlyStorage {
            async fn put(&self, _key: &str, _value: Bytes) -> StorageResult<()> {
                Err(StorageError::Storage("quota exceeded".into()))
            }

            async fn delete(&self, _key: &str) -> StorageResult<()> {
                Err(StorageError::Storage("quota exceeded".into()))
            }
        }

        // given
        let storage = Arc::new(ReadOnlyStorage(InMemoryStorage::new()));
        let mut notes = NotesManager::open(storage, Arc::new(MockClock::at_millis(0)))
            .await
            .unwrap();

        // when
        let result = notes.create("lost", vec![]).await;

        // then
        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(notes.notes().is_empty());
    }
}
