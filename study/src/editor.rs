//! Editing surface for a single note.
//!
//! The editor holds a draft (content and tags) for either a new note or an
//! existing one. Drafts are committed to the [`NotesManager`] by [`save`] and,
//! for existing notes only, automatically once typing has paused for
//! [`AUTOSAVE_DELAY`].
//!
//! [`save`]: NoteEditor::save

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::model::Note;
use crate::notes::NotesManager;

/// Pause after the last content change before an existing note is committed.
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    New,
    Existing(String),
}

pub struct NoteEditor {
    notes: Arc<Mutex<NotesManager>>,
    target: Target,
    content: String,
    tags: Vec<String>,
    pending: Option<JoinHandle<()>>,
}

impl NoteEditor {
    /// Creates an editor with an empty draft for a new note.
    pub fn new(notes: Arc<Mutex<NotesManager>>) -> Self {
        Self {
            notes,
            target: Target::New,
            content: String::new(),
            tags: Vec::new(),
            pending: None,
        }
    }

    /// Starts a fresh draft for a new note.
    pub fn start_new(&mut self) {
        self.cancel_autosave();
        self.target = Target::New;
        self.content.clear();
        self.tags.clear();
    }

    /// Loads note `id` into the editor.
    pub async fn open(&mut self, id: &str) -> Result<()> {
        let note = {
            let notes = self.notes.lock().await;
            notes
                .find(id)
                .cloned()
                .ok_or_else(|| Error::NotFound(id.to_string()))?
        };
        self.cancel_autosave();
        self.target = Target::Existing(note.id);
        self.content = note.content;
        self.tags = note.tags;
        Ok(())
    }

    /// Id of the note being edited, or `None` for an unsaved new note.
    pub fn note_id(&self) -> Option<&str> {
        match &self.target {
            Target::New => None,
            Target::Existing(id) => Some(id),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether an autosave is scheduled and has not yet run.
    pub fn autosave_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Replaces the draft content and restarts the autosave timer.
    ///
    /// The autosave commits the content and tags as they are now; a later
    /// change cancels it. Nothing is scheduled for new notes or blank content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cancel_autosave();

        let Target::Existing(id) = &self.target else {
            return;
        };
        if self.content.trim().is_empty() {
            return;
        }

        let notes = self.notes.clone();
        let id = id.clone();
        let content = self.content.clone();
        let tags = self.tags.clone();
        let deadline = Instant::now() + AUTOSAVE_DELAY;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let mut notes = notes.lock().await;
            match notes.update(&id, content, tags).await {
                Ok(_) => tracing::debug!(id = %id, "note autosaved"),
                Err(e) => tracing::warn!(id = %id, error = %e, "autosave failed"),
            }
        }));
    }

    /// Adds a trimmed tag to the draft. Returns whether it was added.
    pub fn add_tag(&mut self, input: &str) -> bool {
        let tag = input.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Commits the draft, creating the note if it is new.
    ///
    /// Blank content is not saved and yields `None`. After a new note is
    /// saved the editor targets it.
    pub async fn save(&mut self) -> Result<Option<Note>> {
        if self.content.trim().is_empty() {
            return Ok(None);
        }
        self.cancel_autosave();

        let mut notes = self.notes.lock().await;
        let note = match &self.target {
            Target::New => notes.create(self.content.clone(), self.tags.clone()).await?,
            Target::Existing(id) => {
                notes
                    .update(id, self.content.clone(), self.tags.clone())
                    .await?
            }
        };
        drop(notes);

        self.target = Target::Existing(note.id.clone());
        Ok(Some(note))
    }

    /// Deletes the note being edited and resets to a new draft.
    ///
    /// Returns `false` when the editor holds an unsaved new note.
    pub async fn delete(&mut self) -> Result<bool> {
        let id = match &self.target {
            Target::New => return Ok(false),
            Target::Existing(id) => id.clone(),
        };
        self.cancel_autosave();
        self.notes.lock().await.delete(&id).await?;
        self.start_new();
        Ok(true)
    }

    fn cancel_autosave(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for NoteEditor {
    fn drop(&mut self) {
        self.cancel_autosave();
    }
}
