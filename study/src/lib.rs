//! Learner-side study state: completion progress and personal notes.
//!
//! Both containers keep their whole state in memory and write it back as a
//! single JSON blob to a key-value [`Storage`](common::Storage) after every
//! mutation. On open they rehydrate from the same key; a missing key is an
//! empty state.

pub mod editor;
mod error;
pub mod model;
pub mod notes;
pub mod progress;
mod state;

pub use editor::NoteEditor;
pub use error::{Error, Result};
pub use model::{ContentType, Note, ProgressEntry};
pub use notes::NotesManager;
pub use progress::ProgressTracker;
