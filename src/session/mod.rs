//! Note persistence (save/restore) support.
//!
//! Writes the note collection to disk with locking, optional compression, and
//! backup rotation, restores it on startup, and debounces autosaves so that a
//! burst of edits produces a single write.

mod autosave;
mod options;
mod storage;
mod store;

pub use autosave::AutosaveTimer;
pub use options::{CompressionMode, DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, StoreOptions, options_from_config};
pub use storage::{ClearOutcome, NoteCounts, StoreInspection, clear_store, inspect_store};
pub use store::{JsonNoteStore, LoadedNotes, MemoryNoteStore, NoteStore};
