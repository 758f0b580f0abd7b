//! Workspace orchestration.
//!
//! The [`Workspace`] owns the notes and all editing state for the active page,
//! routes pointer input through the gesture controller to the active tool,
//! applies the resulting tool events with undo history, animates erase fades,
//! and debounces autosaves to the [`NoteStore`](crate::session::NoteStore).

mod actions;
mod core;
mod fade;
mod pointer;
mod render;
#[cfg(test)]
mod tests;

pub use self::core::{PageState, StrokeChange, Workspace};
pub use fade::{FadeTracker, StrokeLifecycle};
pub use render::{ExportError, render_page_png};
