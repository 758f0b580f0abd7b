//! Freehand ink engine for note-taking.
//!
//! The [`Workspace`] ties the subsystems together: pointer input is routed by
//! the gesture controller in [`input`], turned into strokes by the active tool,
//! recorded in per-page [`history`], painted by [`draw`], and persisted through
//! a [`session::NoteStore`]. Hosts embed the workspace and drive it with pointer
//! events and animation frames; the `penmark` binary inspects and renders the
//! on-disk notes store.

pub mod background;
pub mod config;
pub mod draw;
pub mod history;
pub mod input;
pub mod session;
pub mod util;
pub mod workspace;

pub use config::Config;
pub use workspace::Workspace;
