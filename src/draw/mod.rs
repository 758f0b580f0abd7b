//! Stroke data model and Cairo rendering.
//!
//! This module defines the core drawing types:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Stroke`]: One continuous freehand line with its style
//! - [`Page`] / [`Note`]: Persisted containers of strokes
//! - Rendering functions for Cairo-based output

pub mod color;
pub mod dirty;
pub mod page;
pub mod render;
pub mod stroke;

// Re-export commonly used types at module level
pub use color::Color;
pub use dirty::DirtyTracker;
pub use page::{Note, Page, PageSize};
pub use render::{CanvasScene, PathSegment, render_canvas, render_stroke, smoothed_path};
pub use stroke::{CompositeMode, Point, Stroke, StrokeTool, translate_stroke};

// Re-export color constants for public API
#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
