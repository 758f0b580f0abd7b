//! Input handling: pointer routing, viewport navigation and tool state machines.
//!
//! Raw pointer events enter through the [`GestureController`], which maps them
//! into model space or consumes them for pan/zoom. Model points are then fed to
//! the active [`Tool`], whose [`ToolEvent`]s the workspace applies.

pub mod events;
pub mod gesture;
pub mod tool;
pub mod viewport;

// Re-export commonly used types at module level
pub use events::{MouseButton, PointerEvent, PointerType, WheelEvent};
pub use gesture::{GestureController, GestureKind, GestureSettings, InputProfile, PointerRoute};
pub use tool::{SelectionState, Tool, ToolContext, ToolEvent, ToolSession, ToolSettings};
pub use viewport::{Viewport, ViewportLimits};
