//! Host-neutral pointer and wheel event types.

use crate::draw::Point;

/// Kind of device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerType {
    /// Mouse or trackpad
    Mouse,
    /// Stylus
    Pen,
    /// Finger
    Touch,
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    /// Left mouse button, pen tip or finger contact
    #[default]
    Primary,
    /// Middle mouse button (pans the canvas)
    Middle,
    /// Right mouse button (ignored)
    Secondary,
}

/// A pointer down/move/up event in client (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Identifier stable for the lifetime of one contact
    pub pointer_id: u32,
    pub pointer_type: PointerType,
    pub button: MouseButton,
    /// Position relative to the client area, before subtracting the container origin
    pub client: Point,
}

impl PointerEvent {
    pub fn new(pointer_id: u32, pointer_type: PointerType, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            pointer_type,
            button: MouseButton::Primary,
            client: Point::new(x, y),
        }
    }

    /// Mouse event with the given button.
    pub fn mouse(button: MouseButton, x: f64, y: f64) -> Self {
        Self {
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
            button,
            client: Point::new(x, y),
        }
    }

    pub fn touch(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(pointer_id, PointerType::Touch, x, y)
    }

    pub fn pen(x: f64, y: f64) -> Self {
        Self::new(1, PointerType::Pen, x, y)
    }
}

/// A scroll wheel event anchored at the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Cursor position in client coordinates
    pub client: Point,
    /// Vertical scroll delta in pixels; negative zooms in
    pub delta_y: f64,
}

impl WheelEvent {
    pub fn new(x: f64, y: f64, delta_y: f64) -> Self {
        Self {
            client: Point::new(x, y),
            delta_y,
        }
    }
}
