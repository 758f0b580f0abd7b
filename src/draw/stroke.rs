//! Stroke definitions for freehand ink.

use crate::util::BoundingBox;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default opacity for highlighter strokes without an explicit opacity.
pub const HIGHLIGHTER_OPACITY: f64 = 0.35;

/// A position in model space (unscaled, unpanned canvas coordinates).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the point shifted by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Tool that produced a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    Pen,
    Highlighter,
    Eraser,
}

impl StrokeTool {
    /// Opacity used when a stroke does not carry its own.
    pub fn default_opacity(self) -> f64 {
        match self {
            StrokeTool::Highlighter => HIGHLIGHTER_OPACITY,
            StrokeTool::Pen | StrokeTool::Eraser => 1.0,
        }
    }

    /// Whether strokes of this tool remove ink instead of adding it.
    pub fn is_destructive(self) -> bool {
        matches!(self, StrokeTool::Eraser)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrokeTool::Pen => "pen",
            StrokeTool::Highlighter => "highlighter",
            StrokeTool::Eraser => "eraser",
        }
    }
}

/// How a stroke combines with pixels already painted below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeMode {
    /// Normal source-over painting.
    Paint,
    /// Cuts through previously painted ink (destination-out).
    Subtract,
}

/// One continuous drawn line.
///
/// Points are append-only while the stroke is live. Once committed a stroke is
/// never mutated in place: moves produce a translated copy, so history
/// snapshots can share nothing with the live list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub id: String,
    pub tool: StrokeTool,
    /// CSS hex color string (`#rrggbb`)
    pub color: String,
    /// Line width in model units
    pub size: f64,
    /// Explicit opacity; falls back to the tool default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Stroke {
    /// Creates an empty stroke with a fresh unique id.
    pub fn new(tool: StrokeTool, color: impl Into<String>, size: f64, opacity: Option<f64>) -> Self {
        Self {
            id: new_stroke_id(),
            tool,
            color: color.into(),
            size,
            opacity,
            points: Vec::new(),
        }
    }

    /// Opacity to render with: explicit value if present, else the tool default.
    pub fn effective_opacity(&self) -> f64 {
        self.opacity
            .unwrap_or_else(|| self.tool.default_opacity())
            .clamp(0.0, 1.0)
    }

    pub fn composite_mode(&self) -> CompositeMode {
        if self.tool.is_destructive() {
            CompositeMode::Subtract
        } else {
            CompositeMode::Paint
        }
    }

    /// A stroke with no points is never rendered or committed.
    pub fn is_renderable(&self) -> bool {
        !self.points.is_empty()
    }

    /// Bounding box over the stroke's points (stroke width not included).
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }

    /// Returns a copy with every point shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Stroke {
        translate_stroke(self, dx, dy)
    }
}

/// Pure translation used by selection drags; the input stroke is untouched.
pub fn translate_stroke(stroke: &Stroke, dx: f64, dy: f64) -> Stroke {
    Stroke {
        points: stroke.points.iter().map(|p| p.offset(dx, dy)).collect(),
        ..stroke.clone()
    }
}

/// Generates a unique identifier for strokes, pages and notes.
pub fn new_stroke_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Stroke {
        let mut stroke = Stroke::new(StrokeTool::Pen, "#000000", 4.0, None);
        stroke.points = vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)];
        stroke
    }

    #[test]
    fn translate_returns_new_stroke_and_keeps_original() {
        let original = sample();
        let moved = translate_stroke(&original, 3.0, -2.0);

        assert_eq!(original.points[0], Point::new(0.0, 0.0));
        assert_eq!(moved.points, vec![Point::new(3.0, -2.0), Point::new(13.0, 3.0)]);
        assert_eq!(moved.id, original.id);
    }

    #[test]
    fn opacity_falls_back_to_tool_default() {
        let mut stroke = Stroke::new(StrokeTool::Highlighter, "#ffff00", 20.0, None);
        assert_eq!(stroke.effective_opacity(), HIGHLIGHTER_OPACITY);
        stroke.opacity = Some(0.8);
        assert_eq!(stroke.effective_opacity(), 0.8);
        assert_eq!(sample().effective_opacity(), 1.0);
    }

    #[test]
    fn destructive_tools_subtract() {
        let eraser = Stroke::new(StrokeTool::Eraser, "#000000", 10.0, None);
        assert_eq!(eraser.composite_mode(), CompositeMode::Subtract);
        assert_eq!(sample().composite_mode(), CompositeMode::Paint);
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = Stroke::new(StrokeTool::Pen, "#000000", 1.0, None);
        let b = Stroke::new(StrokeTool::Pen, "#000000", 1.0, None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_as_plain_json() {
        let stroke = sample();
        let json = serde_json::to_value(&stroke).unwrap();
        assert_eq!(json["tool"], "pen");
        assert_eq!(json["points"][1]["x"], 10.0);
        assert!(json.get("opacity").is_none());

        let parsed: Stroke = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, stroke);
    }
}
