//! Drawing tool selection and the per-tool state machines.
//!
//! Tools are stateless strategies: everything a tool remembers between
//! pointer events lives in a host-owned [`ToolSession`], and everything it
//! decides is reported back as [`ToolEvent`]s. Switching tools therefore
//! never leaves hidden state behind in a tool instance.

mod eraser;
mod pen;
mod selector;

use std::collections::BTreeSet;

use crate::config::Config;
use crate::draw::{BLACK, Point, Stroke, StrokeTool, YELLOW};
use crate::util;

pub use eraser::{EraserTool, hit_strokes, stroke_hit};
pub use pen::InkTool;
pub use selector::{SelectionState, SelectorTool, select_strokes};

/// Drawing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    /// Freehand ink (default)
    #[default]
    Pen,
    /// Wide translucent ink
    Highlighter,
    /// Removes whole strokes it touches
    Eraser,
    /// Lasso selection and drag-to-move
    Selector,
}

impl Tool {
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Highlighter => "highlighter",
            Tool::Eraser => "eraser",
            Tool::Selector => "selector",
        }
    }

    /// Parses a tool name as used by hosts and the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "pen" => Some(Tool::Pen),
            "highlighter" | "marker" => Some(Tool::Highlighter),
            "eraser" => Some(Tool::Eraser),
            "selector" | "lasso" | "select" => Some(Tool::Selector),
            _ => None,
        }
    }

    /// Runs `f` with the strategy object for this tool.
    pub fn with_behavior<R>(self, settings: &ToolSettings, f: impl FnOnce(&dyn ToolBehavior) -> R) -> R {
        match self {
            Tool::Pen => f(&InkTool::pen(settings)),
            Tool::Highlighter => f(&InkTool::highlighter(settings)),
            Tool::Eraser => f(&EraserTool::new(settings.eraser_size)),
            Tool::Selector => f(&SelectorTool),
        }
    }

    pub fn pointer_down(
        self,
        settings: &ToolSettings,
        point: Point,
        ctx: &ToolContext<'_>,
        session: &mut Option<ToolSession>,
    ) -> Vec<ToolEvent> {
        self.with_behavior(settings, |tool| tool.pointer_down(point, ctx, session))
    }

    pub fn pointer_move(
        self,
        settings: &ToolSettings,
        point: Point,
        ctx: &ToolContext<'_>,
        session: &mut Option<ToolSession>,
    ) -> Vec<ToolEvent> {
        self.with_behavior(settings, |tool| tool.pointer_move(point, ctx, session))
    }

    pub fn pointer_up(
        self,
        settings: &ToolSettings,
        ctx: &ToolContext<'_>,
        session: &mut Option<ToolSession>,
    ) -> Vec<ToolEvent> {
        self.with_behavior(settings, |tool| tool.pointer_up(ctx, session))
    }
}

/// Smallest accepted brush size.
pub const MIN_SIZE: f64 = 1.0;
/// Largest accepted pen size.
pub const MAX_PEN_SIZE: f64 = 50.0;
/// Largest accepted highlighter and eraser size.
pub const MAX_SIZE: f64 = 200.0;
/// Smallest accepted eraser diameter.
pub const MIN_ERASER_SIZE: f64 = 4.0;
/// Lowest accepted highlighter opacity.
pub const MIN_OPACITY: f64 = 0.05;

/// Current per-tool drawing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub pen_color: String,
    pub pen_size: f64,
    pub highlighter_color: String,
    pub highlighter_size: f64,
    pub highlighter_opacity: f64,
    /// Eraser diameter in screen pixels
    pub eraser_size: f64,
    /// Samples closer than this to the previous point are dropped
    pub min_point_distance: f64,
    /// Gaps wider than this get a midpoint inserted
    pub interpolation_distance: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            pen_color: "#000000".to_string(),
            pen_size: 4.0,
            highlighter_color: "#ffeb3b".to_string(),
            highlighter_size: 20.0,
            highlighter_opacity: crate::draw::stroke::HIGHLIGHTER_OPACITY,
            eraser_size: 20.0,
            min_point_distance: 2.0,
            interpolation_distance: 5.0,
        }
    }
}

impl From<&Config> for ToolSettings {
    fn from(config: &Config) -> Self {
        let drawing = &config.drawing;
        Self {
            pen_color: drawing.pen_color.to_hex_or(BLACK),
            pen_size: drawing.pen_size,
            highlighter_color: drawing.highlighter_color.to_hex_or(YELLOW),
            highlighter_size: drawing.highlighter_size,
            highlighter_opacity: drawing.highlighter_opacity,
            eraser_size: drawing.eraser_size,
            min_point_distance: drawing.min_point_distance,
            interpolation_distance: drawing.interpolation_distance,
        }
    }
}

impl ToolSettings {
    /// Color used by the tool, if it draws.
    pub fn color(&self, tool: Tool) -> Option<&str> {
        match tool {
            Tool::Pen => Some(&self.pen_color),
            Tool::Highlighter => Some(&self.highlighter_color),
            Tool::Eraser | Tool::Selector => None,
        }
    }

    /// Sets the ink color of `tool`. Returns `false` for tools without a color.
    pub fn set_color(&mut self, tool: Tool, color: impl Into<String>) -> bool {
        match tool {
            Tool::Pen => self.pen_color = color.into(),
            Tool::Highlighter => self.highlighter_color = color.into(),
            Tool::Eraser | Tool::Selector => return false,
        }
        true
    }

    pub fn size(&self, tool: Tool) -> Option<f64> {
        match tool {
            Tool::Pen => Some(self.pen_size),
            Tool::Highlighter => Some(self.highlighter_size),
            Tool::Eraser => Some(self.eraser_size),
            Tool::Selector => None,
        }
    }

    /// Accepted `(min, max)` size of `tool`; the config file is clamped to the same ranges.
    pub fn size_range(tool: Tool) -> Option<(f64, f64)> {
        match tool {
            Tool::Pen => Some((MIN_SIZE, MAX_PEN_SIZE)),
            Tool::Highlighter => Some((MIN_SIZE, MAX_SIZE)),
            Tool::Eraser => Some((MIN_ERASER_SIZE, MAX_SIZE)),
            Tool::Selector => None,
        }
    }

    /// Sets the brush size of `tool`, clamped to the accepted range.
    pub fn set_size(&mut self, tool: Tool, size: f64) -> bool {
        if !size.is_finite() {
            return false;
        }
        let Some((min, max)) = Self::size_range(tool) else {
            return false;
        };
        let size = util::clamp(size, min, max);
        match tool {
            Tool::Pen => self.pen_size = size,
            Tool::Highlighter => self.highlighter_size = size,
            Tool::Eraser => self.eraser_size = size,
            Tool::Selector => return false,
        }
        true
    }

    /// Sets the highlighter opacity; other tools draw opaque.
    pub fn set_opacity(&mut self, tool: Tool, opacity: f64) -> bool {
        if tool != Tool::Highlighter || !opacity.is_finite() {
            return false;
        }
        self.highlighter_opacity = util::clamp(opacity, MIN_OPACITY, 1.0);
        true
    }
}

/// Read-only view of the page that tools hit-test against.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    /// Committed strokes of the active page
    pub strokes: &'a [Stroke],
    /// Current viewport scale
    pub scale: f64,
    /// Current selection, if any
    pub selection: Option<&'a SelectionState>,
}

impl<'a> ToolContext<'a> {
    pub fn new(strokes: &'a [Stroke]) -> Self {
        Self {
            strokes,
            scale: 1.0,
            selection: None,
        }
    }
}

/// Interaction state carried between pointer-down and pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolSession {
    /// Stroke being captured by the pen or highlighter
    Ink(Stroke),
    /// Strokes already erased during this gesture
    Erase { erased: BTreeSet<String> },
    /// Lasso path being drawn
    Lasso(Vec<Point>),
    /// Dragging the selection; `grab` is the pointer offset from the box origin
    Drag { grab: Point },
}

/// Outcome of a tool operation, consumed by the workspace.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEvent {
    StrokeStarted(Stroke),
    StrokeUpdated { id: String, points: Vec<Point> },
    /// Append to the page and push a history snapshot
    StrokeCommitted(Stroke),
    /// Every stroke erased so far in the current gesture
    Erase { ids: BTreeSet<String> },
    /// Strokes currently under the eraser cursor
    ErasePreview { ids: BTreeSet<String> },
    LassoUpdated(Vec<Point>),
    /// New selection, or `None` when cleared
    SelectionChanged(Option<SelectionState>),
    /// Bake a drag into the given strokes
    StrokesMoved { ids: BTreeSet<String>, delta: Point },
}

/// Uniform pointer interface implemented by each tool.
pub trait ToolBehavior {
    fn pointer_down(&self, point: Point, ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent>;

    fn pointer_move(&self, point: Point, ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent>;

    /// Ends the interaction. Without a session this is a no-op.
    fn pointer_up(&self, ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent>;
}

/// Strokes that tools never hit-test or select.
pub(crate) fn is_selectable(stroke: &Stroke) -> bool {
    stroke.tool != StrokeTool::Eraser
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names_parse() {
        assert_eq!(Tool::from_name("Lasso"), Some(Tool::Selector));
        assert_eq!(Tool::from_name("highlighter"), Some(Tool::Highlighter));
        assert_eq!(Tool::from_name("brush"), None);
        assert_eq!(Tool::from_name(Tool::Eraser.as_str()), Some(Tool::Eraser));
    }

    #[test]
    fn settings_setters_clamp_and_reject() {
        let mut settings = ToolSettings::default();
        assert!(settings.set_size(Tool::Pen, 500.0));
        assert_eq!(settings.pen_size, MAX_PEN_SIZE);
        assert!(settings.set_size(Tool::Highlighter, 500.0));
        assert_eq!(settings.highlighter_size, MAX_SIZE);
        assert!(settings.set_size(Tool::Eraser, 1.0));
        assert_eq!(settings.eraser_size, MIN_ERASER_SIZE);
        assert!(!settings.set_size(Tool::Selector, 3.0));
        assert!(!settings.set_opacity(Tool::Pen, 0.5));
        assert!(settings.set_opacity(Tool::Highlighter, 0.0));
        assert_eq!(settings.highlighter_opacity, MIN_OPACITY);
        assert!(!settings.set_color(Tool::Eraser, "#ff0000"));
        assert!(settings.set_color(Tool::Highlighter, "#00ff00"));
        assert_eq!(settings.color(Tool::Highlighter), Some("#00ff00"));
    }

    #[test]
    fn settings_follow_config() {
        let mut config = Config::default();
        config.drawing.pen_color = crate::config::ColorSpec::Rgb([255, 0, 0]);
        config.drawing.eraser_size = 32.0;
        let settings = ToolSettings::from(&config);
        assert_eq!(settings.pen_color, "#ff0000");
        assert_eq!(settings.eraser_size, 32.0);
        assert_eq!(settings.highlighter_color, "#ffeb3b");
    }

    #[test]
    fn pointer_up_without_session_is_noop() {
        let settings = ToolSettings::default();
        let ctx = ToolContext::new(&[]);
        for tool in [Tool::Pen, Tool::Highlighter, Tool::Eraser, Tool::Selector] {
            let mut session = None;
            assert!(tool.pointer_up(&settings, &ctx, &mut session).is_empty());
            assert!(tool.pointer_move(&settings, Point::new(1.0, 1.0), &ctx, &mut session).is_empty());
            assert!(session.is_none());
        }
    }
}
