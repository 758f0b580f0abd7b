//! Cairo-based rendering functions for strokes and the full canvas.

use super::color::{BLACK, Color, SELECTION_BLUE};
use super::stroke::{CompositeMode, Point, Stroke};
use crate::background::BackgroundImage;
use crate::input::{SelectionState, Viewport};
use crate::util;
use std::collections::{BTreeSet, HashMap};

/// Screen-space width of the lasso/selection outline in pixels.
const OVERLAY_LINE_WIDTH: f64 = 1.5;
/// Screen-space dash pattern of the lasso/selection outline in pixels.
const OVERLAY_DASH: [f64; 2] = [6.0, 4.0];

/// One drawing command of a smoothed stroke outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic Bézier from the current point through `ctrl` to `to`
    QuadTo { ctrl: Point, to: Point },
}

/// Builds the midpoint-smoothed path through `points`.
///
/// With three or more points every interior sample becomes the control point
/// of a quadratic curve ending at the midpoint to the next sample, so the line
/// passes smoothly through the middle of each sampled pair instead of kinking
/// at the samples. The path finishes with a straight segment to the last point.
/// Two points give a single straight segment; one point only a `MoveTo`.
pub fn smoothed_path(points: &[Point]) -> Vec<PathSegment> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };

    let mut segments = Vec::with_capacity(points.len() + 1);
    segments.push(PathSegment::MoveTo(first));

    match points.len() {
        1 => {}
        2 => segments.push(PathSegment::LineTo(points[1])),
        n => {
            for i in 1..n - 1 {
                segments.push(PathSegment::QuadTo {
                    ctrl: points[i],
                    to: util::midpoint(points[i], points[i + 1]),
                });
            }
            segments.push(PathSegment::LineTo(points[n - 1]));
        }
    }

    segments
}

/// Resolves the stroke's color string, falling back to black.
pub fn stroke_color(stroke: &Stroke) -> Color {
    Color::from_hex(&stroke.color)
        .or_else(|| util::name_to_color(&stroke.color))
        .unwrap_or_else(|| {
            log::debug!("Unrecognised stroke color '{}', using black", stroke.color);
            BLACK
        })
}

/// Appends the path segments to the current Cairo path.
///
/// Cairo has no quadratic curve primitive, so each quadratic is raised to the
/// equivalent cubic.
fn trace_path(ctx: &cairo::Context, segments: &[PathSegment]) {
    let mut current = Point::default();
    for segment in segments {
        match *segment {
            PathSegment::MoveTo(p) => {
                ctx.move_to(p.x, p.y);
                current = p;
            }
            PathSegment::LineTo(p) => {
                ctx.line_to(p.x, p.y);
                current = p;
            }
            PathSegment::QuadTo { ctrl, to } => {
                let c1x = current.x + 2.0 / 3.0 * (ctrl.x - current.x);
                let c1y = current.y + 2.0 / 3.0 * (ctrl.y - current.y);
                let c2x = to.x + 2.0 / 3.0 * (ctrl.x - to.x);
                let c2y = to.y + 2.0 / 3.0 * (ctrl.y - to.y);
                ctx.curve_to(c1x, c1y, c2x, c2y, to.x, to.y);
                current = to;
            }
        }
    }
}

/// Renders a single stroke.
///
/// - 0 points: nothing
/// - 1 point: filled dot with diameter `size`
/// - 2+ points: round-capped line along [`smoothed_path`]
///
/// `alpha` multiplies the stroke's effective opacity (fades and previews).
/// Subtract strokes erase previously painted pixels of the current target.
pub fn render_stroke(ctx: &cairo::Context, stroke: &Stroke, alpha: f64) {
    if !stroke.is_renderable() || alpha <= 0.0 {
        return;
    }

    let color = stroke_color(stroke).scaled_alpha(stroke.effective_opacity() * alpha);
    let _ = ctx.save();

    match stroke.composite_mode() {
        CompositeMode::Paint => ctx.set_operator(cairo::Operator::Over),
        CompositeMode::Subtract => ctx.set_operator(cairo::Operator::DestOut),
    }
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);

    if let [dot] = stroke.points.as_slice() {
        ctx.new_path();
        ctx.arc(dot.x, dot.y, stroke.size / 2.0, 0.0, std::f64::consts::PI * 2.0);
        let _ = ctx.fill();
    } else {
        ctx.set_line_width(stroke.size);
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);
        ctx.new_path();
        trace_path(ctx, &smoothed_path(&stroke.points));
        let _ = ctx.stroke();
    }

    let _ = ctx.restore();
}

/// Fills the whole target with the page background color.
pub fn render_background(ctx: &cairo::Context, color: Color) {
    let _ = ctx.save();
    ctx.set_operator(cairo::Operator::Source);
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    let _ = ctx.paint();
    let _ = ctx.restore();
}

/// Computes the letterboxed placement `(x, y, scale)` of an image inside a
/// `width` x `height` box: the image is scaled to fit and centered.
pub fn letterbox(image_width: f64, image_height: f64, width: f64, height: f64) -> Option<(f64, f64, f64)> {
    if image_width <= 0.0 || image_height <= 0.0 || width <= 0.0 || height <= 0.0 {
        return None;
    }
    let scale = (width / image_width).min(height / image_height);
    let x = (width - image_width * scale) / 2.0;
    let y = (height - image_height * scale) / 2.0;
    Some((x, y, scale))
}

/// Draws the background image letterboxed into the page area.
pub fn render_background_image(ctx: &cairo::Context, image: &BackgroundImage, width: f64, height: f64) {
    let Some((x, y, scale)) = letterbox(image.width as f64, image.height as f64, width, height) else {
        return;
    };

    let _ = ctx.save();
    ctx.translate(x, y);
    ctx.scale(scale, scale);
    if ctx.set_source_surface(&image.surface, 0.0, 0.0).is_ok() {
        let _ = ctx.paint();
    }
    let _ = ctx.restore();
}

/// Draws a dashed closed outline whose width stays constant on screen.
///
/// `scale` is the viewport scale currently applied to the context.
pub fn render_selection_outline(ctx: &cairo::Context, polygon: &[Point], scale: f64) {
    if polygon.len() < 2 {
        return;
    }
    let scale = if scale > 0.0 { scale } else { 1.0 };

    let _ = ctx.save();
    ctx.set_operator(cairo::Operator::Over);
    ctx.set_source_rgba(SELECTION_BLUE.r, SELECTION_BLUE.g, SELECTION_BLUE.b, 0.9);
    ctx.set_line_width(OVERLAY_LINE_WIDTH / scale);
    ctx.set_dash(&[OVERLAY_DASH[0] / scale, OVERLAY_DASH[1] / scale], 0.0);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.new_path();
    ctx.move_to(polygon[0].x, polygon[0].y);
    for point in &polygon[1..] {
        ctx.line_to(point.x, point.y);
    }
    ctx.close_path();
    let _ = ctx.stroke();
    let _ = ctx.restore();
}

/// Everything a full-frame repaint needs, borrowed from the workspace.
pub struct CanvasScene<'a> {
    /// Target width in device pixels
    pub width: f64,
    /// Target height in device pixels
    pub height: f64,
    pub viewport: Viewport,
    pub background_color: Color,
    pub background_image: Option<&'a BackgroundImage>,
    /// Committed strokes in draw order
    pub strokes: &'a [Stroke],
    /// Alpha multipliers for strokes mid fade-out, by id
    pub fading: &'a HashMap<String, f64>,
    /// Strokes currently under the eraser cursor
    pub erase_preview: &'a BTreeSet<String>,
    /// Alpha multiplier for previewed strokes
    pub preview_opacity: f64,
    /// Stroke being captured, not yet committed
    pub live_stroke: Option<&'a Stroke>,
    /// Lasso path being drawn
    pub lasso: Option<&'a [Point]>,
    /// Finalized selection (with its live drag delta, if any)
    pub selection: Option<&'a SelectionState>,
}

/// Repaints the whole canvas.
///
/// Paint order:
/// 1. background color (screen space)
/// 2. background image, letterboxed into the page
/// 3. committed strokes, each translated by the selection drag delta,
///    faded, or dimmed under the eraser preview as applicable
/// 4. the in-progress stroke
/// 5. the lasso path or selection outline
///
/// Strokes are painted into a group so that subtract-composited strokes only
/// cut ink, never the page background.
pub fn render_canvas(ctx: &cairo::Context, scene: &CanvasScene<'_>) {
    render_background(ctx, scene.background_color);

    let viewport = scene.viewport;
    let _ = ctx.save();
    ctx.translate(viewport.offset_x, viewport.offset_y);
    ctx.scale(viewport.scale, viewport.scale);

    if let Some(image) = scene.background_image {
        render_background_image(ctx, image, scene.width, scene.height);
    }

    ctx.push_group();
    let drag = scene
        .selection
        .and_then(|selection| selection.drag_delta.map(|delta| (&selection.stroke_ids, delta)));

    for stroke in scene.strokes {
        let mut alpha = scene.fading.get(&stroke.id).copied().unwrap_or(1.0);
        if scene.erase_preview.contains(&stroke.id) {
            alpha *= scene.preview_opacity;
        }

        match drag {
            Some((ids, delta)) if ids.contains(&stroke.id) => {
                let _ = ctx.save();
                ctx.translate(delta.x, delta.y);
                render_stroke(ctx, stroke, alpha);
                let _ = ctx.restore();
            }
            _ => render_stroke(ctx, stroke, alpha),
        }
    }

    if let Some(live) = scene.live_stroke {
        render_stroke(ctx, live, 1.0);
    }

    if ctx.pop_group_to_source().is_ok() {
        let _ = ctx.paint();
    }

    if let Some(lasso) = scene.lasso {
        render_selection_outline(ctx, lasso, viewport.scale);
    } else if let Some(selection) = scene.selection {
        render_selection_outline(ctx, &selection.effective_polygon(), viewport.scale);
    }

    let _ = ctx.restore();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothed_path_handles_small_inputs() {
        assert!(smoothed_path(&[]).is_empty());

        let one = [Point::new(1.0, 1.0)];
        assert_eq!(smoothed_path(&one), vec![PathSegment::MoveTo(one[0])]);

        let two = [Point::new(0.0, 0.0), Point::new(4.0, 0.0)];
        assert_eq!(
            smoothed_path(&two),
            vec![PathSegment::MoveTo(two[0]), PathSegment::LineTo(two[1])]
        );
    }

    #[test]
    fn smoothed_path_curves_through_midpoints() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
        ];
        let path = smoothed_path(&points);
        assert_eq!(
            path,
            vec![
                PathSegment::MoveTo(Point::new(0.0, 0.0)),
                PathSegment::QuadTo {
                    ctrl: Point::new(10.0, 0.0),
                    to: Point::new(10.0, 5.0),
                },
                PathSegment::QuadTo {
                    ctrl: Point::new(10.0, 10.0),
                    to: Point::new(15.0, 10.0),
                },
                PathSegment::LineTo(Point::new(20.0, 10.0)),
            ]
        );
    }

    #[test]
    fn letterbox_preserves_aspect_ratio() {
        let (x, y, scale) = letterbox(200.0, 100.0, 100.0, 100.0).unwrap();
        assert_eq!(scale, 0.5);
        assert_eq!(x, 0.0);
        assert_eq!(y, 25.0);
        assert!(letterbox(0.0, 100.0, 100.0, 100.0).is_none());
    }

    #[test]
    fn unknown_colors_fall_back_to_black() {
        let mut stroke = Stroke::new(crate::draw::StrokeTool::Pen, "not-a-color", 2.0, None);
        assert_eq!(stroke_color(&stroke), BLACK);
        stroke.color = "blue".to_string();
        assert_eq!(stroke_color(&stroke), crate::draw::color::BLUE);
    }
}
