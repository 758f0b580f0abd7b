//! Lasso selection and drag-to-move.

use std::collections::BTreeSet;

use super::{ToolBehavior, ToolContext, ToolEvent, ToolSession, is_selectable};
use crate::draw::{Point, Stroke};
use crate::util::{self, BoundingBox};

/// A finalized lasso selection.
///
/// The selection references strokes by id and never owns them. While dragging,
/// `drag_delta` carries the uncommitted translation so the renderer can show
/// the move without touching the committed strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub polygon: Vec<Point>,
    pub stroke_ids: BTreeSet<String>,
    pub bounding_box: BoundingBox,
    pub drag_delta: Option<Point>,
}

impl SelectionState {
    fn delta(&self) -> Point {
        self.drag_delta.unwrap_or_default()
    }

    /// Bounding box including the live drag delta.
    pub fn effective_bounds(&self) -> BoundingBox {
        let delta = self.delta();
        self.bounding_box.translated(delta.x, delta.y)
    }

    /// Lasso polygon including the live drag delta.
    pub fn effective_polygon(&self) -> Vec<Point> {
        let delta = self.delta();
        self.polygon.iter().map(|p| p.offset(delta.x, delta.y)).collect()
    }

    /// Whether `point` grabs the selection for dragging.
    pub fn hit(&self, point: Point) -> bool {
        self.effective_bounds().contains(point)
    }

    /// Applies the drag delta permanently to the polygon and box.
    pub fn baked(&self) -> SelectionState {
        let delta = self.delta();
        SelectionState {
            polygon: self.effective_polygon(),
            stroke_ids: self.stroke_ids.clone(),
            bounding_box: self.bounding_box.translated(delta.x, delta.y),
            drag_delta: None,
        }
    }
}

/// Selects every erasable stroke with at least one point inside `polygon`.
///
/// Returns `None` when the polygon is degenerate or nothing is inside.
pub fn select_strokes(strokes: &[Stroke], polygon: &[Point]) -> Option<SelectionState> {
    if polygon.len() < 3 {
        return None;
    }

    let selected: Vec<&Stroke> = strokes
        .iter()
        .filter(|stroke| is_selectable(stroke))
        .filter(|stroke| stroke.points.iter().any(|p| util::point_in_polygon(*p, polygon)))
        .collect();

    let bounding_box = BoundingBox::from_points(selected.iter().flat_map(|stroke| stroke.points.iter()))?;
    Some(SelectionState {
        polygon: polygon.to_vec(),
        stroke_ids: selected.iter().map(|stroke| stroke.id.clone()).collect(),
        bounding_box,
        drag_delta: None,
    })
}

/// Freehand lasso selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorTool;

impl ToolBehavior for SelectorTool {
    fn pointer_down(&self, point: Point, ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent> {
        if let Some(selection) = ctx.selection
            && selection.hit(point)
        {
            let origin = selection.effective_bounds().origin();
            *session = Some(ToolSession::Drag {
                grab: Point::new(point.x - origin.x, point.y - origin.y),
            });
            return Vec::new();
        }

        let path = vec![point];
        *session = Some(ToolSession::Lasso(path.clone()));
        let mut events = Vec::with_capacity(2);
        if ctx.selection.is_some() {
            events.push(ToolEvent::SelectionChanged(None));
        }
        events.push(ToolEvent::LassoUpdated(path));
        events
    }

    fn pointer_move(&self, point: Point, ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent> {
        match session {
            Some(ToolSession::Lasso(path)) => {
                path.push(point);
                vec![ToolEvent::LassoUpdated(path.clone())]
            }
            Some(ToolSession::Drag { grab }) => {
                let Some(selection) = ctx.selection else {
                    return Vec::new();
                };
                let origin = selection.bounding_box.origin();
                let delta = Point::new(point.x - grab.x - origin.x, point.y - grab.y - origin.y);
                vec![ToolEvent::SelectionChanged(Some(SelectionState {
                    drag_delta: Some(delta),
                    ..selection.clone()
                }))]
            }
            _ => Vec::new(),
        }
    }

    fn pointer_up(&self, ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent> {
        match session.take() {
            Some(ToolSession::Lasso(path)) => {
                if path.len() < 3 {
                    log::trace!("Lasso with {} point(s) discarded", path.len());
                    return vec![ToolEvent::LassoUpdated(Vec::new())];
                }
                let selection = select_strokes(ctx.strokes, &path);
                match &selection {
                    Some(selection) => log::debug!("Selected {} stroke(s)", selection.stroke_ids.len()),
                    None => log::debug!("Lasso enclosed no strokes"),
                }
                vec![
                    ToolEvent::LassoUpdated(Vec::new()),
                    ToolEvent::SelectionChanged(selection),
                ]
            }
            Some(ToolSession::Drag { .. }) => {
                let Some(selection) = ctx.selection else {
                    return Vec::new();
                };
                let delta = selection.delta();
                let mut events = vec![ToolEvent::SelectionChanged(Some(selection.baked()))];
                if delta.x != 0.0 || delta.y != 0.0 {
                    events.push(ToolEvent::StrokesMoved {
                        ids: selection.stroke_ids.clone(),
                        delta,
                    });
                }
                events
            }
            other => {
                *session = other;
                Vec::new()
            }
        }
    }
}
