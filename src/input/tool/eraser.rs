//! Stroke eraser.

use std::collections::BTreeSet;

use super::{ToolBehavior, ToolContext, ToolEvent, ToolSession, is_selectable};
use crate::draw::{Point, Stroke};
use crate::util;

/// Removes whole strokes that pass within the eraser radius.
///
/// The eraser only reports ids. Removing strokes from the page, pushing the
/// history snapshot and running the fade-out are the workspace's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraserTool {
    /// Diameter in screen pixels
    pub size: f64,
}

impl EraserTool {
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    /// Eraser radius in model units at the given viewport scale.
    pub fn model_radius(&self, scale: f64) -> f64 {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        self.size / 2.0 / scale
    }

    fn erase_at(&self, point: Point, ctx: &ToolContext<'_>, erased: &mut BTreeSet<String>) -> Vec<ToolEvent> {
        let hits = hit_strokes(ctx.strokes, point, self.model_radius(ctx.scale), erased);
        let mut events = Vec::with_capacity(2);

        if !hits.is_empty() {
            log::debug!("Eraser hit {} stroke(s)", hits.len());
            erased.extend(hits.iter().cloned());
            events.push(ToolEvent::Erase { ids: erased.clone() });
        }
        events.push(ToolEvent::ErasePreview { ids: hits });
        events
    }
}

/// Whether `point` lies within `radius` of the stroke's line.
///
/// Single-point strokes are tested against their point; longer strokes against
/// each segment between consecutive points.
pub fn stroke_hit(stroke: &Stroke, point: Point, radius: f64) -> bool {
    match stroke.points.as_slice() {
        [] => false,
        [only] => util::distance(point, *only) <= radius,
        points => points
            .windows(2)
            .any(|segment| util::distance_to_segment(point, segment[0], segment[1]) <= radius),
    }
}

/// Ids of erasable strokes hit at `point`, skipping those in `exclude`.
pub fn hit_strokes(strokes: &[Stroke], point: Point, radius: f64, exclude: &BTreeSet<String>) -> BTreeSet<String> {
    strokes
        .iter()
        .filter(|stroke| is_selectable(stroke) && !exclude.contains(&stroke.id))
        .filter(|stroke| stroke_hit(stroke, point, radius))
        .map(|stroke| stroke.id.clone())
        .collect()
}

impl ToolBehavior for EraserTool {
    fn pointer_down(&self, point: Point, ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent> {
        let mut erased = BTreeSet::new();
        let events = self.erase_at(point, ctx, &mut erased);
        *session = Some(ToolSession::Erase { erased });
        events
    }

    fn pointer_move(&self, point: Point, ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent> {
        match session {
            Some(ToolSession::Erase { erased }) => self.erase_at(point, ctx, erased),
            _ => Vec::new(),
        }
    }

    fn pointer_up(&self, _ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent> {
        match session.take() {
            Some(ToolSession::Erase { .. }) => vec![ToolEvent::ErasePreview { ids: BTreeSet::new() }],
            other => {
                *session = other;
                Vec::new()
            }
        }
    }
}
