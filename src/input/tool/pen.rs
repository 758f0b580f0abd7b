//! Pen and highlighter capture.

use super::{ToolBehavior, ToolContext, ToolEvent, ToolSession, ToolSettings};
use crate::draw::{Point, Stroke, StrokeTool};
use crate::util;

/// Freehand ink capture shared by the pen and the highlighter.
///
/// Both run the same state machine and differ only in the style they stamp on
/// new strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct InkTool {
    pub tool: StrokeTool,
    pub color: String,
    pub size: f64,
    pub opacity: Option<f64>,
    pub min_point_distance: f64,
    pub interpolation_distance: f64,
}

impl InkTool {
    pub fn pen(settings: &ToolSettings) -> Self {
        Self {
            tool: StrokeTool::Pen,
            color: settings.pen_color.clone(),
            size: settings.pen_size,
            opacity: None,
            min_point_distance: settings.min_point_distance,
            interpolation_distance: settings.interpolation_distance,
        }
    }

    pub fn highlighter(settings: &ToolSettings) -> Self {
        Self {
            tool: StrokeTool::Highlighter,
            color: settings.highlighter_color.clone(),
            size: settings.highlighter_size,
            opacity: Some(settings.highlighter_opacity),
            min_point_distance: settings.min_point_distance,
            interpolation_distance: settings.interpolation_distance,
        }
    }

    /// Appends `point` to `points` with denoising and gap filling.
    ///
    /// Returns `false` when the sample was dropped for being too close to the
    /// previous point.
    pub fn append_point(&self, points: &mut Vec<Point>, point: Point) -> bool {
        let Some(&last) = points.last() else {
            points.push(point);
            return true;
        };

        let gap = util::distance(last, point);
        if gap < self.min_point_distance {
            return false;
        }
        if gap > self.interpolation_distance {
            points.push(util::midpoint(last, point));
        }
        points.push(point);
        true
    }
}

impl ToolBehavior for InkTool {
    fn pointer_down(&self, point: Point, _ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent> {
        if let Some(ToolSession::Ink(stale)) = session.take() {
            log::debug!("Discarding unfinished stroke {}", stale.id);
        }

        let mut stroke = Stroke::new(self.tool, self.color.clone(), self.size, self.opacity);
        stroke.points.push(point);
        log::trace!("Stroke {} started at ({:.1}, {:.1})", stroke.id, point.x, point.y);

        let event = ToolEvent::StrokeStarted(stroke.clone());
        *session = Some(ToolSession::Ink(stroke));
        vec![event]
    }

    fn pointer_move(&self, point: Point, _ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent> {
        let Some(ToolSession::Ink(stroke)) = session else {
            return Vec::new();
        };

        if !self.append_point(&mut stroke.points, point) {
            return Vec::new();
        }
        vec![ToolEvent::StrokeUpdated {
            id: stroke.id.clone(),
            points: stroke.points.clone(),
        }]
    }

    fn pointer_up(&self, _ctx: &ToolContext<'_>, session: &mut Option<ToolSession>) -> Vec<ToolEvent> {
        match session.take() {
            Some(ToolSession::Ink(stroke)) if stroke.is_renderable() => {
                log::debug!("Stroke {} committed with {} points", stroke.id, stroke.points.len());
                vec![ToolEvent::StrokeCommitted(stroke)]
            }
            Some(ToolSession::Ink(_)) => Vec::new(),
            other => {
                *session = other;
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(tool: &InkTool, points: &[Point]) -> (Vec<ToolEvent>, Option<ToolSession>) {
        let ctx = ToolContext::new(&[]);
        let mut session = None;
        let mut events = tool.pointer_down(points[0], &ctx, &mut session);
        for point in &points[1..] {
            events.extend(tool.pointer_move(*point, &ctx, &mut session));
        }
        events.extend(tool.pointer_up(&ctx, &mut session));
        (events, session)
    }

    #[test]
    fn three_point_stroke_commits_with_midpoints() {
        let tool = InkTool::pen(&ToolSettings::default());
        let (events, session) = drive(
            &tool,
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)],
        );
        assert!(session.is_none());

        let Some(ToolEvent::StrokeCommitted(stroke)) = events.last() else {
            panic!("expected a committed stroke, got {events:?}");
        };
        assert_eq!(stroke.color, "#000000");
        assert_eq!(stroke.size, 4.0);
        assert_eq!(stroke.opacity, None);
        let xs: Vec<f64> = stroke.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn close_samples_are_dropped() {
        let tool = InkTool::pen(&ToolSettings::default());
        let ctx = ToolContext::new(&[]);
        let mut session = None;
        tool.pointer_down(Point::new(0.0, 0.0), &ctx, &mut session);
        assert!(tool.pointer_move(Point::new(1.0, 1.0), &ctx, &mut session).is_empty());

        let events = tool.pointer_move(Point::new(3.0, 0.0), &ctx, &mut session);
        assert_eq!(
            events,
            vec![ToolEvent::StrokeUpdated {
                id: match &session {
                    Some(ToolSession::Ink(stroke)) => stroke.id.clone(),
                    _ => unreachable!(),
                },
                points: vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0)],
            }]
        );
    }

    #[test]
    fn single_tap_commits_a_dot() {
        let tool = InkTool::pen(&ToolSettings::default());
        let (events, _) = drive(&tool, &[Point::new(4.0, 4.0)]);
        assert!(matches!(events.as_slice(), [
            ToolEvent::StrokeStarted(_),
            ToolEvent::StrokeCommitted(stroke)
        ] if stroke.points.len() == 1));
    }

    #[test]
    fn highlighter_stamps_its_own_style() {
        let settings = ToolSettings {
            highlighter_opacity: 0.5,
            ..ToolSettings::default()
        };
        let tool = InkTool::highlighter(&settings);
        let (events, _) = drive(&tool, &[Point::new(0.0, 0.0), Point::new(3.0, 0.0)]);
        let Some(ToolEvent::StrokeCommitted(stroke)) = events.last() else {
            panic!("expected commit");
        };
        assert_eq!(stroke.tool, StrokeTool::Highlighter);
        assert_eq!(stroke.size, 20.0);
        assert_eq!(stroke.opacity, Some(0.5));
    }
}
