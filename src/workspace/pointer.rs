use super::core::Workspace;
use crate::draw::{Point, translate_stroke};
use crate::input::{PointerEvent, PointerRoute, ToolContext, ToolEvent, WheelEvent};
use log::{debug, trace};
use std::collections::BTreeSet;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Down,
    Move,
    Up,
}

impl Workspace {
    /// Handles a pointer press.
    pub fn pointer_down(&mut self, event: &PointerEvent, now: Instant) {
        if self.closed {
            return;
        }
        self.observe(now);
        let route = self.gesture.pointer_down(event, &self.viewport);
        self.dispatch(route, Phase::Down, now);
    }

    /// Handles pointer motion.
    pub fn pointer_move(&mut self, event: &PointerEvent, now: Instant) {
        if self.closed {
            return;
        }
        self.observe(now);
        let route = self.gesture.pointer_move(event, &self.viewport);
        self.dispatch(route, Phase::Move, now);
    }

    /// Handles a pointer release or cancel.
    pub fn pointer_up(&mut self, event: &PointerEvent, now: Instant) {
        if self.closed {
            return;
        }
        self.observe(now);
        let route = self.gesture.pointer_up(event, &self.viewport);
        self.dispatch(route, Phase::Up, now);
    }

    /// Zooms around the cursor. Returns `true` when the viewport changed.
    pub fn wheel(&mut self, event: &WheelEvent) -> bool {
        if self.closed {
            return false;
        }
        let changed = self.gesture.wheel(event, &mut self.viewport);
        if changed {
            self.dirty.mark();
        }
        changed
    }

    fn dispatch(&mut self, route: PointerRoute, phase: Phase, now: Instant) {
        match route {
            PointerRoute::Draw(point) => {
                if phase == Phase::Down {
                    self.erase_recorded = false;
                }
                let events = self.run_tool(point, phase);
                for event in events {
                    self.apply_tool_event(event, now);
                }
            }
            PointerRoute::Navigate => {
                if self.gesture.has_pending_update() {
                    self.dirty.mark();
                }
            }
            PointerRoute::CancelDrawing => {
                debug!("Second touch started navigation; cancelling {}", self.tool.as_str());
                self.cancel_interaction();
            }
            PointerRoute::Ignored => trace!("Pointer event ignored ({phase:?})"),
        }
    }

    fn run_tool(&mut self, point: Point, phase: Phase) -> Vec<ToolEvent> {
        let note = &self.notes[self.active_note];
        let strokes = &note.pages[note.current_page_index].strokes;
        let ctx = ToolContext {
            strokes,
            scale: self.viewport.scale,
            selection: self.selection.as_ref(),
        };
        match phase {
            Phase::Down => self.tool.pointer_down(&self.settings, point, &ctx, &mut self.session),
            Phase::Move => self.tool.pointer_move(&self.settings, point, &ctx, &mut self.session),
            Phase::Up => self.tool.pointer_up(&self.settings, &ctx, &mut self.session),
        }
    }

    pub(super) fn apply_tool_event(&mut self, event: ToolEvent, now: Instant) {
        match event {
            ToolEvent::StrokeStarted(stroke) => {
                self.live_stroke = Some(stroke);
                self.dirty.mark();
            }
            ToolEvent::StrokeUpdated { id, points } => {
                if let Some(live) = self.live_stroke.as_mut()
                    && live.id == id
                {
                    live.points = points;
                    self.dirty.mark();
                }
            }
            ToolEvent::StrokeCommitted(stroke) => {
                self.live_stroke = None;
                if stroke.points.is_empty() {
                    debug!("Dropping empty stroke {}", stroke.id);
                    self.dirty.mark();
                    return;
                }
                self.record_history();
                self.page_mut().strokes.push(stroke);
                self.mark_changed();
            }
            ToolEvent::Erase { ids } => self.erase_strokes(&ids, now),
            ToolEvent::ErasePreview { ids } => {
                if ids != self.erase_preview {
                    self.erase_preview = ids;
                    self.dirty.mark();
                }
            }
            ToolEvent::LassoUpdated(points) => {
                self.lasso = if points.is_empty() { None } else { Some(points) };
                self.dirty.mark();
            }
            ToolEvent::SelectionChanged(selection) => {
                self.selection = selection;
                self.dirty.mark();
            }
            ToolEvent::StrokesMoved { ids, delta } => {
                self.record_history();
                for stroke in self.page_mut().strokes.iter_mut() {
                    if ids.contains(&stroke.id) {
                        *stroke = translate_stroke(stroke, delta.x, delta.y);
                    }
                }
                debug!("Moved {} stroke(s) by ({:.1}, {:.1})", ids.len(), delta.x, delta.y);
                self.mark_changed();
            }
        }
    }

    /// Starts fading every newly erased stroke.
    ///
    /// The first erase of a gesture records one history snapshot; later hits in
    /// the same gesture join that step.
    fn erase_strokes(&mut self, ids: &BTreeSet<String>, now: Instant) {
        let fresh: Vec<String> = self
            .strokes()
            .iter()
            .filter(|stroke| ids.contains(&stroke.id) && !self.fades.is_fading(&stroke.id))
            .map(|stroke| stroke.id.clone())
            .collect();
        if fresh.is_empty() {
            return;
        }

        if !self.erase_recorded {
            self.record_history();
            self.erase_recorded = true;
        }

        if self.fades.is_instant() {
            self.page_mut().strokes.retain(|stroke| !fresh.contains(&stroke.id));
        } else {
            for id in &fresh {
                self.fades.start(id, now);
            }
            self.fade_alphas = self.fades.alphas(now);
        }
        if let Some(selection) = self.selection.as_mut() {
            for id in &fresh {
                selection.stroke_ids.remove(id);
            }
            if selection.stroke_ids.is_empty() {
                self.selection = None;
            }
        }
        debug!("Erased {} stroke(s)", fresh.len());
        self.mark_changed();
    }
}
