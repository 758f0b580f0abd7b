//! Per-page undo/redo history.
//!
//! Each page gets its own [`HistoryBuffer`], created lazily the first time the
//! page records an action. Buffers never reference each other, so undo on one
//! page can never reach into another.

use std::collections::HashMap;

use crate::draw::Stroke;

/// Undo/redo stacks of full stroke-list snapshots for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryBuffer {
    /// Past states, most recent last
    history: Vec<Vec<Stroke>>,
    /// Undone states, most recent last
    future: Vec<Vec<Stroke>>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-mutation stroke list and invalidates redo.
    ///
    /// When `max_depth` > 0 the oldest snapshot is dropped once the stack
    /// grows past it.
    pub fn push_snapshot(&mut self, current: &[Stroke], max_depth: usize) {
        self.history.push(current.to_vec());
        self.future.clear();
        if max_depth > 0 && self.history.len() > max_depth {
            let excess = self.history.len() - max_depth;
            self.history.drain(..excess);
        }
    }

    /// Returns the state to restore, stashing `current` for redo.
    pub fn undo(&mut self, current: &[Stroke]) -> Option<Vec<Stroke>> {
        let previous = self.history.pop()?;
        self.future.push(current.to_vec());
        Some(previous)
    }

    /// Mirror of [`undo`](Self::undo).
    pub fn redo(&mut self, current: &[Stroke]) -> Option<Vec<Stroke>> {
        let next = self.future.pop()?;
        self.history.push(current.to_vec());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.future.clear();
    }
}

/// History buffers keyed by page id.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    buffers: HashMap<String, HistoryBuffer>,
    /// Maximum undo depth per page (0 = unlimited)
    max_depth: usize,
}

impl HistoryManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            buffers: HashMap::new(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Buffer for `page_id`, if the page has recorded anything.
    pub fn buffer(&self, page_id: &str) -> Option<&HistoryBuffer> {
        self.buffers.get(page_id)
    }

    fn buffer_mut(&mut self, page_id: &str) -> &mut HistoryBuffer {
        self.buffers.entry(page_id.to_string()).or_default()
    }

    /// Called once per logical user action, before the mutation.
    pub fn push_snapshot(&mut self, page_id: &str, current: &[Stroke]) {
        let max_depth = self.max_depth;
        let buffer = self.buffer_mut(page_id);
        buffer.push_snapshot(current, max_depth);
        log::trace!(
            "History snapshot for page {} ({} strokes, depth {})",
            page_id,
            current.len(),
            buffer.undo_depth()
        );
    }

    /// Undoes the last action on `page_id`; `None` when there is nothing to undo.
    pub fn undo(&mut self, page_id: &str, current: &[Stroke]) -> Option<Vec<Stroke>> {
        let restored = self.buffers.get_mut(page_id).and_then(|buffer| buffer.undo(current));
        if restored.is_none() {
            log::debug!("Nothing to undo on page {page_id}");
        }
        restored
    }

    /// Redoes the last undone action on `page_id`; `None` when there is nothing to redo.
    pub fn redo(&mut self, page_id: &str, current: &[Stroke]) -> Option<Vec<Stroke>> {
        let restored = self.buffers.get_mut(page_id).and_then(|buffer| buffer.redo(current));
        if restored.is_none() {
            log::debug!("Nothing to redo on page {page_id}");
        }
        restored
    }

    pub fn can_undo(&self, page_id: &str) -> bool {
        self.buffer(page_id).is_some_and(HistoryBuffer::can_undo)
    }

    pub fn can_redo(&self, page_id: &str) -> bool {
        self.buffer(page_id).is_some_and(HistoryBuffer::can_redo)
    }

    /// Drops the history of a deleted page.
    pub fn forget(&mut self, page_id: &str) {
        self.buffers.remove(page_id);
    }

    /// Drops every page's history (note switch).
    pub fn clear(&mut self) {
        self.buffers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Point, StrokeTool};

    fn stroke(x: f64) -> Stroke {
        let mut stroke = Stroke::new(StrokeTool::Pen, "#000000", 2.0, None);
        stroke.points.push(Point::new(x, 0.0));
        stroke
    }

    /// Commits `stroke` the way the workspace does: snapshot, then mutate.
    fn commit(history: &mut HistoryManager, page: &str, strokes: &mut Vec<Stroke>, stroke: Stroke) {
        history.push_snapshot(page, strokes);
        strokes.push(stroke);
    }

    #[test]
    fn undo_redo_is_symmetric() {
        let mut history = HistoryManager::new(0);
        let mut strokes = Vec::new();
        let s0 = strokes.clone();
        commit(&mut history, "p", &mut strokes, stroke(1.0));
        commit(&mut history, "p", &mut strokes, stroke(2.0));
        let s2 = strokes.clone();

        for _ in 0..2 {
            strokes = history.undo("p", &strokes).unwrap();
        }
        assert_eq!(strokes, s0);
        assert!(!history.can_undo("p"));
        assert!(history.undo("p", &strokes).is_none());

        for _ in 0..2 {
            strokes = history.redo("p", &strokes).unwrap();
        }
        assert_eq!(strokes, s2);
        assert!(!history.can_redo("p"));
    }

    #[test]
    fn new_commit_after_undo_clears_redo() {
        let mut history = HistoryManager::new(0);
        let mut strokes = Vec::new();
        commit(&mut history, "p", &mut strokes, stroke(1.0));
        commit(&mut history, "p", &mut strokes, stroke(2.0));

        strokes = history.undo("p", &strokes).unwrap();
        assert!(history.can_redo("p"));
        commit(&mut history, "p", &mut strokes, stroke(3.0));
        assert!(!history.can_redo("p"));
        assert!(history.redo("p", &strokes).is_none());
    }

    #[test]
    fn pages_have_independent_history() {
        let mut history = HistoryManager::new(0);
        let mut first = Vec::new();
        let mut second = Vec::new();
        commit(&mut history, "a", &mut first, stroke(1.0));
        commit(&mut history, "b", &mut second, stroke(2.0));

        assert!(history.undo("a", &first).is_some());
        assert!(history.can_undo("b"));
        assert!(!history.can_undo("a"));
        assert!(!history.can_undo("never-touched"));

        history.forget("b");
        assert!(history.buffer("b").is_none());
    }

    #[test]
    fn snapshots_do_not_alias_live_strokes() {
        let mut history = HistoryManager::new(0);
        let mut strokes = vec![stroke(1.0)];
        history.push_snapshot("p", &strokes);
        strokes[0].points[0].x = 99.0;

        let restored = history.undo("p", &strokes).unwrap();
        assert_eq!(restored[0].points[0].x, 1.0);
    }

    #[test]
    fn depth_limit_drops_oldest() {
        let mut history = HistoryManager::new(2);
        let mut strokes = Vec::new();
        for i in 0..4 {
            commit(&mut history, "p", &mut strokes, stroke(i as f64));
        }
        assert_eq!(history.buffer("p").unwrap().undo_depth(), 2);

        strokes = history.undo("p", &strokes).unwrap();
        strokes = history.undo("p", &strokes).unwrap();
        assert_eq!(strokes.len(), 2);
        assert!(!history.can_undo("p"));
    }
}
