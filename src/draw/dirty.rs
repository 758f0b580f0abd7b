//! Repaint coalescing for the canvas render loop.
//!
//! Mutating operations mark the canvas dirty; the host's animation-frame tick
//! drains the flag, so any number of changes within one frame produce exactly
//! one repaint.

/// Tracks whether the canvas needs repainting and whether a frame is requested.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty: bool,
    frame_requested: bool,
    cancelled: bool,
    repaints: u64,
}

impl DirtyTracker {
    /// Creates a new tracker. The first frame always paints.
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    /// Marks the canvas dirty.
    ///
    /// Returns `true` when the caller should request a new animation frame,
    /// i.e. for the first mark since the last repaint. Marks after
    /// [`cancel`](Self::cancel) are ignored.
    pub fn mark(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.dirty = true;
        if self.frame_requested {
            false
        } else {
            self.frame_requested = true;
            true
        }
    }

    /// Returns whether a repaint is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty && !self.cancelled
    }

    /// Consumes the pending repaint for this frame.
    ///
    /// Returns `true` exactly once per dirty period.
    pub fn take_frame(&mut self) -> bool {
        self.frame_requested = false;
        if self.cancelled || !self.dirty {
            return false;
        }
        self.dirty = false;
        self.repaints += 1;
        true
    }

    /// Drops any pending frame and stops accepting new marks (unmount).
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.dirty = false;
        self.frame_requested = false;
    }

    /// Number of repaints handed out so far.
    pub fn repaint_count(&self) -> u64 {
        self.repaints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_within_a_frame_coalesce() {
        let mut tracker = DirtyTracker::new();
        assert!(tracker.take_frame());

        assert!(tracker.mark());
        assert!(!tracker.mark());
        assert!(!tracker.mark());

        assert!(tracker.take_frame());
        assert!(!tracker.take_frame());
        assert_eq!(tracker.repaint_count(), 2);
    }

    #[test]
    fn cancel_discards_pending_frame() {
        let mut tracker = DirtyTracker::new();
        tracker.mark();
        tracker.cancel();
        assert!(!tracker.is_dirty());
        assert!(!tracker.take_frame());
        assert!(!tracker.mark());
    }
}
