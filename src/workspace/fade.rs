//! Fade-out of erased strokes.
//!
//! Erased strokes stay in the page's list while they fade so the renderer can
//! draw them at decreasing opacity. A single sweep on each frame tick promotes
//! expired entries to [`StrokeLifecycle::Removed`] and hands their ids back to
//! the workspace for splicing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Transient state of a stroke with respect to erasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeLifecycle {
    Committed,
    /// Erased; drawn fading until the deadline
    FadingOut(Instant),
    /// Fade finished; the stroke must be spliced out
    Removed,
}

/// Tracks every stroke currently fading out.
#[derive(Debug, Clone)]
pub struct FadeTracker {
    duration: Duration,
    deadlines: HashMap<String, Instant>,
}

impl FadeTracker {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadlines: HashMap::new(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether erased strokes should be spliced out immediately.
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// Starts fading `id`. Returns `false` if it was already fading.
    pub fn start(&mut self, id: &str, now: Instant) -> bool {
        if self.deadlines.contains_key(id) {
            return false;
        }
        self.deadlines.insert(id.to_string(), now + self.duration);
        true
    }

    pub fn is_fading(&self, id: &str) -> bool {
        self.deadlines.contains_key(id)
    }

    pub fn is_active(&self) -> bool {
        !self.deadlines.is_empty()
    }

    pub fn lifecycle(&self, id: &str, now: Instant) -> StrokeLifecycle {
        match self.deadlines.get(id) {
            None => StrokeLifecycle::Committed,
            Some(&deadline) if now >= deadline => StrokeLifecycle::Removed,
            Some(&deadline) => StrokeLifecycle::FadingOut(deadline),
        }
    }

    /// Remaining opacity of every fading stroke, from 1.0 down to 0.0.
    pub fn alphas(&self, now: Instant) -> HashMap<String, f64> {
        let total = self.duration.as_secs_f64();
        self.deadlines
            .iter()
            .map(|(id, deadline)| {
                let remaining = deadline.saturating_duration_since(now).as_secs_f64();
                let alpha = if total > 0.0 { (remaining / total).clamp(0.0, 1.0) } else { 0.0 };
                (id.clone(), alpha)
            })
            .collect()
    }

    /// Drops and returns the ids whose fade has finished.
    pub fn sweep(&mut self, now: Instant) -> Vec<String> {
        let expired: Vec<String> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| now >= **deadline)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            self.deadlines.remove(id);
        }
        expired
    }

    /// Ends every fade at once, returning the affected ids.
    pub fn drain(&mut self) -> Vec<String> {
        self.deadlines.drain().map(|(id, _)| id).collect()
    }

    /// Forgets all fades without reporting them (the strokes are restored).
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}
