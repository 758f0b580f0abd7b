//! Debounced autosave deadline.

use crate::config::AutosaveConfig;
use std::time::{Duration, Instant};

/// A single pending save deadline, replaced on every edit.
///
/// The timer never fires on its own: the host's frame tick polls
/// [`take_due`](Self::take_due), and page switches or shutdown drain it with
/// [`take_pending`](Self::take_pending).
#[derive(Debug, Clone)]
pub struct AutosaveTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl AutosaveTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Picks the desktop or the longer mobile delay.
    pub fn from_config(config: &AutosaveConfig, mobile: bool) -> Self {
        let millis = if mobile { config.mobile_delay_ms } else { config.delay_ms };
        Self::new(Duration::from_millis(millis))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Restarts the countdown from `now`, dropping any earlier deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Clears the deadline if it has passed. Returns `true` when a save should run.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Clears the deadline regardless of time, for synchronous flushes.
    pub fn take_pending(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Drops the pending save without running it.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
