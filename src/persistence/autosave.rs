//! Periodic auto-save throttle
//!
//! Only the periodic trigger is throttled. Per-match and lifecycle saves
//! bypass this entirely and do not reset its timer.

use crate::consts::AUTOSAVE_INTERVAL;

#[derive(Debug, Clone, Copy)]
pub struct AutoSave {
    interval: f64,
    last_periodic: f64,
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(AUTOSAVE_INTERVAL)
    }
}

impl AutoSave {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last_periodic: 0.0,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Restart the throttle window at `now` (new board)
    pub fn reset(&mut self, now: f64) {
        self.last_periodic = now;
    }

    /// Whether a periodic save may run at `now`
    pub fn periodic_due(&self, now: f64) -> bool {
        self.interval > 0.0 && now - self.last_periodic >= self.interval
    }

    pub fn mark_periodic(&mut self, now: f64) {
        self.last_periodic = now;
    }
}
