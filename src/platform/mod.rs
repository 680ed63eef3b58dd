//! Platform abstraction layer
//!
//! Handles the host-facing bits the core needs:
//! - Wall-clock timestamps for save metadata
//! - Visibility/focus/teardown notifications

use std::time::{SystemTime, UNIX_EPOCH};

/// Host lifecycle notifications forwarded to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// App backgrounded / tab hidden
    Suspend,
    /// Window lost focus
    FocusLost,
    /// App is shutting down
    Teardown,
}

impl LifecycleEvent {
    /// Whether the session should auto-pause on this event
    pub fn pauses(&self) -> bool {
        matches!(self, LifecycleEvent::Suspend | LifecycleEvent::FocusLost)
    }
}

/// Milliseconds since the Unix epoch (0 if the clock is before it)
pub fn unix_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
