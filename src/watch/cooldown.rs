//! Cooldown gate: debounce alert dispatches on the time of the last firing.

use std::time::{Duration, Instant};

/// Tracks only the single most recent firing — a debounce, not a rate
/// limiter. A page flickering faster than the poll interval only moves the
/// timestamp on cycles that actually fire.
#[derive(Debug)]
pub struct CooldownGate {
    cooldown: Duration,
    last_fired: Option<Instant>,
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: None,
        }
    }

    /// A never-fired gate always allows; otherwise the full cooldown must
    /// have elapsed since the last firing.
    pub fn may_fire(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(prev) => now.duration_since(prev) >= self.cooldown,
        }
    }

    pub fn record_fired(&mut self, now: Instant) {
        self.last_fired = Some(now);
    }

    pub fn last_fired(&self) -> Option<Instant> {
        self.last_fired
    }
}
