use std::time::{Duration, Instant};

/// A deadline timer driven by caller-supplied instants.
///
/// The tick loop owns the clock: every query takes `now` as a parameter, so
/// the timer itself never reads system time and tests can feed synthetic
/// instants.
#[derive(Debug, Clone)]
pub struct Timer {
    duration: Duration,
    start: Instant,
}

impl Timer {
    pub fn new(duration: Duration, now: Instant) -> Self {
        Self {
            duration,
            start: now,
        }
    }

    /// True once `duration` has elapsed since the timer was started or
    /// last reset.
    pub fn ringing(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    pub fn reset(&mut self, now: Instant) {
        self.start = now;
    }
}
