//! Gravity timer
//!
//! A deadline clock owned by the session driver. Each timer is tagged with the
//! episode id it was acquired for, so a timer that outlives its round can be
//! recognised and never fires into the next one.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityTimer {
    epoch: u32,
    interval: Duration,
    next_due: Instant,
}

impl GravityTimer {
    /// Timer for round `epoch` whose first tick is one interval after `now`.
    pub fn new(epoch: u32, interval_ms: u32, now: Instant) -> Self {
        let interval = Duration::from_millis(u64::from(interval_ms.max(1)));
        Self {
            epoch,
            interval,
            next_due: now + interval,
        }
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Whether this timer still drives round `epoch` at `interval_ms`.
    pub fn matches(&self, epoch: u32, interval_ms: u32) -> bool {
        self.epoch == epoch && self.interval == Duration::from_millis(u64::from(interval_ms.max(1)))
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    /// Consume one due tick. Returns false if the deadline has not passed.
    ///
    /// Missed periods are skipped rather than replayed in a burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
