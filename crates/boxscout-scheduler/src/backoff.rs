//! Adaptive inter-cycle delay.

use std::time::{Duration, Instant};

/// Computes the delay before the next reconciliation cycle.
///
/// The delay doubles while triggers arrive faster than it allows, halves
/// when the gap since the last trigger is comfortably longer than the
/// current delay, and resets to the minimum once the system has been idle
/// for longer than the maximum.
#[derive(Debug)]
pub struct Backoff {
    minimum: Duration,
    maximum: Duration,
    current: Duration,
    last_trigger: Instant,
}

impl Backoff {
    pub fn new(minimum: Duration, maximum: Duration) -> Self {
        Self {
            minimum,
            maximum,
            current: minimum,
            last_trigger: Instant::now(),
        }
    }

    /// Advance the controller after a cycle completes and return the delay
    /// to wait before the next one. `now` is passed in so tests can drive
    /// time explicitly.
    pub fn next_delay(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_trigger);
        if elapsed > self.maximum {
            self.current = self.minimum;
        } else if elapsed > self.current.mul_f64(1.5) {
            self.current = (self.current / 2).max(self.minimum);
        } else {
            self.current = (self.current * 2).min(self.maximum);
        }
        self.last_trigger = now;
        self.current
    }

    /// The current delay without advancing the controller.
    pub fn current(&self) -> Duration {
        self.current
    }
}
