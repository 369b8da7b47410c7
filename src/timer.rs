//! Countdown Timers
//!
//! Pure data objects, explicitly ticked by their owning script every
//! frame. There is no asynchronous wakeup anywhere in the simulation;
//! anything time-driven polls one of these.

/// Counts down from a duration to zero.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: duration,
        }
    }

    /// Advance by `dt` seconds. Returns true exactly on the tick during
    /// which the countdown reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    pub fn finished(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Rewind to the full duration.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }
}
