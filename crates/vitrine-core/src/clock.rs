#![forbid(unsafe_code)]

//! Monotonic clocks and frame-delta tracking.
//!
//! Engines never read wall time themselves. The host hands them timestamps
//! (frame callbacks) or elapsed durations (timers), and tests substitute a
//! [`DeterministicClock`] for the real one.

use core::time::Duration;
use web_time::Instant;

/// A monotonic time source measured from an arbitrary epoch.
pub trait Clock {
    /// Time elapsed since the clock's epoch.
    fn now_mono(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the caller.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Real monotonic clock, epoch at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Start a clock whose epoch is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Converts a stream of frame timestamps into per-frame deltas.
///
/// The first timestamp after construction or [`FrameDelta::reset`] yields a
/// zero delta: there is no previous frame to measure against. Timestamps that
/// go backwards also yield zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDelta {
    last: Option<Duration>,
}

impl FrameDelta {
    /// Create a tracker with no baseline.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record `now` and return the time since the previous frame.
    pub fn delta(&mut self, now: Duration) -> Duration {
        let dt = match self.last {
            Some(prev) => now.saturating_sub(prev),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        dt
    }

    /// Drop the baseline; the next frame applies a zero delta.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Move the baseline to `now` without producing a delta.
    pub fn rebase(&mut self, now: Duration) {
        self.last = Some(now);
    }

    /// Whether a baseline timestamp is recorded.
    #[must_use]
    pub const fn has_baseline(&self) -> bool {
        self.last.is_some()
    }
}
