#![forbid(unsafe_code)]

//! Time-based animation primitives.
//!
//! Animations advance by explicit [`Duration`]s handed to them by the caller
//! and produce normalized `f32` values. Nothing here reads a clock, so the
//! same code runs under a browser frame loop and under a virtual clock in
//! tests.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out, used for settle-into-place motion.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Linear interpolation between `a` and `b`. `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, with configurable easing.
///
/// Used for cross-fades when a carousel changes card. Elapsed time is kept as
/// a [`Duration`] so repeated small ticks do not drift.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and default linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// A fade that has already finished (value 1.0).
    pub fn completed(duration: Duration) -> Self {
        let mut fade = Self::new(duration);
        fade.elapsed = fade.duration;
        fade
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Pulse
// ---------------------------------------------------------------------------

/// Continuous "breathing" oscillation. Never completes.
///
/// `value()` starts at 1.0, dips to `floor` at half a period and climbs back,
/// following a cosine. This is the highlight pulse drawn on related nodes.
#[derive(Debug, Clone, Copy)]
pub struct Pulse {
    period: Duration,
    floor: f32,
    phase: f32,
}

impl Pulse {
    /// Create a pulse with the given period whose value dips to `floor`.
    pub fn new(period: Duration, floor: f32) -> Self {
        Self {
            period: if period.is_zero() {
                Duration::from_millis(1)
            } else {
                period
            },
            floor: if floor.is_finite() {
                floor.clamp(0.0, 1.0)
            } else {
                0.0
            },
            phase: 0.0,
        }
    }

    /// Current phase in radians, always in `[0, TAU)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }
}

impl Animation for Pulse {
    fn tick(&mut self, dt: Duration) {
        let cycles = dt.as_secs_f64() / self.period.as_secs_f64();
        self.phase += (std::f64::consts::TAU * cycles.fract()) as f32;
        // Keep phase bounded to avoid precision loss over long runs.
        self.phase %= std::f32::consts::TAU;
    }

    fn is_complete(&self) -> bool {
        false // Pulses never complete.
    }

    fn value(&self) -> f32 {
        let wave = (self.phase.cos() + 1.0) / 2.0;
        lerp(self.floor, 1.0, wave).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}
