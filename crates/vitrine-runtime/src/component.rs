#![forbid(unsafe_code)]

//! Components: what the stage mounts.
//!
//! A component wraps a widget engine and tells the stage, declaratively,
//! which time sources it currently needs through [`Component::subscriptions`].
//! After every callback the stage compares the declared set against what is
//! running, starts the new ones and cancels the rest.

use std::time::Duration;

use vitrine_core::event::{Event, PointerId};
use vitrine_core::geometry::Rect;
use vitrine_widgets::{DisplayList, PointerOutcome};

/// Identifier of an interval subscription, unique within one component.
pub type SubId = u64;

/// A time source a component wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sub {
    /// A frame callback on every display frame.
    Frames,
    /// A timer firing every `interval`.
    Every { id: SubId, interval: Duration },
}

/// What a component asks of the stage after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reaction {
    /// State changed; repaint.
    pub dirty: bool,
    /// Route this pointer exclusively to the component.
    pub capture: Option<PointerId>,
    /// Release a capture taken earlier.
    pub release: Option<PointerId>,
}

impl Reaction {
    /// Nothing happened.
    pub const fn none() -> Self {
        Self {
            dirty: false,
            capture: None,
            release: None,
        }
    }

    /// State changed, no capture traffic.
    pub const fn dirty() -> Self {
        Self {
            dirty: true,
            capture: None,
            release: None,
        }
    }

    /// Translate a widget's pointer outcome for `pointer`.
    pub const fn from_outcome(outcome: PointerOutcome, pointer: PointerId) -> Self {
        match outcome {
            PointerOutcome::Ignored => Self::none(),
            PointerOutcome::Handled => Self::dirty(),
            PointerOutcome::Capture => Self {
                dirty: true,
                capture: Some(pointer),
                release: None,
            },
            PointerOutcome::Release => Self {
                dirty: true,
                capture: None,
                release: Some(pointer),
            },
        }
    }
}

/// A mountable unit driven by the stage.
pub trait Component {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Called once with the measured bounds, before the first reconcile.
    fn on_mount(&mut self, _bounds: Rect, _now: Duration) {}

    /// Handle an input event. Pointer positions are relative to `bounds`.
    fn on_event(&mut self, event: &Event, bounds: Rect) -> Reaction;

    /// Frame callback. Returns whether state changed.
    fn on_frame(&mut self, _now: Duration) -> bool {
        false
    }

    /// Interval callback for the subscription `id`. Returns whether state
    /// changed.
    fn on_timer(&mut self, _id: SubId, _now: Duration) -> bool {
        false
    }

    /// The time sources wanted right now.
    fn subscriptions(&self) -> Vec<Sub> {
        Vec::new()
    }

    /// Paint into `list` within `area`.
    fn paint(&self, area: Rect, list: &mut DisplayList);

    /// Whether the component may be skipped under reduced motion.
    fn is_decorative(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_translation() {
        let p = PointerId(3);
        assert_eq!(Reaction::from_outcome(PointerOutcome::Ignored, p), Reaction::none());
        assert_eq!(Reaction::from_outcome(PointerOutcome::Handled, p), Reaction::dirty());
        assert_eq!(
            Reaction::from_outcome(PointerOutcome::Capture, p).capture,
            Some(p)
        );
        let release = Reaction::from_outcome(PointerOutcome::Release, p);
        assert_eq!((release.dirty, release.release), (true, Some(p)));
    }

    #[test]
    fn default_reaction_is_none() {
        assert_eq!(Reaction::default(), Reaction::none());
    }
}
