#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! Hosts translate their native pointer, resize and scroll notifications into
//! [`Event`]s before handing them to a widget. Positions are always relative
//! to the widget's own bounding box.
//!
//! # Design Notes
//!
//! - Pointer coordinates are `f32` pixels, matching the host's layout units.
//! - Every pointer event carries a [`PointerId`] so capture can be tracked
//!   per pointer (mouse, pen, each touch contact).
//! - `Leave` and `Cancel` are distinct from `Up`: a widget that loses its
//!   pointer mid-drag must still finish the drag.

use bitflags::bitflags;
use core::time::Duration;

use crate::geometry::{Point, Size};

/// Identifier the host assigns to a pointer for the lifetime of a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PointerId(pub u32);

/// Pointer button that triggered a press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Primary button (left mouse, touch contact, pen tip).
    #[default]
    Primary,
    /// Secondary button (right mouse).
    Secondary,
    /// Auxiliary button (middle mouse).
    Auxiliary,
}

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Meta/Command key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed or contact started.
    Down(PointerButton),
    /// Pointer moved, pressed or not.
    Move,
    /// Button released or contact ended.
    Up(PointerButton),
    /// Pointer left the widget's bounds.
    Leave,
    /// The host aborted the gesture (e.g. the page lost focus).
    Cancel,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,
    /// Which pointer produced the event.
    pub pointer: PointerId,
    /// Position relative to the widget's top-left corner.
    pub position: Point,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event for the default pointer.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            pointer: PointerId(0),
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Primary-button press at `(x, y)`.
    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down(PointerButton::Primary), x, y)
    }

    /// Move to `(x, y)`.
    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    /// Primary-button release at `(x, y)`.
    #[must_use]
    pub const fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up(PointerButton::Primary), x, y)
    }

    /// Pointer left the widget at `(x, y)`.
    #[must_use]
    pub const fn leave(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Leave, x, y)
    }

    /// Set the pointer id.
    #[must_use]
    pub const fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this event ends a press (release, leave, or cancel).
    #[must_use]
    pub const fn ends_press(&self) -> bool {
        matches!(
            self.kind,
            PointerEventKind::Up(_) | PointerEventKind::Leave | PointerEventKind::Cancel
        )
    }
}

/// Document scroll position, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollEvent {
    /// Current vertical scroll offset.
    pub scroll_y: f32,
    /// Total scrollable document height.
    pub document_height: f32,
    /// Height of the visible viewport.
    pub viewport_height: f32,
}

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Pointer input inside (or captured by) the widget.
    Pointer(PointerEvent),
    /// The widget's measured size changed.
    Resize(Size),
    /// The document scrolled.
    Scroll(ScrollEvent),
    /// A frame callback fired at the given host timestamp.
    Frame(Duration),
}

impl From<PointerEvent> for Event {
    fn from(ev: PointerEvent) -> Self {
        Self::Pointer(ev)
    }
}

impl From<ScrollEvent> for Event {
    fn from(ev: ScrollEvent) -> Self {
        Self::Scroll(ev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind_and_position() {
        let ev = PointerEvent::down(3.0, 4.0);
        assert_eq!(ev.kind, PointerEventKind::Down(PointerButton::Primary));
        assert_eq!(ev.position, Point::new(3.0, 4.0));
        assert_eq!(ev.pointer, PointerId(0));
        assert_eq!(ev.modifiers, Modifiers::NONE);
    }

    #[test]
    fn builder_overrides() {
        let ev = PointerEvent::moved(1.0, 1.0)
            .with_pointer(PointerId(7))
            .with_modifiers(Modifiers::SHIFT | Modifiers::CTRL);
        assert_eq!(ev.pointer, PointerId(7));
        assert!(ev.modifiers.contains(Modifiers::SHIFT));
        assert!(!ev.modifiers.contains(Modifiers::ALT));
    }

    #[test]
    fn ends_press_classification() {
        assert!(PointerEvent::up(0.0, 0.0).ends_press());
        assert!(PointerEvent::leave(0.0, 0.0).ends_press());
        assert!(PointerEvent::new(PointerEventKind::Cancel, 0.0, 0.0).ends_press());
        assert!(!PointerEvent::down(0.0, 0.0).ends_press());
        assert!(!PointerEvent::moved(0.0, 0.0).ends_press());
    }

    #[test]
    fn event_from_pointer() {
        let ev: Event = PointerEvent::up(2.0, 2.0).into();
        assert!(matches!(ev, Event::Pointer(p) if p.position == Point::new(2.0, 2.0)));
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }
}
