#![forbid(unsafe_code)]

//! The host abstraction.
//!
//! A host is whatever embeds the widgets: a browser page, a native window,
//! or the [`HeadlessHost`] used by tests and the harness. The runtime needs
//! exactly four things from it:
//!
//! 1. A monotonic clock and one-shot frame callbacks
//!    ([`Host::now`], [`Host::request_frame`], [`Host::cancel_frame`]).
//! 2. Exclusive pointer routing during a press
//!    ([`Host::capture_pointer`], [`Host::release_pointer`]).
//! 3. Bounding-box measurement ([`Host::measure`]).
//! 4. Resize notification, delivered by calling
//!    [`Stage::resize`](crate::stage::Stage::resize).
//!
//! [`Host::detach`] lets a host drop per-widget state after unmount.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use vitrine_core::clock::{Clock, DeterministicClock};
use vitrine_core::event::PointerId;
use vitrine_core::geometry::{Rect, Size};

/// Identifier of a mounted widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Handle of a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Host operation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host has no element for this widget.
    UnknownWidget(WidgetId),
    /// Release of a pointer the widget does not hold.
    PointerNotCaptured(PointerId),
    /// The host cannot perform the operation.
    Unsupported(&'static str),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWidget(id) => write!(f, "unknown widget {id}"),
            Self::PointerNotCaptured(p) => write!(f, "pointer {} is not captured", p.0),
            Self::Unsupported(what) => write!(f, "unsupported: {what}"),
        }
    }
}

impl std::error::Error for HostError {}

/// Services a widget host provides to the runtime.
pub trait Host {
    /// Current monotonic time.
    fn now(&self) -> Duration;

    /// Ask for a single callback on the next frame for `widget`.
    fn request_frame(&mut self, widget: WidgetId) -> FrameToken;

    /// Withdraw a pending frame request. Unknown tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Route `pointer` exclusively to `widget` until released.
    fn capture_pointer(&mut self, widget: WidgetId, pointer: PointerId) -> Result<(), HostError>;

    /// End a capture taken with [`capture_pointer`](Self::capture_pointer).
    fn release_pointer(&mut self, widget: WidgetId, pointer: PointerId) -> Result<(), HostError>;

    /// Bounding box of `widget` in page coordinates.
    fn measure(&self, widget: WidgetId) -> Result<Rect, HostError>;

    /// Drop whatever the host keeps for `widget` after it is unmounted.
    fn detach(&mut self, _widget: WidgetId) {}
}

/// In-memory host driven by a virtual clock.
///
/// Layout is whatever the caller [`place`](Self::place)s; frame requests
/// queue up until [`take_frames`](Self::take_frames) drains them.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    clock: DeterministicClock,
    viewport: Size,
    next_token: u64,
    frames: BTreeMap<FrameToken, WidgetId>,
    captures: HashMap<PointerId, WidgetId>,
    layout: HashMap<WidgetId, Rect>,
}

impl HeadlessHost {
    /// A host with the given viewport size and the clock at zero.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Advance the virtual clock.
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the virtual clock.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Give `widget` a bounding box.
    pub fn place(&mut self, widget: WidgetId, bounds: Rect) {
        self.layout.insert(widget, bounds);
    }

    /// Drain every pending frame request, oldest first.
    pub fn take_frames(&mut self) -> Vec<(FrameToken, WidgetId)> {
        std::mem::take(&mut self.frames).into_iter().collect()
    }

    /// Number of frame requests waiting.
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Whether `widget` has a frame request waiting.
    pub fn has_frame_for(&self, widget: WidgetId) -> bool {
        self.frames.values().any(|&w| w == widget)
    }

    /// Widget currently holding `pointer`, if any.
    pub fn capture_owner(&self, pointer: PointerId) -> Option<WidgetId> {
        self.captures.get(&pointer).copied()
    }

    /// Number of active pointer captures.
    pub fn capture_count(&self) -> usize {
        self.captures.len()
    }

    /// Number of widgets with a bounding box.
    pub fn placed(&self) -> usize {
        self.layout.len()
    }
}

impl Host for HeadlessHost {
    fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    fn request_frame(&mut self, widget: WidgetId) -> FrameToken {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.frames.insert(token, widget);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.frames.remove(&token);
    }

    fn capture_pointer(&mut self, widget: WidgetId, pointer: PointerId) -> Result<(), HostError> {
        self.captures.insert(pointer, widget);
        Ok(())
    }

    fn release_pointer(&mut self, widget: WidgetId, pointer: PointerId) -> Result<(), HostError> {
        match self.captures.get(&pointer) {
            Some(&owner) if owner == widget => {
                self.captures.remove(&pointer);
                Ok(())
            }
            _ => Err(HostError::PointerNotCaptured(pointer)),
        }
    }

    fn measure(&self, widget: WidgetId) -> Result<Rect, HostError> {
        self.layout
            .get(&widget)
            .copied()
            .ok_or(HostError::UnknownWidget(widget))
    }

    fn detach(&mut self, widget: WidgetId) {
        self.layout.remove(&widget);
    }
}
