#![forbid(unsafe_code)]

//! Vitrine public facade crate.
//!
//! Re-exports the common types of the internal crates, the static site
//! [`content`], and the [`page`] composition that mounts every widget on a
//! stage.

use std::fmt;

pub mod content;
pub mod page;

// --- Core re-exports -------------------------------------------------------

pub use vitrine_core::clock::{Clock, DeterministicClock, FrameDelta, SystemClock};
pub use vitrine_core::event::{
    Event, Modifiers, PointerButton, PointerEvent, PointerEventKind, PointerId, ScrollEvent,
};
pub use vitrine_core::geometry::{Point, Rect, Size};

// --- Widget re-exports -----------------------------------------------------

pub use vitrine_widgets::carousel::{Bounds, Card, Carousel, CarouselConfig};
pub use vitrine_widgets::marquee::{Marquee, MarqueeConfig, MarqueeItem};
pub use vitrine_widgets::orbital::{
    NodeId, NodeStatus, OrbitalConfig, OrbitalTimeline, TimelineItem, Transition,
};
pub use vitrine_widgets::scroll_gradient::{Orb, ScrollGradient};
pub use vitrine_widgets::typewriter::{Typewriter, TypewriterConfig};
pub use vitrine_widgets::{AssetRef, Content, DisplayItem, DisplayList, StyleToken, Widget};

// --- Runtime re-exports ----------------------------------------------------

pub use vitrine_runtime::{
    Component, HeadlessHost, Host, HostError, Stage, StageConfig, StageError, StepReport, WidgetId,
};

pub use page::{Portfolio, Section};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Vitrine apps.
#[derive(Debug)]
pub enum Error {
    /// Stage or host failure.
    Stage(StageError),
    /// I/O failure (trace output, asset loading).
    Io(std::io::Error),
    /// Invalid configuration with message.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stage(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<StageError> for Error {
    fn from(err: StageError) -> Self {
        Self::Stage(err)
    }
}

impl From<HostError> for Error {
    fn from(err: HostError) -> Self {
        Self::Stage(StageError::Host(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for Vitrine APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DisplayList, Error, Event, HeadlessHost, Point, PointerEvent, Portfolio, Rect, Result,
        ScrollEvent, Section, Size, Stage, StageConfig, Widget, WidgetId,
    };

    pub use crate::{core, runtime, widgets};
}

pub use vitrine_core as core;
pub use vitrine_runtime as runtime;
pub use vitrine_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_conversions() {
        let err: Error = HostError::UnknownWidget(WidgetId(2)).into();
        assert!(matches!(
            err,
            Error::Stage(StageError::Host(HostError::UnknownWidget(WidgetId(2))))
        ));
        assert_eq!(err.to_string(), "host error: unknown widget w2");

        let io: Error = std::io::Error::other("disk full").into();
        assert_eq!(io.to_string(), "disk full");

        assert_eq!(
            Error::Config("frames must be positive".into()).to_string(),
            "invalid configuration: frames must be positive"
        );
    }
}
