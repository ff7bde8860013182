#![forbid(unsafe_code)]

//! Host-driven runtime for Vitrine widgets.
//!
//! # Role in Vitrine
//! `vitrine-runtime` sits between a host (browser page, native window, or the
//! headless test host) and the widget engines. It owns the scheduling and
//! lifecycle rules: which component gets frame callbacks and timers, where
//! pointer events go, and what is torn down on unmount.
//!
//! # Primary responsibilities
//! - **Host**: the primitives a host provides ([`Host`]) and an in-memory
//!   implementation with a virtual clock ([`HeadlessHost`]).
//! - **Scheduler**: single-threaded timers with cancellation tokens.
//! - **Component**: the mountable unit and its declared subscriptions.
//! - **Stage**: mount/unmount, input routing, subscription reconciliation.
//!
//! # How it fits in the system
//! Engines in `vitrine-widgets` never see the host. The stage calls them with
//! explicit timestamps and pointer events, and asks the host for frames,
//! timers and captures on their behalf.

pub mod component;
pub mod host;
pub mod mount;
pub mod scheduler;
pub mod stage;

pub use component::{Component, Reaction, Sub, SubId};
pub use host::{FrameToken, HeadlessHost, Host, HostError, WidgetId};
pub use mount::{CarouselMount, MarqueeMount, OrbitalMount, ScrollGradientMount, TypewriterMount};
pub use scheduler::{CancelToken, Scheduler, TaskHandle, TaskId};
pub use stage::{Stage, StageConfig, StageError, StepReport};
