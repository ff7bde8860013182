#![forbid(unsafe_code)]

//! Continuous, draggable marquee.
//!
//! A horizontal strip of tiles rendered as two identical copies side by side.
//! The strip's `offset` moves left at a constant rate and wraps by one
//! segment width whenever it reaches `-segment_width`, so the second copy
//! takes the first copy's place without a visible seam. A drag suspends the
//! automatic advance and moves the strip with the pointer.
//!
//! # Invariants
//!
//! 1. After every update, `-segment_width < offset <= 0`.
//! 2. With a zero or unmeasured segment width the offset stays at `0` and
//!    frames are no-ops.
//! 3. During a drag, the offset is a pure function of the pointer X given the
//!    drag anchor.
//! 4. The first frame after construction or after a drag applies a zero
//!    delta.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use vitrine_widgets::marquee::{Marquee, MarqueeConfig, MarqueeItem};
//!
//! let items = vec![MarqueeItem::new("/icons/a.svg"); 3];
//! let mut marquee = Marquee::new(items, MarqueeConfig::default().speed(40.0));
//! marquee.set_segment_width(300.0);
//! marquee.on_frame(Duration::ZERO);
//! marquee.on_frame(Duration::from_secs(1));
//! assert!((marquee.offset() + 40.0).abs() < 1e-4);
//! ```

use std::time::Duration;

use vitrine_core::clock::FrameDelta;
use vitrine_core::event::{PointerEvent, PointerEventKind, PointerId};
use vitrine_core::geometry::{Rect, Size};

use crate::{AssetRef, Content, DisplayItem, DisplayList, PointerOutcome, Widget};

/// Wrap `value` into `(-width, 0]`.
///
/// Returns `0` when `width` is zero, negative or not finite, and when
/// `value` is not finite.
pub fn normalize_offset(value: f32, width: f32) -> f32 {
    if !(width.is_finite() && width > 0.0 && value.is_finite()) {
        return 0.0;
    }
    let r = value.rem_euclid(width);
    // rem_euclid can round up to exactly `width` for tiny negative inputs.
    let wrapped = if r == 0.0 || r >= width { 0.0 } else { r - width };
    if wrapped <= -width { 0.0 } else { wrapped }
}

/// One tile in the strip.
#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeItem {
    pub asset: AssetRef,
    pub label: Option<String>,
}

impl MarqueeItem {
    /// A tile without a caption.
    pub fn new(asset: impl Into<AssetRef>) -> Self {
        Self {
            asset: asset.into(),
            label: None,
        }
    }

    /// Set the caption.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Marquee configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarqueeConfig {
    /// Automatic advance in pixels per second (default: 40).
    pub speed: f32,
    /// Tile size (default: 160x96).
    pub tile: Size,
    /// Horizontal gap after every tile (default: 24).
    pub gap: f32,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            speed: 40.0,
            tile: Size::new(160.0, 96.0),
            gap: 24.0,
        }
    }
}

impl MarqueeConfig {
    /// Set the speed in px/s. Negative or non-finite speeds become `0`.
    #[must_use]
    pub fn speed(mut self, px_per_second: f32) -> Self {
        self.speed = non_negative(px_per_second);
        self
    }

    /// Set the tile size.
    #[must_use]
    pub fn tile(mut self, tile: Size) -> Self {
        self.tile = Size::new(non_negative(tile.width), non_negative(tile.height));
        self
    }

    /// Set the gap between tiles.
    #[must_use]
    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = non_negative(gap);
        self
    }

    /// Distance between the left edges of two consecutive tiles.
    pub fn pitch(&self) -> f32 {
        self.tile.width + self.gap
    }
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Pointer X and offset captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub pointer: PointerId,
    pub pointer_x: f32,
    pub offset: f32,
}

/// The marquee engine.
#[derive(Debug, Clone)]
pub struct Marquee {
    items: Vec<MarqueeItem>,
    config: MarqueeConfig,
    offset: f32,
    segment_width: f32,
    drag: Option<DragAnchor>,
    frames: FrameDelta,
}

impl Marquee {
    /// Create a marquee over `items`.
    ///
    /// The segment width starts out derived from the tile geometry; hosts
    /// that measure the rendered strip override it with
    /// [`set_segment_width`](Self::set_segment_width).
    pub fn new(items: Vec<MarqueeItem>, config: MarqueeConfig) -> Self {
        let config = MarqueeConfig::default()
            .speed(config.speed)
            .tile(config.tile)
            .gap(config.gap);
        let segment_width = items.len() as f32 * config.pitch();
        Self {
            items,
            config,
            offset: 0.0,
            segment_width,
            drag: None,
            frames: FrameDelta::new(),
        }
    }

    pub fn items(&self) -> &[MarqueeItem] {
        &self.items
    }

    pub fn config(&self) -> &MarqueeConfig {
        &self.config
    }

    /// Current horizontal translation, in `(-segment_width, 0]`.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Width of one copy of the strip.
    pub fn segment_width(&self) -> f32 {
        self.segment_width
    }

    /// Whether a pointer currently drives the strip.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The active drag anchor, if any.
    pub fn drag_anchor(&self) -> Option<DragAnchor> {
        self.drag
    }

    /// Whether frames can move the strip at all.
    pub fn is_animatable(&self) -> bool {
        self.segment_width > 0.0 && !self.items.is_empty()
    }

    /// Record a new measured segment width (initial layout or resize).
    ///
    /// An empty item list always measures zero.
    pub fn set_segment_width(&mut self, width: f32) {
        let width = if self.items.is_empty() {
            0.0
        } else {
            non_negative(width)
        };
        if width != self.segment_width {
            vitrine_core::debug!(
                from = self.segment_width,
                to = width,
                "marquee segment re-measured"
            );
        }
        if self.segment_width == 0.0 && width > 0.0 {
            self.frames.reset();
        }
        self.segment_width = width;
        self.offset = normalize_offset(self.offset, width);
    }

    /// Frame callback at host timestamp `now`.
    ///
    /// Returns whether the offset changed.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        let dt = self.frames.delta(now);
        if self.drag.is_some() {
            return false;
        }
        self.advance(dt.as_secs_f32())
    }

    /// Advance by `elapsed_seconds` of autoplay. No-op while dragging or
    /// when the segment width is zero.
    pub fn advance(&mut self, elapsed_seconds: f32) -> bool {
        if self.drag.is_some() || !self.is_animatable() {
            return false;
        }
        let elapsed = non_negative(elapsed_seconds);
        if elapsed == 0.0 || self.config.speed == 0.0 {
            return false;
        }
        let before = self.offset;
        self.offset = normalize_offset(
            self.offset - self.config.speed * elapsed,
            self.segment_width,
        );
        if self.offset > before {
            vitrine_core::trace!(offset = self.offset, "marquee wrapped");
        }
        self.offset != before
    }

    /// Start a drag at `pointer_x`.
    pub fn drag_start(&mut self, pointer: PointerId, pointer_x: f32) {
        self.drag = Some(DragAnchor {
            pointer,
            pointer_x,
            offset: self.offset,
        });
        vitrine_core::debug!(x = pointer_x, offset = self.offset, "marquee drag start");
    }

    /// Move the strip with the pointer. Ignored when no drag is active.
    pub fn drag_move(&mut self, pointer_x: f32) -> bool {
        let Some(anchor) = self.drag else {
            return false;
        };
        let before = self.offset;
        self.offset = normalize_offset(
            anchor.offset + (pointer_x - anchor.pointer_x),
            self.segment_width,
        );
        self.offset != before
    }

    /// End the drag and drop the frame baseline so the next frame applies a
    /// zero delta.
    pub fn drag_end(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.frames.reset();
        vitrine_core::debug!(offset = self.offset, "marquee drag end");
        true
    }

    /// Route a pointer event through the drag state machine.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerOutcome {
        match (event.kind, self.drag) {
            (PointerEventKind::Down(_), None) => {
                self.drag_start(event.pointer, event.position.x);
                PointerOutcome::Capture
            }
            (PointerEventKind::Move, Some(anchor)) if anchor.pointer == event.pointer => {
                if self.drag_move(event.position.x) {
                    PointerOutcome::Handled
                } else {
                    PointerOutcome::Ignored
                }
            }
            (
                PointerEventKind::Up(_) | PointerEventKind::Leave | PointerEventKind::Cancel,
                Some(anchor),
            ) if anchor.pointer == event.pointer => {
                self.drag_end();
                PointerOutcome::Release
            }
            _ => PointerOutcome::Ignored,
        }
    }
}

impl Widget for Marquee {
    fn paint(&self, area: Rect, list: &mut DisplayList) {
        if self.items.is_empty() || area.is_empty() {
            return;
        }
        let span = vitrine_core::debug_span!("marquee.paint", offset = self.offset);
        let _guard = span.enter();

        let pitch = self.config.pitch();
        let copy_width = if self.segment_width > 0.0 {
            self.segment_width
        } else {
            self.items.len() as f32 * pitch
        };
        let tile = self.config.tile;
        let y = area.y + (area.height - tile.height).max(0.0) / 2.0;

        for copy in 0..2 {
            let base = area.x + self.offset + copy as f32 * copy_width;
            for (i, item) in self.items.iter().enumerate() {
                let x = base + i as f32 * pitch;
                if x + tile.width <= area.x || x >= area.right() {
                    continue;
                }
                list.push(DisplayItem::new(
                    format!("marquee.{copy}.{i}"),
                    Rect::new(x, y, tile.width, tile.height),
                    Content::Image {
                        asset: item.asset.clone(),
                        label: item.label.clone(),
                    },
                ));
            }
        }
    }
}
