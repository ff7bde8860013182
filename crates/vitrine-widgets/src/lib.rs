#![forbid(unsafe_code)]

//! Animated widgets for Vitrine.
//!
//! Every widget is split into a state machine that advances on explicit time
//! and pointer input, and a [`Widget`] implementation that paints the current
//! state into a [`DisplayList`]. Nothing in this crate touches a host: frame
//! scheduling, timers and pointer capture are requested by the runtime on the
//! widget's behalf.

pub mod carousel;
pub mod marquee;
pub mod orbital;
pub mod scroll_gradient;
pub mod typewriter;

use vitrine_core::geometry::Rect;

/// A `Widget` is a paintable component.
///
/// Widgets paint themselves into a [`DisplayList`] within a given `Rect`.
/// Positions in the emitted items are absolute, i.e. already offset by
/// `area`'s origin.
pub trait Widget {
    /// Paint the widget into the display list at the given area.
    fn paint(&self, area: Rect, list: &mut DisplayList);

    /// Whether this widget is purely decorative.
    ///
    /// Decorative widgets may be skipped when the host asks for reduced
    /// motion or is over its frame budget.
    fn is_decorative(&self) -> bool {
        true
    }
}

/// What a widget asks of the host after handling a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerOutcome {
    /// The event was not for this widget.
    #[default]
    Ignored,
    /// State changed; repaint.
    Handled,
    /// A press started: route this pointer exclusively to the widget.
    Capture,
    /// The press ended: release the capture taken on press.
    Release,
}

impl PointerOutcome {
    /// Whether the widget's state may have changed.
    pub const fn is_dirty(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Opaque handle to an image or icon, resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AssetRef(pub String);

impl AssetRef {
    /// Create an asset reference from a path or identifier.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The underlying path or identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Named style hook the host maps onto its own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleToken {
    Plain,
    Accent,
    AccentWarm,
    AccentGlow,
    Muted,
}

/// What a single display item draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// An image with an optional caption.
    Image {
        asset: AssetRef,
        label: Option<String>,
    },
    /// A rounded backdrop card.
    Surface,
    /// A run of text.
    Text { text: String, style: StyleToken },
    /// A circular glow of the given diameter, centred in the item bounds.
    Glow { diameter: f32, pulsing: bool },
    /// A small status pill.
    Badge { label: &'static str },
    /// A horizontal bar filled to `fraction` (0..=1).
    Bar { fraction: f32 },
    /// A clickable button; `target` is the id it activates.
    Button { label: String, target: u32 },
    /// A blurred radial gradient.
    Orb { style: StyleToken, blur: f32 },
    /// A pagination dot.
    Dot { active: bool },
    /// A text cursor.
    Cursor { visible: bool },
}

/// One positioned item in a paint pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    /// Stable key so hosts can diff successive lists.
    pub key: String,
    /// Absolute bounds.
    pub bounds: Rect,
    /// Stacking order; higher draws above lower.
    pub z_index: i32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Uniform scale around the item's centre.
    pub scale: f32,
    pub content: Content,
}

impl DisplayItem {
    /// A fully opaque, unscaled item at z 0.
    pub fn new(key: impl Into<String>, bounds: Rect, content: Content) -> Self {
        Self {
            key: key.into(),
            bounds,
            z_index: 0,
            opacity: 1.0,
            scale: 1.0,
            content,
        }
    }

    #[must_use]
    pub fn z_index(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Ordered output of a paint pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    items: Vec<DisplayItem>,
}

impl DisplayList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item.
    pub fn push(&mut self, item: DisplayItem) {
        self.items.push(item);
    }

    /// Items in paint order.
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was painted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove all items, keeping the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Look up an item by key.
    pub fn get(&self, key: &str) -> Option<&DisplayItem> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Items sorted by ascending z-index, stable within equal z.
    pub fn sorted_by_z(&self) -> Vec<&DisplayItem> {
        let mut sorted: Vec<&DisplayItem> = self.items.iter().collect();
        sorted.sort_by_key(|item| item.z_index);
        sorted
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DisplayItem;
    type IntoIter = std::slice::Iter<'a, DisplayItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
