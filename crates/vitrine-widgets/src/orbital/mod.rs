#![forbid(unsafe_code)]

//! Radial orbital timeline.
//!
//! A fixed set of [`TimelineItem`]s sits evenly spaced on a ring that slowly
//! rotates. Clicking a node stops the rotation, turns the ring so the node
//! sits at [`CANONICAL_DISPLAY_ANGLE`], expands its detail panel and
//! highlights its related nodes.
//!
//! # State machine
//!
//! ```text
//!                 click node i
//!  Idle-Rotating ─────────────────▶ Expanded(i)
//!       ▲  ▲                          │   │
//!       │  └──── click i / background ┘   │ click j (node or panel button)
//!       │                                 ▼
//!       └────────── click j / bg ───── Expanded(j)
//! ```
//!
//! Selection is a single `Option<NodeId>`, so "at most one expanded node" is
//! structural. The pulse set is always the active item's related ids.
//!
//! # Failure Modes
//!
//! | Input | Result |
//! |-------|--------|
//! | Empty ring | Nothing painted, ticks are no-ops |
//! | Click on an id not in the ring | [`Transition::Ignored`] |
//! | Related id that does not resolve | Panel button with an empty label |
//! | Click inside the panel body | [`Transition::Ignored`] (no background reset) |

pub mod layout;
pub mod panel;

use std::fmt;
use std::time::Duration;

use vitrine_core::event::{PointerButton, PointerEvent, PointerEventKind};
use vitrine_core::geometry::{Point, Rect, Size, wrap_degrees};

use crate::{AssetRef, Content, DisplayItem, DisplayList, StyleToken, Widget};

pub use layout::{CANONICAL_DISPLAY_ANGLE, NodePlacement};
pub use panel::{Connection, DetailPanel, PanelLayout};

/// Z-index of the expanded node, above every ring position.
pub const EXPANDED_Z: i32 = 200;

const NODE_SIZE: f32 = 40.0;
const EXPANDED_SCALE: f32 = 1.5;
const CORE_DIAMETER: f32 = 64.0;

/// Identifier of a timeline node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Progress status shown as a badge in the detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeStatus {
    Completed,
    InProgress,
    #[default]
    Pending,
}

impl NodeStatus {
    /// Badge text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "COMPLETE",
            Self::InProgress => "IN PROGRESS",
            Self::Pending => "PENDING",
        }
    }
}

/// One node of the ring. Static for the lifetime of the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    pub id: NodeId,
    pub title: String,
    pub date: String,
    pub content: String,
    pub category: String,
    pub icon: Option<AssetRef>,
    /// Directed edges to other nodes.
    pub related: Vec<NodeId>,
    pub status: NodeStatus,
    /// Glow strength, `0..=100`.
    pub energy: u8,
}

impl TimelineItem {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id: NodeId(id),
            title: title.into(),
            date: String::new(),
            content: String::new(),
            category: String::new(),
            icon: None,
            related: Vec::new(),
            status: NodeStatus::default(),
            energy: 0,
        }
    }

    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<AssetRef>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn related(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.related = ids.into_iter().map(NodeId).collect();
        self
    }

    #[must_use]
    pub fn status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the energy, clamped to 100.
    #[must_use]
    pub fn energy(mut self, energy: u8) -> Self {
        self.energy = energy.min(100);
        self
    }
}

/// Orbital timeline configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalConfig {
    /// Ring radius in pixels (default: 200).
    pub radius: f32,
    /// Degrees added per rotation tick (default: 0.3).
    pub step_degrees: f32,
    /// Rotation tick period (default: 50ms).
    pub tick_interval: Duration,
    /// Opacity of the dimmest node (default: 0.4).
    pub min_opacity: f32,
    /// Where a selected node is rotated to (default: 270°).
    pub canonical_angle: f32,
    /// Click radius around a node's centre (default: 20).
    pub node_hit_radius: f32,
    /// Detail panel width (default: 256).
    pub panel_width: f32,
    /// Distance from the node centre to the panel's top edge (default: 80).
    pub panel_offset: f32,
}

impl Default for OrbitalConfig {
    fn default() -> Self {
        Self {
            radius: 200.0,
            step_degrees: 0.3,
            tick_interval: Duration::from_millis(50),
            min_opacity: 0.4,
            canonical_angle: CANONICAL_DISPLAY_ANGLE,
            node_hit_radius: NODE_SIZE / 2.0,
            panel_width: 256.0,
            panel_offset: 80.0,
        }
    }
}

impl OrbitalConfig {
    #[must_use]
    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        self
    }

    #[must_use]
    pub fn step_degrees(mut self, step: f32) -> Self {
        self.step_degrees = if step.is_finite() { step } else { 0.0 };
        self
    }

    /// Set the tick period, floored at 1ms.
    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    #[must_use]
    pub fn min_opacity(mut self, min: f32) -> Self {
        self.min_opacity = if min.is_finite() { min.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    #[must_use]
    pub fn canonical_angle(mut self, deg: f32) -> Self {
        self.canonical_angle = wrap_degrees(deg);
        self
    }
}

/// Result of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle-Rotating to Expanded.
    Expanded(NodeId),
    /// Expanded on one node to expanded on another.
    Retargeted { from: NodeId, to: NodeId },
    /// Back to Idle-Rotating.
    Collapsed(NodeId),
    /// Nothing changed.
    Ignored,
}

impl Transition {
    /// Whether the view state changed.
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// What lies under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitalHit {
    Node(NodeId),
    /// A related-node button inside the panel.
    PanelButton(NodeId),
    /// The panel body; swallows clicks.
    Panel,
    Background,
}

/// The orbital timeline engine.
#[derive(Debug, Clone)]
pub struct OrbitalTimeline {
    items: Vec<TimelineItem>,
    config: OrbitalConfig,
    rotation: f32,
    active: Option<NodeId>,
}

impl OrbitalTimeline {
    pub fn new(items: Vec<TimelineItem>, config: OrbitalConfig) -> Self {
        Self {
            items,
            config,
            rotation: 0.0,
            active: None,
        }
    }

    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    pub fn config(&self) -> &OrbitalConfig {
        &self.config
    }

    /// Current ring rotation in degrees, `[0, 360)`.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// The expanded node, if any.
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn active_item(&self) -> Option<&TimelineItem> {
        self.active.and_then(|id| self.item(id))
    }

    /// Whether the ring auto-rotates (no node expanded).
    pub fn is_rotating(&self) -> bool {
        self.active.is_none()
    }

    /// Whether rotation ticks should be scheduled at all.
    pub fn wants_ticks(&self) -> bool {
        self.is_rotating() && !self.items.is_empty()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.active == Some(id)
    }

    /// Ids highlighted as related to the expanded node.
    pub fn pulse_set(&self) -> &[NodeId] {
        self.active_item()
            .map(|item| item.related.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_pulsing(&self, id: NodeId) -> bool {
        self.pulse_set().contains(&id)
    }

    pub fn item(&self, id: NodeId) -> Option<&TimelineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Toggle node `id`: expand it, collapse it if already expanded, or move
    /// the expansion to it from another node.
    pub fn click_node(&mut self, id: NodeId) -> Transition {
        let Some(index) = self.index_of(id) else {
            vitrine_core::debug!(%id, "orbital click on unknown node");
            return Transition::Ignored;
        };
        let transition = match self.active {
            Some(current) if current == id => {
                self.active = None;
                Transition::Collapsed(id)
            }
            previous => {
                self.active = Some(id);
                self.rotation =
                    layout::recenter_rotation(index, self.items.len(), self.config.canonical_angle);
                match previous {
                    Some(from) => Transition::Retargeted { from, to: id },
                    None => Transition::Expanded(id),
                }
            }
        };
        vitrine_core::debug!(?transition, rotation = self.rotation, "orbital transition");
        transition
    }

    /// Click on empty space: collapse back to rotating.
    pub fn click_background(&mut self) -> Transition {
        match self.active.take() {
            Some(id) => {
                vitrine_core::debug!(%id, "orbital collapsed from background");
                Transition::Collapsed(id)
            }
            None => Transition::Ignored,
        }
    }

    /// One auto-rotation step. Returns whether the ring moved.
    pub fn tick(&mut self) -> bool {
        if !self.wants_ticks() || self.config.step_degrees == 0.0 {
            return false;
        }
        let next = wrap_degrees(self.rotation + self.config.step_degrees);
        self.rotation = wrap_degrees(layout::round3(next));
        true
    }

    /// Placement of node `index` with expansion applied.
    pub fn placement(&self, index: usize) -> Option<NodePlacement> {
        let item = self.items.get(index)?;
        let mut placement = layout::node_placement(
            index,
            self.items.len(),
            self.rotation,
            self.config.radius,
            self.config.min_opacity,
        );
        if self.is_expanded(item.id) {
            placement.z_index = EXPANDED_Z;
            placement.opacity = 1.0;
        }
        Some(placement)
    }

    /// Panel view model for the expanded node.
    pub fn detail_panel(&self) -> Option<DetailPanel<'_>> {
        self.active_item()
            .map(|item| DetailPanel::build(item, &self.items))
    }

    fn panel_layout(&self, center: Point) -> Option<(DetailPanel<'_>, PanelLayout)> {
        let panel = self.detail_panel()?;
        let index = self.index_of(panel.item.id)?;
        let placement = self.placement(index)?;
        let layout = panel.layout(
            center.offset(placement.position),
            self.config.panel_width,
            self.config.panel_offset,
        );
        Some((panel, layout))
    }

    /// Classify the point `p` inside `area`.
    pub fn hit_test(&self, area: Rect, p: Point) -> OrbitalHit {
        let center = area.center();
        if let Some((_, layout)) = self.panel_layout(center) {
            if let Some(id) = layout.button_at(p) {
                return OrbitalHit::PanelButton(id);
            }
            if layout.bounds.contains(p) {
                return OrbitalHit::Panel;
            }
        }

        let mut best: Option<(i32, NodeId)> = None;
        for (index, item) in self.items.iter().enumerate() {
            let Some(placement) = self.placement(index) else {
                continue;
            };
            let node_center = center.offset(placement.position);
            if node_center.distance(p) <= self.config.node_hit_radius
                && best.is_none_or(|(z, _)| placement.z_index > z)
            {
                best = Some((placement.z_index, item.id));
            }
        }
        best.map_or(OrbitalHit::Background, |(_, id)| OrbitalHit::Node(id))
    }

    /// Route a pointer event. A primary-button release counts as a click.
    pub fn handle_pointer(&mut self, area: Rect, event: &PointerEvent) -> Transition {
        if event.kind != PointerEventKind::Up(PointerButton::Primary) {
            return Transition::Ignored;
        }
        match self.hit_test(area, event.position) {
            OrbitalHit::Node(id) | OrbitalHit::PanelButton(id) => self.click_node(id),
            OrbitalHit::Panel => Transition::Ignored,
            OrbitalHit::Background => self.click_background(),
        }
    }
}

impl Widget for OrbitalTimeline {
    fn paint(&self, area: Rect, list: &mut DisplayList) {
        if self.items.is_empty() || area.is_empty() {
            return;
        }
        let span = vitrine_core::debug_span!(
            "orbital.paint",
            nodes = self.items.len(),
            rotation = self.rotation
        );
        let _guard = span.enter();

        let center = area.center();
        list.push(
            DisplayItem::new(
                "orbital.core",
                Rect::centered(center, Size::new(CORE_DIAMETER, CORE_DIAMETER)),
                Content::Glow {
                    diameter: CORE_DIAMETER,
                    pulsing: true,
                },
            )
            .z_index(10),
        );

        for (index, item) in self.items.iter().enumerate() {
            let Some(placement) = self.placement(index) else {
                continue;
            };
            let node_center = center.offset(placement.position);
            let expanded = self.is_expanded(item.id);
            let glow = layout::glow_diameter(item.energy);

            list.push(
                DisplayItem::new(
                    format!("orbital.glow.{}", item.id),
                    Rect::centered(node_center, Size::new(glow, glow)),
                    Content::Glow {
                        diameter: glow,
                        pulsing: self.is_pulsing(item.id),
                    },
                )
                .z_index(placement.z_index)
                .opacity(placement.opacity),
            );

            let face = match &item.icon {
                Some(asset) => Content::Image {
                    asset: asset.clone(),
                    label: None,
                },
                None => Content::Text {
                    text: item.title.chars().take(1).collect(),
                    style: StyleToken::Plain,
                },
            };
            list.push(
                DisplayItem::new(
                    format!("orbital.node.{}", item.id),
                    Rect::centered(node_center, Size::new(NODE_SIZE, NODE_SIZE)),
                    face,
                )
                .z_index(placement.z_index)
                .opacity(placement.opacity)
                .scale(if expanded { EXPANDED_SCALE } else { 1.0 }),
            );

            list.push(
                DisplayItem::new(
                    format!("orbital.label.{}", item.id),
                    Rect::new(node_center.x - 50.0, node_center.y + 32.0, 100.0, 16.0),
                    Content::Text {
                        text: item.title.clone(),
                        style: if expanded {
                            StyleToken::Accent
                        } else {
                            StyleToken::Muted
                        },
                    },
                )
                .z_index(placement.z_index)
                .opacity(placement.opacity),
            );
        }

        if let Some((panel, layout)) = self.panel_layout(center) {
            panel.paint(&layout, list);
        }
    }

    fn is_decorative(&self) -> bool {
        false
    }
}
