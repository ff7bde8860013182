#![forbid(unsafe_code)]

//! Detail panel for the expanded node.
//!
//! The panel hangs below the expanded node and lists the node's metadata,
//! an energy bar and one button per related node. Layout is computed with
//! fixed metrics so that hit testing and painting agree exactly.

use vitrine_core::geometry::{Point, Rect};

use super::{NodeId, TimelineItem};
use crate::{Content, DisplayItem, DisplayList, StyleToken};

const PADDING: f32 = 16.0;
const ROW: f32 = 20.0;
const TITLE_ROW: f32 = 24.0;
const LINE_HEIGHT: f32 = 18.0;
const CHAR_WIDTH: f32 = 7.0;
const BAR_HEIGHT: f32 = 6.0;
const BUTTON_HEIGHT: f32 = 24.0;
const BUTTON_GAP: f32 = 4.0;
const BUTTON_CHAR_WIDTH: f32 = 8.0;
const BUTTON_PADDING: f32 = 24.0;

/// Panels sit above every node.
pub const PANEL_Z: i32 = 300;

/// A related-node button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: NodeId,
    /// Title of the related node; empty when the id does not resolve.
    pub label: String,
}

/// View model for the expanded node's panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel<'a> {
    pub item: &'a TimelineItem,
    pub connections: Vec<Connection>,
}

/// Resolved rectangles of a panel placed on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub bounds: Rect,
    pub badge: Rect,
    pub date: Rect,
    pub title: Rect,
    pub body: Rect,
    pub energy_bar: Rect,
    /// Header of the connections section; `None` when there are none.
    pub connections_header: Option<Rect>,
    pub buttons: Vec<(NodeId, Rect)>,
}

impl PanelLayout {
    /// The related-node button under `p`, if any.
    pub fn button_at(&self, p: Point) -> Option<NodeId> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(p))
            .map(|(id, _)| *id)
    }
}

impl<'a> DetailPanel<'a> {
    /// Build the panel for `item`, resolving related ids against `items`.
    pub fn build(item: &'a TimelineItem, items: &[TimelineItem]) -> Self {
        let connections = item
            .related
            .iter()
            .map(|&id| Connection {
                id,
                label: items
                    .iter()
                    .find(|other| other.id == id)
                    .map(|other| other.title.clone())
                    .unwrap_or_default(),
            })
            .collect();
        Self { item, connections }
    }

    /// Lay the panel out with its top edge centred `offset` pixels below
    /// `node_center`.
    pub fn layout(&self, node_center: Point, width: f32, offset: f32) -> PanelLayout {
        let x = node_center.x - width / 2.0;
        let top = node_center.y + offset;
        let inner_x = x + PADDING;
        let inner_w = (width - 2.0 * PADDING).max(0.0);
        let mut y = top + PADDING;

        let badge_w = self.item.status.label().len() as f32 * CHAR_WIDTH + 16.0;
        let badge = Rect::new(inner_x, y, badge_w, ROW);
        let date_w = self.item.date.chars().count() as f32 * CHAR_WIDTH;
        let date = Rect::new(x + width - PADDING - date_w, y, date_w, ROW);
        y += ROW + 4.0;

        let title = Rect::new(inner_x, y, inner_w, TITLE_ROW);
        y += TITLE_ROW + 8.0;

        let lines = text_lines(&self.item.content, inner_w);
        let body = Rect::new(inner_x, y, inner_w, lines as f32 * LINE_HEIGHT);
        y += body.height + 12.0;

        // "Energy" caption row, then the bar.
        y += ROW;
        let energy_bar = Rect::new(inner_x, y, inner_w, BAR_HEIGHT);
        y += BAR_HEIGHT;

        let mut connections_header = None;
        let mut buttons = Vec::with_capacity(self.connections.len());
        if !self.connections.is_empty() {
            y += 12.0;
            connections_header = Some(Rect::new(inner_x, y, inner_w, ROW));
            y += ROW + BUTTON_GAP;
            let mut bx = inner_x;
            for connection in &self.connections {
                let bw = (connection.label.chars().count() as f32 * BUTTON_CHAR_WIDTH
                    + BUTTON_PADDING)
                    .min(inner_w);
                if bx > inner_x && bx + bw > inner_x + inner_w {
                    bx = inner_x;
                    y += BUTTON_HEIGHT + BUTTON_GAP;
                }
                buttons.push((connection.id, Rect::new(bx, y, bw, BUTTON_HEIGHT)));
                bx += bw + BUTTON_GAP;
            }
            y += BUTTON_HEIGHT;
        }

        PanelLayout {
            bounds: Rect::new(x, top, width, y + PADDING - top),
            badge,
            date,
            title,
            body,
            energy_bar,
            connections_header,
            buttons,
        }
    }

    /// Paint the panel at a previously computed layout.
    pub fn paint(&self, layout: &PanelLayout, list: &mut DisplayList) {
        let id = self.item.id;
        let item = |suffix: &str, bounds: Rect, content: Content| {
            DisplayItem::new(format!("orbital.panel.{id}.{suffix}"), bounds, content)
                .z_index(PANEL_Z)
        };

        list.push(item("frame", layout.bounds, Content::Surface));
        list.push(item(
            "status",
            layout.badge,
            Content::Badge {
                label: self.item.status.label(),
            },
        ));
        list.push(item(
            "date",
            layout.date,
            Content::Text {
                text: self.item.date.clone(),
                style: StyleToken::Muted,
            },
        ));
        list.push(item(
            "title",
            layout.title,
            Content::Text {
                text: self.item.title.clone(),
                style: StyleToken::Plain,
            },
        ));
        list.push(item(
            "content",
            layout.body,
            Content::Text {
                text: self.item.content.clone(),
                style: StyleToken::Muted,
            },
        ));
        list.push(item(
            "energy",
            layout.energy_bar,
            Content::Bar {
                fraction: f32::from(self.item.energy) / 100.0,
            },
        ));

        if let Some(header) = layout.connections_header {
            list.push(item(
                "connections",
                header,
                Content::Text {
                    text: "Connected Nodes".to_owned(),
                    style: StyleToken::Muted,
                },
            ));
        }
        for (connection, (_, rect)) in self.connections.iter().zip(&layout.buttons) {
            list.push(item(
                &format!("link.{}", connection.id),
                *rect,
                Content::Button {
                    label: connection.label.clone(),
                    target: connection.id.0,
                },
            ));
        }
    }
}

fn text_lines(text: &str, width: f32) -> usize {
    if text.is_empty() {
        return 0;
    }
    let per_line = ((width / CHAR_WIDTH).floor() as usize).max(1);
    text.chars().count().div_ceil(per_line)
}
