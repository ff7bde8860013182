#![forbid(unsafe_code)]

//! Pure ring geometry.
//!
//! Nothing here knows about selection: the state machine feeds in an index,
//! a node count and the current rotation and gets back where the node sits
//! and how it should be drawn.

use vitrine_core::geometry::{Point, polar, wrap_degrees};

/// Screen angle a selected node is rotated to.
///
/// 270° puts the node straight above the centre of the ring.
pub const CANONICAL_DISPLAY_ANGLE: f32 = 270.0;

/// Where one node sits on the ring and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePlacement {
    /// Screen angle in degrees, `[0, 360)`.
    pub angle: f32,
    /// Offset from the ring's centre.
    pub position: Point,
    /// Stacking order, `50..=150`.
    pub z_index: i32,
    /// Opacity, `min_opacity..=1`.
    pub opacity: f32,
}

/// Angle of an evenly spaced slot before rotation.
pub fn base_angle(index: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    index as f32 / total as f32 * 360.0
}

/// Screen angle of node `index` of `total` at `rotation` degrees.
pub fn node_angle(index: usize, total: usize, rotation: f32) -> f32 {
    wrap_degrees(base_angle(index, total) + rotation)
}

/// Full placement of node `index` of `total`.
pub fn node_placement(
    index: usize,
    total: usize,
    rotation: f32,
    radius: f32,
    min_opacity: f32,
) -> NodePlacement {
    let angle = node_angle(index, total, rotation);
    let radians = angle.to_radians();
    let min_opacity = min_opacity.clamp(0.0, 1.0);
    let opacity = (min_opacity + (1.0 - min_opacity) * ((1.0 + radians.sin()) / 2.0))
        .clamp(min_opacity, 1.0);
    NodePlacement {
        angle,
        position: polar(radius, angle),
        z_index: (100.0 + 50.0 * radians.cos()).round() as i32,
        opacity,
    }
}

/// Rotation that brings node `index` of `total` to `canonical` degrees.
pub fn recenter_rotation(index: usize, total: usize, canonical: f32) -> f32 {
    wrap_degrees(canonical - base_angle(index, total))
}

/// Diameter of the glow drawn behind a node with the given energy.
pub fn glow_diameter(energy: u8) -> f32 {
    f32::from(energy.min(100)) * 0.5 + 40.0
}

/// Round to three decimal places.
pub(crate) fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}
