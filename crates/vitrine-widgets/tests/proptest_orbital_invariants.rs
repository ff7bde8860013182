//! Property-based invariant tests for the orbital timeline.
//!
//! 1. At most one node is expanded after any click sequence, and the pulse
//!    set always equals the expanded node's related ids.
//! 2. Expanding a node rotates it onto the canonical display angle,
//!    regardless of its index or the ring's prior rotation.
//! 3. Expanding then collapsing the same node restores the selection and
//!    pulse state.
//! 4. Rotation stays in `[0, 360)` and ticks only while idle.
//! 5. Node placement keeps opacity and stacking inside their ranges.

use proptest::prelude::*;
use vitrine_core::geometry::Point;
use vitrine_widgets::orbital::layout::{node_angle, node_placement};
use vitrine_widgets::orbital::{
    CANONICAL_DISPLAY_ANGLE, NodeId, OrbitalConfig, OrbitalTimeline, TimelineItem,
};

#[derive(Debug, Clone)]
enum Click {
    Node(u32),
    Background,
    Tick,
}

fn click(max_id: u32) -> impl Strategy<Value = Click> {
    prop_oneof![
        4 => (0..max_id + 2).prop_map(Click::Node),
        1 => Just(Click::Background),
        2 => Just(Click::Tick),
    ]
}

fn ring(n: u32, edges: &[(u32, u32)]) -> OrbitalTimeline {
    let items = (1..=n)
        .map(|id| {
            let related: Vec<u32> = edges
                .iter()
                .filter(|(from, _)| *from == id)
                .map(|(_, to)| *to)
                .collect();
            TimelineItem::new(id, format!("Node {id}")).related(related)
        })
        .collect();
    OrbitalTimeline::new(items, OrbitalConfig::default())
}

fn angle_close(a: f32, b: f32) -> bool {
    let d = (a - b).abs();
    d < 1e-2 || (360.0 - d) < 1e-2
}

proptest! {
    #[test]
    fn single_expansion_and_pulse_set(
        n in 1u32..10,
        edges in proptest::collection::vec((1u32..12, 1u32..12), 0..20),
        clicks in proptest::collection::vec(click(10), 1..60),
    ) {
        let mut t = ring(n, &edges);
        for c in clicks {
            match c {
                Click::Node(id) => { t.click_node(NodeId(id)); }
                Click::Background => { t.click_background(); }
                Click::Tick => { t.tick(); }
            }
            let expanded: Vec<NodeId> = t
                .items()
                .iter()
                .map(|item| item.id)
                .filter(|&id| t.is_expanded(id))
                .collect();
            prop_assert!(expanded.len() <= 1);
            prop_assert_eq!(expanded.first().copied(), t.active());
            match t.active_item() {
                Some(item) => {
                    prop_assert_eq!(t.pulse_set(), item.related.as_slice());
                }
                None => {
                    prop_assert!(t.pulse_set().is_empty());
                }
            }
            prop_assert!((0.0..360.0).contains(&t.rotation()));
        }
    }

    #[test]
    fn expansion_centers_node(
        n in 1u32..24,
        pick in 0u32..24,
        ticks in 0usize..2000,
    ) {
        let id = pick % n + 1;
        let mut t = ring(n, &[]);
        for _ in 0..ticks {
            t.tick();
        }
        t.click_node(NodeId(id));
        let index = (id - 1) as usize;
        let angle = node_angle(index, n as usize, t.rotation());
        prop_assert!(angle_close(angle, CANONICAL_DISPLAY_ANGLE), "node {id} at {angle}");
    }

    #[test]
    fn expand_collapse_is_idempotent(
        n in 1u32..10,
        edges in proptest::collection::vec((1u32..10, 1u32..10), 0..15),
        pick in 0u32..10,
    ) {
        let id = NodeId(pick % n + 1);
        let mut t = ring(n, &edges);
        let before = (t.active(), t.pulse_set().to_vec());
        t.click_node(id);
        t.click_node(id);
        prop_assert_eq!(before, (t.active(), t.pulse_set().to_vec()));
        prop_assert!(t.is_rotating());
    }

    #[test]
    fn placement_ranges(
        index in 0usize..50,
        total in 1usize..50,
        rotation in -1000.0f32..1000.0,
        min_opacity in 0.0f32..1.0,
    ) {
        let p = node_placement(index % total, total, rotation, 200.0, min_opacity);
        prop_assert!((0.0..360.0).contains(&p.angle));
        prop_assert!(p.opacity >= min_opacity - 1e-6 && p.opacity <= 1.0);
        prop_assert!((50..=150).contains(&p.z_index));
        let r = Point::ORIGIN.distance(p.position);
        prop_assert!((r - 200.0).abs() < 1e-2);
    }
}
