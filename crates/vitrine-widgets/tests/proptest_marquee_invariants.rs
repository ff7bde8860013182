//! Property-based invariant tests for the marquee engine.
//!
//! 1. The offset always stays in `(-segment_width, 0]`, for any mix of
//!    frames, drags and re-measures.
//! 2. During a drag, the offset is a pure function of the pointer X.
//! 3. A drag of `d` pixels lands on `normalize_offset(anchor + d)`.
//! 4. Autoplay without wrapping moves exactly `speed * elapsed`.

use proptest::prelude::*;
use std::time::Duration;
use vitrine_core::event::PointerId;
use vitrine_widgets::marquee::{Marquee, MarqueeConfig, MarqueeItem, normalize_offset};

#[derive(Debug, Clone)]
enum Op {
    Frame(u64),
    DragStart(f32),
    DragMove(f32),
    DragEnd,
    Resize(f32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u64..200).prop_map(Op::Frame),
        1 => (-2000.0f32..2000.0).prop_map(Op::DragStart),
        3 => (-5000.0f32..5000.0).prop_map(Op::DragMove),
        1 => Just(Op::DragEnd),
        1 => (0.0f32..1500.0).prop_map(Op::Resize),
    ]
}

fn marquee(n: usize, speed: f32) -> Marquee {
    let items = (0..n).map(|i| MarqueeItem::new(format!("/icons/{i}.svg").as_str())).collect();
    Marquee::new(items, MarqueeConfig::default().speed(speed))
}

fn in_range(m: &Marquee) -> bool {
    let w = m.segment_width();
    if w > 0.0 {
        m.offset() > -w && m.offset() <= 0.0
    } else {
        m.offset() == 0.0
    }
}

proptest! {
    #[test]
    fn offset_stays_in_range(
        n in 0usize..8,
        speed in 0.0f32..2000.0,
        ops in proptest::collection::vec(op(), 1..200),
    ) {
        let mut m = marquee(n, speed);
        let mut now = Duration::ZERO;
        for op in ops {
            match op {
                Op::Frame(ms) => {
                    now += Duration::from_millis(ms);
                    m.on_frame(now);
                }
                Op::DragStart(x) => {
                    if !m.is_dragging() {
                        m.drag_start(PointerId(0), x);
                    }
                }
                Op::DragMove(x) => {
                    m.drag_move(x);
                }
                Op::DragEnd => {
                    m.drag_end();
                }
                Op::Resize(w) => m.set_segment_width(w),
            }
            prop_assert!(in_range(&m), "offset {} width {}", m.offset(), m.segment_width());
        }
    }

    #[test]
    fn drag_move_is_pure_in_x(
        width in 1.0f32..2000.0,
        autoplay_ms in 0u64..10_000,
        anchor_x in -1000.0f32..1000.0,
        x in -10_000.0f32..10_000.0,
        detour in -10_000.0f32..10_000.0,
    ) {
        let mut m = marquee(3, 40.0);
        m.set_segment_width(width);
        m.advance(autoplay_ms as f32 / 1000.0);
        m.drag_start(PointerId(0), anchor_x);
        m.drag_move(x);
        let first = m.offset();
        m.drag_move(detour);
        m.drag_move(x);
        prop_assert_eq!(first, m.offset());
    }

    #[test]
    fn drag_matches_normalized_delta(
        width in 1.0f32..2000.0,
        delta in -10_000.0f32..10_000.0,
    ) {
        let mut m = marquee(3, 40.0);
        m.set_segment_width(width);
        m.drag_start(PointerId(0), 0.0);
        m.drag_move(delta);
        prop_assert_eq!(m.offset(), normalize_offset(delta, width));
    }

    #[test]
    fn autoplay_without_wrap_is_linear(
        speed in 1.0f32..200.0,
        ms in 0u64..1000,
    ) {
        let mut m = marquee(3, speed);
        m.set_segment_width(1_000_000.0);
        m.on_frame(Duration::ZERO);
        m.on_frame(Duration::from_millis(ms));
        let expected = -(speed * ms as f32 / 1000.0);
        prop_assert!((m.offset() - expected).abs() < 1e-2, "{} vs {}", m.offset(), expected);
    }
}
