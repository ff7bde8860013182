#![forbid(unsafe_code)]

//! Components for each widget engine.
//!
//! Each adapter owns its engine, translates stage events into engine calls
//! and declares the time sources the engine needs in its current state.

use std::time::Duration;

use vitrine_core::clock::FrameDelta;
use vitrine_core::event::Event;
use vitrine_core::geometry::{Rect, Size};
use vitrine_widgets::carousel::Carousel;
use vitrine_widgets::marquee::Marquee;
use vitrine_widgets::orbital::OrbitalTimeline;
use vitrine_widgets::scroll_gradient::ScrollGradient;
use vitrine_widgets::typewriter::Typewriter;
use vitrine_widgets::{DisplayList, Widget};

use crate::component::{Component, Reaction, Sub, SubId};

/// Orbital auto-rotation timer.
pub const ROTATE: SubId = 1;
/// Typewriter cursor blink once typing has finished.
pub const BLINK: SubId = 2;
/// Carousel autoplay.
pub const AUTOPLAY: SubId = 3;

fn local(size: Size) -> Rect {
    Rect::from_size(size.width, size.height)
}

/// The marquee, advanced on every frame while it has a measured width.
#[derive(Debug)]
pub struct MarqueeMount {
    marquee: Marquee,
}

impl MarqueeMount {
    pub fn new(marquee: Marquee) -> Self {
        Self { marquee }
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    /// The segment width comes from the tile geometry (`items × pitch`),
    /// not from the measured size. The size only gates the animation: an
    /// empty box reports zero so nothing moves before layout.
    fn measure(&mut self, size: Size) {
        let width = if size.is_empty() {
            0.0
        } else {
            self.marquee.items().len() as f32 * self.marquee.config().pitch()
        };
        self.marquee.set_segment_width(width);
    }
}

impl Component for MarqueeMount {
    fn name(&self) -> &'static str {
        "marquee"
    }

    fn on_mount(&mut self, bounds: Rect, _now: Duration) {
        self.measure(bounds.size());
    }

    fn on_event(&mut self, event: &Event, _bounds: Rect) -> Reaction {
        match event {
            Event::Pointer(p) => Reaction::from_outcome(self.marquee.handle_pointer(p), p.pointer),
            Event::Resize(size) => {
                self.measure(*size);
                Reaction::dirty()
            }
            Event::Scroll(_) | Event::Frame(_) => Reaction::none(),
        }
    }

    fn on_frame(&mut self, now: Duration) -> bool {
        self.marquee.on_frame(now)
    }

    fn subscriptions(&self) -> Vec<Sub> {
        if self.marquee.is_animatable() {
            vec![Sub::Frames]
        } else {
            Vec::new()
        }
    }

    fn paint(&self, area: Rect, list: &mut DisplayList) {
        self.marquee.paint(area, list);
    }

    fn is_decorative(&self) -> bool {
        self.marquee.is_decorative()
    }
}

/// The orbital timeline, ticked by an interval while it rotates.
#[derive(Debug)]
pub struct OrbitalMount {
    timeline: OrbitalTimeline,
    size: Size,
}

impl OrbitalMount {
    pub fn new(timeline: OrbitalTimeline) -> Self {
        Self {
            timeline,
            size: Size::ZERO,
        }
    }

    pub fn timeline(&self) -> &OrbitalTimeline {
        &self.timeline
    }
}

impl Component for OrbitalMount {
    fn name(&self) -> &'static str {
        "orbital"
    }

    fn on_mount(&mut self, bounds: Rect, _now: Duration) {
        self.size = bounds.size();
    }

    fn on_event(&mut self, event: &Event, _bounds: Rect) -> Reaction {
        match event {
            Event::Pointer(p) => {
                let transition = self.timeline.handle_pointer(local(self.size), p);
                if transition.is_change() {
                    tracing::debug!(?transition, "orbital transition");
                    Reaction::dirty()
                } else {
                    Reaction::none()
                }
            }
            Event::Resize(size) => {
                self.size = *size;
                Reaction::dirty()
            }
            Event::Scroll(_) | Event::Frame(_) => Reaction::none(),
        }
    }

    fn on_timer(&mut self, id: SubId, _now: Duration) -> bool {
        id == ROTATE && self.timeline.tick()
    }

    fn subscriptions(&self) -> Vec<Sub> {
        if self.timeline.wants_ticks() {
            vec![Sub::Every {
                id: ROTATE,
                interval: self.timeline.config().tick_interval,
            }]
        } else {
            Vec::new()
        }
    }

    fn paint(&self, area: Rect, list: &mut DisplayList) {
        self.timeline.paint(area, list);
    }

    fn is_decorative(&self) -> bool {
        self.timeline.is_decorative()
    }
}

/// The typewriter: frames while typing, a blink timer once done.
#[derive(Debug)]
pub struct TypewriterMount {
    typewriter: Typewriter,
    frames: FrameDelta,
}

impl TypewriterMount {
    pub fn new(typewriter: Typewriter) -> Self {
        Self {
            typewriter,
            frames: FrameDelta::new(),
        }
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    fn advance_to(&mut self, now: Duration) -> bool {
        let cursor = self.typewriter.cursor_visible();
        let dt = self.frames.delta(now);
        let typed = self.typewriter.advance(dt);
        typed || cursor != self.typewriter.cursor_visible()
    }
}

impl Component for TypewriterMount {
    fn name(&self) -> &'static str {
        "typewriter"
    }

    fn on_mount(&mut self, _bounds: Rect, now: Duration) {
        self.frames.rebase(now);
    }

    fn on_event(&mut self, event: &Event, _bounds: Rect) -> Reaction {
        match event {
            Event::Resize(_) => Reaction::dirty(),
            _ => Reaction::none(),
        }
    }

    fn on_frame(&mut self, now: Duration) -> bool {
        self.advance_to(now)
    }

    fn on_timer(&mut self, id: SubId, now: Duration) -> bool {
        id == BLINK && self.advance_to(now)
    }

    fn subscriptions(&self) -> Vec<Sub> {
        if !self.typewriter.is_done() {
            vec![Sub::Frames]
        } else if self.typewriter.config().show_cursor {
            vec![Sub::Every {
                id: BLINK,
                interval: self.typewriter.config().cursor_blink,
            }]
        } else {
            Vec::new()
        }
    }

    fn paint(&self, area: Rect, list: &mut DisplayList) {
        self.typewriter.paint(area, list);
    }

    fn is_decorative(&self) -> bool {
        self.typewriter.is_decorative()
    }
}

/// The carousel: frames while cross-fading, an autoplay timer if configured.
#[derive(Debug)]
pub struct CarouselMount {
    carousel: Carousel,
    frames: FrameDelta,
}

impl CarouselMount {
    pub fn new(carousel: Carousel) -> Self {
        Self {
            carousel,
            frames: FrameDelta::new(),
        }
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// A new cross-fade starts from a zero delta.
    fn track(&mut self, before: usize) {
        if self.carousel.index() != before {
            self.frames.reset();
        }
    }
}

impl Component for CarouselMount {
    fn name(&self) -> &'static str {
        "carousel"
    }

    fn on_mount(&mut self, bounds: Rect, _now: Duration) {
        self.carousel.set_size(bounds.size());
    }

    fn on_event(&mut self, event: &Event, _bounds: Rect) -> Reaction {
        let before = self.carousel.index();
        let reaction = match event {
            Event::Pointer(p) => Reaction::from_outcome(self.carousel.handle_pointer(p), p.pointer),
            Event::Resize(size) => {
                self.carousel.set_size(*size);
                Reaction::dirty()
            }
            Event::Scroll(_) | Event::Frame(_) => Reaction::none(),
        };
        self.track(before);
        reaction
    }

    fn on_frame(&mut self, now: Duration) -> bool {
        let dt = self.frames.delta(now);
        self.carousel.animate(dt)
    }

    fn on_timer(&mut self, id: SubId, _now: Duration) -> bool {
        if id != AUTOPLAY {
            return false;
        }
        let before = self.carousel.index();
        let moved = self.carousel.autoplay_tick();
        self.track(before);
        moved
    }

    fn subscriptions(&self) -> Vec<Sub> {
        let mut subs = Vec::new();
        if self.carousel.is_animating() {
            subs.push(Sub::Frames);
        }
        match self.carousel.config().autoplay {
            Some(interval) if !self.carousel.is_empty() => subs.push(Sub::Every {
                id: AUTOPLAY,
                interval,
            }),
            _ => {}
        }
        subs
    }

    fn paint(&self, area: Rect, list: &mut DisplayList) {
        self.carousel.paint(area, list);
    }

    fn is_decorative(&self) -> bool {
        self.carousel.is_decorative()
    }
}

/// The scroll gradient: one frame per burst of scroll events.
#[derive(Debug)]
pub struct ScrollGradientMount {
    gradient: ScrollGradient,
}

impl ScrollGradientMount {
    pub fn new(gradient: ScrollGradient) -> Self {
        Self { gradient }
    }

    pub fn gradient(&self) -> &ScrollGradient {
        &self.gradient
    }
}

impl Component for ScrollGradientMount {
    fn name(&self) -> &'static str {
        "scroll_gradient"
    }

    fn on_event(&mut self, event: &Event, _bounds: Rect) -> Reaction {
        match event {
            Event::Scroll(scroll) => {
                if self.gradient.on_scroll(*scroll) {
                    tracing::trace!(scroll_y = scroll.scroll_y, "gradient frame requested");
                }
                Reaction::none()
            }
            Event::Resize(_) => Reaction::dirty(),
            Event::Pointer(_) | Event::Frame(_) => Reaction::none(),
        }
    }

    fn on_frame(&mut self, _now: Duration) -> bool {
        self.gradient.on_frame()
    }

    fn subscriptions(&self) -> Vec<Sub> {
        if self.gradient.has_pending() {
            vec![Sub::Frames]
        } else {
            Vec::new()
        }
    }

    fn paint(&self, area: Rect, list: &mut DisplayList) {
        self.gradient.paint(area, list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::event::{PointerEvent, ScrollEvent};
    use vitrine_widgets::carousel::{Card, CarouselConfig};
    use vitrine_widgets::marquee::{MarqueeConfig, MarqueeItem};
    use vitrine_widgets::orbital::{OrbitalConfig, TimelineItem};
    use vitrine_widgets::typewriter::TypewriterConfig;

    fn marquee() -> MarqueeMount {
        MarqueeMount::new(Marquee::new(
            vec![MarqueeItem::new("/a.svg"); 3],
            MarqueeConfig::default(),
        ))
    }

    #[test]
    fn marquee_frames_only_with_width() {
        let mut m = marquee();
        m.on_mount(Rect::default(), Duration::ZERO);
        assert!(m.subscriptions().is_empty());
        m.on_event(&Event::Resize(Size::new(1200.0, 96.0)), Rect::default());
        assert_eq!(m.subscriptions(), vec![Sub::Frames]);
        assert_eq!(m.marquee().segment_width(), 3.0 * (160.0 + 24.0));
        m.on_event(&Event::Resize(Size::new(390.0, 96.0)), Rect::default());
        assert_eq!(m.marquee().segment_width(), 3.0 * (160.0 + 24.0));
        m.on_event(&Event::Resize(Size::ZERO), Rect::default());
        assert!(m.subscriptions().is_empty());
    }

    #[test]
    fn marquee_drag_captures_pointer() {
        let mut m = marquee();
        m.on_mount(Rect::from_size(800.0, 96.0), Duration::ZERO);
        let down = m.on_event(&Event::Pointer(PointerEvent::down(10.0, 10.0)), Rect::default());
        assert!(down.capture.is_some());
        let up = m.on_event(&Event::Pointer(PointerEvent::up(60.0, 10.0)), Rect::default());
        assert!(up.release.is_some());
    }

    #[test]
    fn orbital_ticks_only_while_rotating() {
        let items = (1..=4).map(|i| TimelineItem::new(i, format!("n{i}"))).collect();
        let mut o = OrbitalMount::new(OrbitalTimeline::new(items, OrbitalConfig::default()));
        o.on_mount(Rect::from_size(600.0, 600.0), Duration::ZERO);
        assert_eq!(
            o.subscriptions(),
            vec![Sub::Every {
                id: ROTATE,
                interval: Duration::from_millis(50)
            }]
        );
        assert!(o.on_timer(ROTATE, Duration::ZERO));
        assert!(!o.on_timer(BLINK, Duration::ZERO));

        // Node 1 sits at the ring rotation angle.
        let rot = o.timeline().rotation();
        let p = vitrine_core::geometry::polar(200.0, rot);
        let click = PointerEvent::up(300.0 + p.x, 300.0 + p.y);
        assert!(o.on_event(&Event::Pointer(click), Rect::default()).dirty);
        assert!(o.subscriptions().is_empty());
    }

    #[test]
    fn empty_orbital_never_ticks() {
        let o = OrbitalMount::new(OrbitalTimeline::new(Vec::new(), OrbitalConfig::default()));
        assert!(o.subscriptions().is_empty());
    }

    #[test]
    fn typewriter_switches_to_blink_when_done() {
        let mut t = TypewriterMount::new(Typewriter::new(
            ["hi"],
            TypewriterConfig::default(),
        ));
        t.on_mount(Rect::default(), Duration::ZERO);
        assert_eq!(t.subscriptions(), vec![Sub::Frames]);
        let mut now = Duration::ZERO;
        for _ in 0..20 {
            now += Duration::from_millis(16);
            t.on_frame(now);
        }
        assert!(t.typewriter().is_done());
        assert_eq!(
            t.subscriptions(),
            vec![Sub::Every {
                id: BLINK,
                interval: Duration::from_millis(400)
            }]
        );
    }

    #[test]
    fn carousel_frames_while_fading() {
        let cards = (0..3).map(|i| Card::new(format!("c{i}"), "")).collect();
        let mut c = CarouselMount::new(Carousel::new(
            cards,
            CarouselConfig::default().autoplay(Duration::from_secs(5)),
        ));
        assert_eq!(
            c.subscriptions(),
            vec![Sub::Every {
                id: AUTOPLAY,
                interval: Duration::from_secs(5)
            }]
        );
        assert!(c.on_timer(AUTOPLAY, Duration::ZERO));
        assert_eq!(c.carousel().index(), 1);
        assert!(c.subscriptions().contains(&Sub::Frames));
        c.on_frame(Duration::from_millis(100));
        c.on_frame(Duration::from_millis(600));
        assert!(!c.carousel().is_animating());
        assert!(!c.subscriptions().contains(&Sub::Frames));
    }

    #[test]
    fn gradient_wants_one_frame_per_scroll_burst() {
        let mut g = ScrollGradientMount::new(ScrollGradient::new(Vec::new()));
        assert!(g.subscriptions().is_empty());
        let scroll = ScrollEvent {
            scroll_y: 500.0,
            document_height: 2000.0,
            viewport_height: 1000.0,
        };
        g.on_event(&Event::Scroll(scroll), Rect::default());
        g.on_event(&Event::Scroll(scroll), Rect::default());
        assert_eq!(g.subscriptions(), vec![Sub::Frames]);
        assert!(g.on_frame(Duration::ZERO));
        assert_eq!(g.gradient().progress(), 0.5);
        assert!(g.subscriptions().is_empty());
    }
}
