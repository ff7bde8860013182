#![forbid(unsafe_code)]

//! Index-based card carousel with pagination dots.
//!
//! Used for the project cards (wrapping, with arrows and swipes) and the
//! experience slider (clamped, scrubbed through its dots). Changing the
//! active card starts a cross-fade; the outgoing card fades out while the
//! incoming card fades in.
//!
//! Pointer input:
//! - Press on the dot strip starts a scrub: the active card follows the dot
//!   nearest the pointer until release.
//! - Press elsewhere starts a swipe: on release, a horizontal travel of at
//!   least `swipe_threshold` moves one card (left swipe shows the next).

use std::time::Duration;

use vitrine_core::animation::{Animation, Fade, ease_in_out};
use vitrine_core::event::{PointerEvent, PointerEventKind, PointerId};
use vitrine_core::geometry::{Point, Rect, Size};

use crate::{AssetRef, Content, DisplayItem, DisplayList, PointerOutcome, StyleToken, Widget};

const DOT_DIAMETER: f32 = 10.0;
const DOT_GAP: f32 = 12.0;
const DOT_STRIP: f32 = 32.0;

/// Behaviour at the ends of the card list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bounds {
    /// Next after the last card is the first, and vice versa.
    #[default]
    Wrap,
    /// Saturate at the first and last card.
    Clamp,
}

/// One card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub subtitle: String,
    pub image: Option<AssetRef>,
}

impl Card {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            image: None,
        }
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<AssetRef>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Carousel configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselConfig {
    pub bounds: Bounds,
    /// Advance automatically at this period (default: off).
    pub autoplay: Option<Duration>,
    /// Minimum horizontal travel for a swipe (default: 50).
    pub swipe_threshold: f32,
    /// Cross-fade duration (default: 400ms).
    pub fade: Duration,
    /// Card shown first; clamped to the card count.
    pub start_index: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::Wrap,
            autoplay: None,
            swipe_threshold: 50.0,
            fade: Duration::from_millis(400),
            start_index: 0,
        }
    }
}

impl CarouselConfig {
    #[must_use]
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Enable autoplay, floored at 1ms.
    #[must_use]
    pub fn autoplay(mut self, interval: Duration) -> Self {
        self.autoplay = Some(interval.max(Duration::from_millis(1)));
        self
    }

    #[must_use]
    pub fn swipe_threshold(mut self, px: f32) -> Self {
        self.swipe_threshold = if px.is_finite() { px.max(0.0) } else { 0.0 };
        self
    }

    #[must_use]
    pub fn fade(mut self, duration: Duration) -> Self {
        self.fade = duration;
        self
    }

    #[must_use]
    pub fn start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    Swipe { pointer: PointerId, start_x: f32 },
    Scrub { pointer: PointerId },
}

impl Press {
    fn pointer(self) -> PointerId {
        match self {
            Self::Swipe { pointer, .. } | Self::Scrub { pointer } => pointer,
        }
    }
}

/// The carousel engine.
#[derive(Debug, Clone)]
pub struct Carousel {
    cards: Vec<Card>,
    config: CarouselConfig,
    index: usize,
    previous: Option<usize>,
    fade: Fade,
    press: Option<Press>,
    size: Size,
}

impl Carousel {
    pub fn new(cards: Vec<Card>, config: CarouselConfig) -> Self {
        let index = config.start_index.min(cards.len().saturating_sub(1));
        Self {
            cards,
            config,
            index,
            previous: None,
            fade: Fade::completed(config.fade),
            press: None,
            size: Size::ZERO,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Index of the active card.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Card> {
        self.cards.get(self.index)
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether a cross-fade is in progress.
    pub fn is_animating(&self) -> bool {
        !self.fade.is_complete()
    }

    /// Whether a pointer is held on the carousel.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Record the measured widget size used for dot hit testing.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.cards.len() || index == self.index {
            return false;
        }
        vitrine_core::debug!(from = self.index, to = index, "carousel move");
        self.previous = Some(self.index);
        self.index = index;
        self.fade = Fade::new(self.config.fade).easing(ease_in_out);
        true
    }

    pub fn next(&mut self) -> bool {
        let n = self.cards.len();
        if n == 0 {
            return false;
        }
        let target = match self.config.bounds {
            Bounds::Wrap => (self.index + 1) % n,
            Bounds::Clamp => (self.index + 1).min(n - 1),
        };
        self.go_to(target)
    }

    pub fn previous(&mut self) -> bool {
        let n = self.cards.len();
        if n == 0 {
            return false;
        }
        let target = match self.config.bounds {
            Bounds::Wrap => (self.index + n - 1) % n,
            Bounds::Clamp => self.index.saturating_sub(1),
        };
        self.go_to(target)
    }

    /// Autoplay step: advance, returning to the first card after the last.
    pub fn autoplay_tick(&mut self) -> bool {
        let n = self.cards.len();
        if n == 0 || self.press.is_some() {
            return false;
        }
        self.go_to((self.index + 1) % n)
    }

    /// Advance the cross-fade. Returns whether anything is still moving.
    pub fn animate(&mut self, dt: Duration) -> bool {
        if self.fade.is_complete() {
            return false;
        }
        self.fade.tick(dt);
        if self.fade.is_complete() {
            self.previous = None;
        }
        true
    }

    /// Opacity of the active card, `0..=1`.
    pub fn fade_progress(&self) -> f32 {
        self.fade.value()
    }

    fn dots_area(&self, area: Rect) -> Rect {
        Rect::new(
            area.x,
            area.bottom() - DOT_STRIP,
            area.width,
            DOT_STRIP.min(area.height),
        )
    }

    /// Centres of the pagination dots within `area`.
    pub fn dot_centers(&self, area: Rect) -> Vec<Point> {
        let n = self.cards.len();
        if n == 0 {
            return Vec::new();
        }
        let strip = self.dots_area(area);
        let total = n as f32 * DOT_DIAMETER + (n - 1) as f32 * DOT_GAP;
        let left = strip.center().x - total / 2.0 + DOT_DIAMETER / 2.0;
        (0..n)
            .map(|i| Point::new(left + i as f32 * (DOT_DIAMETER + DOT_GAP), strip.center().y))
            .collect()
    }

    /// Dot nearest to `x`; ties resolve to the lower index.
    pub fn nearest_dot(&self, area: Rect, x: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, c) in self.dot_centers(area).into_iter().enumerate() {
            let d = (c.x - x).abs();
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Route a pointer event. Coordinates are relative to the widget.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerOutcome {
        if self.cards.is_empty() {
            return PointerOutcome::Ignored;
        }
        let area = Rect::from_size(self.size.width, self.size.height);
        match (event.kind, self.press) {
            (PointerEventKind::Down(_), None) => {
                if self.dots_area(area).contains(event.position) {
                    self.press = Some(Press::Scrub {
                        pointer: event.pointer,
                    });
                    if let Some(i) = self.nearest_dot(area, event.position.x) {
                        self.go_to(i);
                    }
                } else {
                    self.press = Some(Press::Swipe {
                        pointer: event.pointer,
                        start_x: event.position.x,
                    });
                }
                PointerOutcome::Capture
            }
            (PointerEventKind::Move, Some(Press::Scrub { pointer })) if pointer == event.pointer => {
                match self.nearest_dot(area, event.position.x) {
                    Some(i) if self.go_to(i) => PointerOutcome::Handled,
                    _ => PointerOutcome::Ignored,
                }
            }
            (PointerEventKind::Up(_), Some(press)) if press.pointer() == event.pointer => {
                self.press = None;
                if let Press::Swipe { start_x, .. } = press {
                    let dx = event.position.x - start_x;
                    if dx.abs() >= self.config.swipe_threshold {
                        if dx < 0.0 {
                            self.next();
                        } else {
                            self.previous();
                        }
                    }
                }
                PointerOutcome::Release
            }
            (PointerEventKind::Leave | PointerEventKind::Cancel, Some(press))
                if press.pointer() == event.pointer =>
            {
                self.press = None;
                PointerOutcome::Release
            }
            _ => PointerOutcome::Ignored,
        }
    }
}

impl Widget for Carousel {
    fn paint(&self, area: Rect, list: &mut DisplayList) {
        if self.cards.is_empty() || area.is_empty() {
            return;
        }
        let card_area = Rect::new(
            area.x,
            area.y,
            area.width,
            (area.height - DOT_STRIP).max(0.0),
        );
        let progress = self.fade.value();
        if let Some(prev) = self.previous.and_then(|i| self.cards.get(i).map(|c| (i, c))) {
            paint_card(prev.0, prev.1, card_area, 1.0 - progress, list);
        }
        if let Some(card) = self.cards.get(self.index) {
            paint_card(self.index, card, card_area, progress, list);
        }
        for (i, c) in self.dot_centers(area).into_iter().enumerate() {
            list.push(
                DisplayItem::new(
                    format!("carousel.dot.{i}"),
                    Rect::centered(c, Size::new(DOT_DIAMETER, DOT_DIAMETER)),
                    Content::Dot {
                        active: i == self.index,
                    },
                )
                .z_index(2),
            );
        }
    }

    fn is_decorative(&self) -> bool {
        false
    }
}

fn paint_card(index: usize, card: &Card, area: Rect, opacity: f32, list: &mut DisplayList) {
    list.push(
        DisplayItem::new(format!("carousel.card.{index}"), area, Content::Surface)
            .opacity(opacity),
    );
    if let Some(image) = &card.image {
        list.push(
            DisplayItem::new(
                format!("carousel.card.{index}.image"),
                Rect::new(area.x, area.y, area.width, area.height * 0.6),
                Content::Image {
                    asset: image.clone(),
                    label: None,
                },
            )
            .z_index(1)
            .opacity(opacity),
        );
    }
    let text_y = area.y + area.height * 0.6 + 16.0;
    list.push(
        DisplayItem::new(
            format!("carousel.card.{index}.title"),
            Rect::new(area.x + 16.0, text_y, area.width - 32.0, 28.0),
            Content::Text {
                text: card.title.clone(),
                style: StyleToken::Plain,
            },
        )
        .z_index(1)
        .opacity(opacity),
    );
    list.push(
        DisplayItem::new(
            format!("carousel.card.{index}.subtitle"),
            Rect::new(area.x + 16.0, text_y + 32.0, area.width - 32.0, 20.0),
            Content::Text {
                text: card.subtitle.clone(),
                style: StyleToken::Accent,
            },
        )
        .z_index(1)
        .opacity(opacity),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(n: usize) -> Vec<Card> {
        (0..n).map(|i| Card::new(format!("Card {i}"), "sub")).collect()
    }

    fn sized(n: usize, config: CarouselConfig) -> Carousel {
        let mut c = Carousel::new(cards(n), config);
        c.set_size(Size::new(400.0, 300.0));
        c
    }

    #[test]
    fn wrap_bounds_cycle() {
        let mut c = Carousel::new(cards(3), CarouselConfig::default());
        assert!(c.previous());
        assert_eq!(c.index(), 2);
        assert!(c.next());
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn clamp_bounds_saturate() {
        let cfg = CarouselConfig::default().bounds(Bounds::Clamp).start_index(99);
        let mut c = Carousel::new(cards(4), cfg);
        assert_eq!(c.index(), 3);
        assert!(!c.next());
        assert!(c.previous());
        assert_eq!(c.index(), 2);
        c.go_to(0);
        assert!(!c.previous());
    }

    #[test]
    fn autoplay_wraps_even_when_clamped() {
        let cfg = CarouselConfig::default().bounds(Bounds::Clamp).start_index(2);
        let mut c = Carousel::new(cards(3), cfg);
        assert!(c.autoplay_tick());
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn empty_carousel_is_inert() {
        let mut c = Carousel::new(Vec::new(), CarouselConfig::default());
        assert!(!c.next());
        assert!(!c.previous());
        assert!(!c.autoplay_tick());
        assert_eq!(c.handle_pointer(&PointerEvent::down(1.0, 1.0)), PointerOutcome::Ignored);
        let mut list = DisplayList::new();
        c.paint(Rect::from_size(100.0, 100.0), &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn change_starts_crossfade() {
        let mut c = Carousel::new(cards(2), CarouselConfig::default());
        assert!(!c.is_animating());
        c.next();
        assert!(c.is_animating());
        assert!(c.animate(Duration::from_millis(200)));
        let mid = c.fade_progress();
        assert!((mid - 0.5).abs() < 0.01);

        let mut list = DisplayList::new();
        c.paint(Rect::from_size(400.0, 300.0), &mut list);
        let out = list.get("carousel.card.0").map(|i| i.opacity);
        let inc = list.get("carousel.card.1").map(|i| i.opacity);
        assert!(matches!((out, inc), (Some(a), Some(b)) if (a + b - 1.0).abs() < 1e-4));

        c.animate(Duration::from_millis(200));
        assert!(!c.is_animating());
        assert!(!c.animate(Duration::from_millis(16)));
        let mut list = DisplayList::new();
        c.paint(Rect::from_size(400.0, 300.0), &mut list);
        assert!(list.get("carousel.card.0").is_none());
    }

    #[test]
    fn left_swipe_past_threshold_moves_next() {
        let mut c = sized(3, CarouselConfig::default());
        assert_eq!(c.handle_pointer(&PointerEvent::down(300.0, 100.0)), PointerOutcome::Capture);
        assert_eq!(c.handle_pointer(&PointerEvent::up(240.0, 100.0)), PointerOutcome::Release);
        assert_eq!(c.index(), 1);

        c.handle_pointer(&PointerEvent::down(100.0, 100.0));
        c.handle_pointer(&PointerEvent::up(149.0, 100.0));
        assert_eq!(c.index(), 1, "49px is below the threshold");

        c.handle_pointer(&PointerEvent::down(100.0, 100.0));
        c.handle_pointer(&PointerEvent::up(150.0, 100.0));
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn scrub_follows_nearest_dot() {
        let cfg = CarouselConfig::default().bounds(Bounds::Clamp).start_index(3);
        let mut c = sized(4, cfg);
        let area = Rect::from_size(400.0, 300.0);
        let dots = c.dot_centers(area);
        assert_eq!(dots.len(), 4);

        assert_eq!(
            c.handle_pointer(&PointerEvent::down(dots[1].x + 2.0, dots[1].y)),
            PointerOutcome::Capture
        );
        assert_eq!(c.index(), 1);
        // Moves are tracked anywhere while captured.
        assert_eq!(
            c.handle_pointer(&PointerEvent::moved(dots[0].x - 80.0, 10.0)),
            PointerOutcome::Handled
        );
        assert_eq!(c.index(), 0);
        assert_eq!(c.handle_pointer(&PointerEvent::leave(0.0, 0.0)), PointerOutcome::Release);
        assert!(!c.is_pressed());
    }

    #[test]
    fn nearest_dot_tie_prefers_lower_index() {
        let c = Carousel::new(cards(2), CarouselConfig::default());
        let area = Rect::from_size(400.0, 300.0);
        let dots = c.dot_centers(area);
        let mid = (dots[0].x + dots[1].x) / 2.0;
        assert_eq!(c.nearest_dot(area, mid), Some(0));
    }

    #[test]
    fn autoplay_pauses_while_pressed() {
        let mut c = sized(3, CarouselConfig::default().autoplay(Duration::from_secs(5)));
        c.handle_pointer(&PointerEvent::down(10.0, 10.0));
        assert!(!c.autoplay_tick());
        c.handle_pointer(&PointerEvent::up(10.0, 10.0));
        assert!(c.autoplay_tick());
    }
}
