#![forbid(unsafe_code)]

//! Scroll-driven gradient orbs.
//!
//! Each orb drifts between two viewport positions and two opacities as the
//! page scrolls from top to bottom. Scroll events are coalesced: any number
//! of them between two frames produce a single recomputation when the frame
//! arrives.

use vitrine_core::animation::lerp;
use vitrine_core::event::ScrollEvent;
use vitrine_core::geometry::{Point, Rect, Size};

use crate::{Content, DisplayItem, DisplayList, StyleToken, Widget};

/// Fraction of the scrollable distance travelled, in `[0, 1]`.
///
/// Returns `0` when the document is not taller than the viewport.
pub fn scroll_progress(scroll_y: f32, document_height: f32, viewport_height: f32) -> f32 {
    let max_scroll = document_height - viewport_height;
    if !(max_scroll.is_finite() && max_scroll > 0.0 && scroll_y.is_finite()) {
        return 0.0;
    }
    (scroll_y / max_scroll).clamp(0.0, 1.0)
}

/// A decorative orb. Positions are viewport percentages of its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orb {
    pub style: StyleToken,
    pub start: Point,
    pub end: Point,
    /// Diameter in pixels.
    pub size: f32,
    /// Blur radius in pixels.
    pub blur: f32,
    /// Opacity at the top and at the bottom of the page.
    pub opacity: (f32, f32),
}

/// Interpolated orb state at some scroll progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbState {
    /// Centre, in viewport percentages.
    pub center: Point,
    pub opacity: f32,
}

impl Orb {
    /// State of this orb at `progress`.
    pub fn at(&self, progress: f32) -> OrbState {
        OrbState {
            center: Point::new(
                lerp(self.start.x, self.end.x, progress),
                lerp(self.start.y, self.end.y, progress),
            ),
            opacity: lerp(self.opacity.0, self.opacity.1, progress),
        }
    }
}

/// The scroll gradient engine.
#[derive(Debug, Clone)]
pub struct ScrollGradient {
    orbs: Vec<Orb>,
    progress: f32,
    pending: Option<ScrollEvent>,
}

impl ScrollGradient {
    pub fn new(orbs: Vec<Orb>) -> Self {
        Self {
            orbs,
            progress: 0.0,
            pending: None,
        }
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    /// Scroll progress applied at the last frame.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether a scroll is waiting for the next frame.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Queue a scroll position. Returns `true` when this is the first scroll
    /// since the last frame, i.e. when a frame must be requested.
    pub fn on_scroll(&mut self, event: ScrollEvent) -> bool {
        self.pending.replace(event).is_none()
    }

    /// Apply the most recent queued scroll. Returns whether progress changed.
    pub fn on_frame(&mut self) -> bool {
        match self.pending.take() {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    /// Recompute immediately, bypassing coalescing (initial paint, resize).
    pub fn apply(&mut self, event: ScrollEvent) -> bool {
        let next = scroll_progress(event.scroll_y, event.document_height, event.viewport_height);
        let changed = next != self.progress;
        self.progress = next;
        changed
    }

    /// Interpolated state of every orb.
    pub fn states(&self) -> Vec<OrbState> {
        self.orbs.iter().map(|orb| orb.at(self.progress)).collect()
    }
}

impl Widget for ScrollGradient {
    fn paint(&self, area: Rect, list: &mut DisplayList) {
        if area.is_empty() {
            return;
        }
        for (i, (orb, state)) in self.orbs.iter().zip(self.states()).enumerate() {
            let center = Point::new(
                area.x + area.width * state.center.x / 100.0,
                area.y + area.height * state.center.y / 100.0,
            );
            list.push(
                DisplayItem::new(
                    format!("gradient.orb.{i}"),
                    Rect::centered(center, Size::new(orb.size, orb.size)),
                    Content::Orb {
                        style: orb.style,
                        blur: orb.blur,
                    },
                )
                .z_index(-10)
                .opacity(state.opacity),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orb() -> Orb {
        Orb {
            style: StyleToken::Accent,
            start: Point::new(10.0, -10.0),
            end: Point::new(5.0, 70.0),
            size: 600.0,
            blur: 140.0,
            opacity: (0.13, 0.07),
        }
    }

    fn scroll(y: f32) -> ScrollEvent {
        ScrollEvent {
            scroll_y: y,
            document_height: 3000.0,
            viewport_height: 1000.0,
        }
    }

    #[test]
    fn progress_is_clamped_fraction() {
        assert_eq!(scroll_progress(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(1000.0, 3000.0, 1000.0), 0.5);
        assert_eq!(scroll_progress(2500.0, 3000.0, 1000.0), 1.0);
        assert_eq!(scroll_progress(-40.0, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn unscrollable_page_reports_zero() {
        assert_eq!(scroll_progress(100.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_progress(100.0, 500.0, 800.0), 0.0);
        assert_eq!(scroll_progress(f32::NAN, 3000.0, 800.0), 0.0);
    }

    #[test]
    fn orb_interpolates_linearly() {
        let mid = orb().at(0.5);
        assert!((mid.center.x - 7.5).abs() < 1e-4);
        assert!((mid.center.y - 30.0).abs() < 1e-4);
        assert!((mid.opacity - 0.1).abs() < 1e-4);
        assert_eq!(orb().at(0.0).center, Point::new(10.0, -10.0));
    }

    #[test]
    fn scrolls_coalesce_until_frame() {
        let mut g = ScrollGradient::new(vec![orb()]);
        assert!(g.on_scroll(scroll(100.0)));
        assert!(!g.on_scroll(scroll(400.0)));
        assert!(!g.on_scroll(scroll(1000.0)));
        assert_eq!(g.progress(), 0.0);
        assert!(g.on_frame());
        assert_eq!(g.progress(), 0.5);
        assert!(!g.has_pending());
        assert!(!g.on_frame());
        assert!(g.on_scroll(scroll(2000.0)));
    }

    #[test]
    fn paint_maps_percentages_to_viewport() {
        let mut g = ScrollGradient::new(vec![orb()]);
        g.apply(scroll(0.0));
        let mut list = DisplayList::new();
        g.paint(Rect::from_size(1000.0, 1000.0), &mut list);
        let item = list.get("gradient.orb.0").map(|i| (i.bounds.center(), i.opacity, i.z_index));
        assert_eq!(item, Some((Point::new(100.0, -100.0), 0.13, -10)));
    }
}
