#![forbid(unsafe_code)]

//! Page composition: sections, layout, and mounting every widget.

use std::fmt;
use std::time::Duration;

use vitrine_core::geometry::{Rect, Size};
use vitrine_runtime::{
    CarouselMount, HeadlessHost, Host, MarqueeMount, OrbitalMount, ScrollGradientMount, Stage,
    TypewriterMount, WidgetId,
};
use vitrine_widgets::carousel::{Bounds, Carousel, CarouselConfig};
use vitrine_widgets::marquee::{Marquee, MarqueeConfig};
use vitrine_widgets::orbital::{OrbitalConfig, OrbitalTimeline};
use vitrine_widgets::scroll_gradient::ScrollGradient;
use vitrine_widgets::typewriter::{Typewriter, TypewriterConfig};
use vitrine_widgets::StyleToken;

use crate::content;
use crate::Result;

/// A single-page anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Home,
    About,
    Projects,
    Experience,
    TechStack,
    Contact,
}

impl Section {
    /// Top-to-bottom page order.
    pub const ALL: [Self; 6] = [
        Self::Home,
        Self::About,
        Self::Projects,
        Self::Experience,
        Self::TechStack,
        Self::Contact,
    ];

    pub const fn anchor(self) -> &'static str {
        match self {
            Self::Home => "#",
            Self::About => "#about",
            Self::Projects => "#projects",
            Self::Experience => "#experience",
            Self::TechStack => "#tech-stack",
            Self::Contact => "#contact",
        }
    }

    /// Section for an anchor, with or without the leading `#`.
    pub fn from_anchor(anchor: &str) -> Option<Self> {
        let id = anchor.strip_prefix('#').unwrap_or(anchor);
        Self::ALL
            .into_iter()
            .find(|s| s.anchor().trim_start_matches('#') == id)
    }

    /// Section height for a viewport of height `viewport`.
    fn height(self, viewport: f32) -> f32 {
        match self {
            Self::Home => viewport,
            Self::About => 520.0,
            Self::Projects => 720.0,
            Self::Experience => 640.0,
            Self::TechStack => (viewport * 0.7).max(600.0) + 200.0,
            Self::Contact => 480.0,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.anchor())
    }
}

/// Page geometry for one viewport size.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub viewport: Size,
    /// Section bands, top to bottom.
    pub sections: Vec<(Section, Rect)>,
}

impl PageLayout {
    pub fn new(viewport: Size) -> Self {
        let mut y = 0.0;
        let sections = Section::ALL
            .into_iter()
            .map(|section| {
                let h = section.height(viewport.height);
                let band = Rect::new(0.0, y, viewport.width, h);
                y += h;
                (section, band)
            })
            .collect();
        Self { viewport, sections }
    }

    pub fn section(&self, section: Section) -> Rect {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|&(_, r)| r)
            .unwrap_or_default()
    }

    /// Total document height.
    pub fn document_height(&self) -> f32 {
        self.sections.last().map_or(0.0, |(_, r)| r.bottom())
    }

    /// Scroll offset that brings `section` to the top, clamped to the
    /// scrollable range.
    pub fn scroll_to(&self, section: Section) -> f32 {
        let max = (self.document_height() - self.viewport.height).max(0.0);
        self.section(section).y.clamp(0.0, max)
    }

    /// Section containing the page position `y`.
    pub fn section_at(&self, y: f32) -> Option<Section> {
        self.sections
            .iter()
            .find(|(_, r)| y >= r.y && y < r.bottom())
            .map(|&(s, _)| s)
    }
}

/// Widgets mounted by [`Portfolio::mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portfolio {
    pub hero: WidgetId,
    pub marquee: WidgetId,
    pub orbital: WidgetId,
    pub projects: WidgetId,
    pub experience: WidgetId,
    pub gradient: WidgetId,
}

impl Portfolio {
    /// Mount every widget of the page, background first.
    pub fn mount<H: Host>(stage: &mut Stage<H>) -> Self {
        let gradient = stage.mount(ScrollGradientMount::new(ScrollGradient::new(
            content::gradient_orbs(),
        )));
        let hero = stage.mount(TypewriterMount::new(Typewriter::new(
            [content::TAGLINE],
            TypewriterConfig::default()
                .looping(false)
                .initial_delay(Duration::from_millis(2_550))
                .highlight(content::TAGLINE_MUTED, StyleToken::Muted),
        )));
        let marquee = stage.mount(MarqueeMount::new(Marquee::new(
            content::tech_logos(),
            MarqueeConfig::default(),
        )));
        let projects = stage.mount(CarouselMount::new(Carousel::new(
            content::project_cards(),
            CarouselConfig::default().bounds(Bounds::Wrap),
        )));
        let experience = stage.mount(CarouselMount::new(Carousel::new(
            content::experience_cards(),
            CarouselConfig::default()
                .bounds(Bounds::Clamp)
                .start_index(content::EXPERIENCE.len() - 1),
        )));
        let orbital = stage.mount(OrbitalMount::new(OrbitalTimeline::new(
            content::tech_timeline(),
            OrbitalConfig::default(),
        )));
        tracing::debug!(widgets = 6, "portfolio mounted");
        Self {
            hero,
            marquee,
            orbital,
            projects,
            experience,
            gradient,
        }
    }

    /// Every widget id, in mount order.
    pub fn ids(&self) -> [WidgetId; 6] {
        [
            self.gradient,
            self.hero,
            self.marquee,
            self.projects,
            self.experience,
            self.orbital,
        ]
    }

    /// Section a widget belongs to. The gradient spans the whole page.
    pub fn section_of(&self, id: WidgetId) -> Option<Section> {
        [
            (self.hero, Section::Home),
            (self.marquee, Section::About),
            (self.projects, Section::Projects),
            (self.experience, Section::Experience),
            (self.orbital, Section::TechStack),
        ]
        .into_iter()
        .find(|&(w, _)| w == id)
        .map(|(_, section)| section)
    }

    /// Widget bounds in page coordinates for `layout`.
    pub fn bounds(&self, layout: &PageLayout) -> Vec<(WidgetId, Rect)> {
        let w = layout.viewport.width;
        let inset = |band: Rect, top: f32, height: f32| {
            Rect::new(band.x, band.y + top, band.width, height.min(band.height - top))
        };
        let home = layout.section(Section::Home);
        let about = layout.section(Section::About);
        let projects = layout.section(Section::Projects);
        let experience = layout.section(Section::Experience);
        let tech = layout.section(Section::TechStack);
        vec![
            (self.gradient, Rect::from_size(w, layout.viewport.height)),
            (self.hero, inset(home, home.height * 0.45, 96.0)),
            (self.marquee, inset(about, about.height - 160.0, 96.0)),
            (self.projects, inset(projects, 160.0, 520.0)),
            (self.experience, inset(experience, 160.0, 440.0)),
            (self.orbital, inset(tech, 160.0, tech.height - 160.0)),
        ]
    }

    /// Tear every widget down. A failure does not stop the rest; the first
    /// one is returned.
    pub fn unmount<H: Host>(self, stage: &mut Stage<H>) -> Result<()> {
        let mut first = None;
        for id in self.ids() {
            if let Err(err) = stage.unmount(id) {
                tracing::warn!(widget = %id, error = %err, "unmount failed");
                first.get_or_insert(err);
            }
        }
        tracing::debug!("portfolio unmounted");
        match first {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Lay the page out on a headless host and deliver the resizes.
    pub fn place(&self, stage: &mut Stage<HeadlessHost>, layout: &PageLayout) -> Result<()> {
        stage.host_mut().set_viewport(layout.viewport);
        for (id, bounds) in self.bounds(layout) {
            stage.place(id, bounds)?;
        }
        Ok(())
    }
}
