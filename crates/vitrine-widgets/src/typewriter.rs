#![forbid(unsafe_code)]

//! Typewriter text reveal.
//!
//! Types a phrase one grapheme cluster at a time, holds it, deletes it and
//! moves on to the next phrase. Time is fed in through
//! [`Typewriter::advance`]; a single call may apply many steps when the
//! elapsed time spans several intervals.
//!
//! # Phases
//!
//! ```text
//! Waiting ──initial_delay──▶ Typing ──phrase typed──▶ Holding ──hold──▶ Deleting
//!    ▲                          │                                         │
//!    │                          └─ single phrase, or last one without ───▶ Done
//!    │                             looping
//!    └──────────────────────────── phrase deleted ◀───────────────────────┘
//! ```

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;
use vitrine_core::geometry::{Rect, Size};

use crate::{Content, DisplayItem, DisplayList, StyleToken, Widget};

/// Current phase of the reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Pausing before the current phrase starts.
    Waiting,
    /// Adding one grapheme per `type_interval`.
    Typing,
    /// Showing the full phrase before deleting it.
    Holding,
    /// Removing one grapheme per `delete_interval`.
    Deleting,
    /// Finished; the text no longer changes.
    Done,
}

/// A run of visible text with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub style: StyleToken,
}

/// Typewriter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypewriterConfig {
    /// Time per typed grapheme (default: 50ms).
    pub type_interval: Duration,
    /// Time per deleted grapheme (default: 30ms).
    pub delete_interval: Duration,
    /// How long a completed phrase stays up (default: 2s).
    pub hold: Duration,
    /// Pause before each phrase starts typing (default: 0).
    pub initial_delay: Duration,
    /// Cycle back to the first phrase after the last (default: true).
    pub looping: bool,
    /// Draw a cursor after the text (default: true).
    pub show_cursor: bool,
    /// Hide the cursor while characters are being added or removed.
    pub hide_cursor_while_typing: bool,
    /// Cursor blink half-period (default: 400ms).
    pub cursor_blink: Duration,
    /// Substrings to highlight, first match wins.
    pub highlights: Vec<(String, StyleToken)>,
    /// Advance of one glyph when painting (default: 24x48).
    pub glyph: Size,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            type_interval: Duration::from_millis(50),
            delete_interval: Duration::from_millis(30),
            hold: Duration::from_millis(2000),
            initial_delay: Duration::ZERO,
            looping: true,
            show_cursor: true,
            hide_cursor_while_typing: false,
            cursor_blink: Duration::from_millis(400),
            highlights: Vec::new(),
            glyph: Size::new(24.0, 48.0),
        }
    }
}

const MIN_INTERVAL: Duration = Duration::from_millis(1);

impl TypewriterConfig {
    /// Set the typing interval, floored at 1ms.
    #[must_use]
    pub fn type_interval(mut self, interval: Duration) -> Self {
        self.type_interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Set the deleting interval, floored at 1ms.
    #[must_use]
    pub fn delete_interval(mut self, interval: Duration) -> Self {
        self.delete_interval = interval.max(MIN_INTERVAL);
        self
    }

    #[must_use]
    pub fn hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    #[must_use]
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    #[must_use]
    pub fn show_cursor(mut self, show: bool) -> Self {
        self.show_cursor = show;
        self
    }

    #[must_use]
    pub fn hide_cursor_while_typing(mut self, hide: bool) -> Self {
        self.hide_cursor_while_typing = hide;
        self
    }

    /// Highlight `pattern` with `style` wherever it appears in a phrase.
    #[must_use]
    pub fn highlight(mut self, pattern: impl Into<String>, style: StyleToken) -> Self {
        self.highlights.push((pattern.into(), style));
        self
    }
}

/// Grapheme-segmented phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Phrase {
    text: String,
    /// Byte offset where each grapheme starts, plus `text.len()`.
    bounds: Vec<usize>,
}

impl Phrase {
    fn new(text: String) -> Self {
        let mut bounds: Vec<usize> = text.grapheme_indices(true).map(|(i, _)| i).collect();
        bounds.push(text.len());
        Self { text, bounds }
    }

    fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    fn slice(&self, from: usize, to: usize) -> &str {
        &self.text[self.bounds[from]..self.bounds[to]]
    }

    /// Grapheme index of byte offset `byte`.
    fn grapheme_at(&self, byte: usize) -> usize {
        self.bounds.partition_point(|&b| b < byte)
    }
}

/// The typewriter engine.
#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<Phrase>,
    config: TypewriterConfig,
    current: usize,
    typed: usize,
    phase: Phase,
    pending: Duration,
    cursor_clock: Duration,
}

impl Typewriter {
    pub fn new<I, S>(phrases: I, config: TypewriterConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = TypewriterConfig {
            type_interval: config.type_interval.max(MIN_INTERVAL),
            delete_interval: config.delete_interval.max(MIN_INTERVAL),
            cursor_blink: config.cursor_blink.max(MIN_INTERVAL),
            ..config
        };
        let phrases: Vec<Phrase> = phrases
            .into_iter()
            .map(|p| Phrase::new(p.into()))
            .collect();
        // A list of empty phrases would cycle without ever consuming time.
        let phase = if phrases.iter().all(|p| p.len() == 0) {
            Phase::Done
        } else {
            Phase::Waiting
        };
        Self {
            phrases,
            config,
            current: 0,
            typed: 0,
            phase,
            pending: Duration::ZERO,
            cursor_clock: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the phrase being typed.
    pub fn phrase_index(&self) -> usize {
        self.current
    }

    /// Number of graphemes currently visible.
    pub fn typed_len(&self) -> usize {
        self.typed
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// The visible prefix of the current phrase.
    pub fn visible_text(&self) -> &str {
        match self.phrases.get(self.current) {
            Some(phrase) => phrase.slice(0, self.typed),
            None => "",
        }
    }

    /// Whether the cursor is drawn right now.
    pub fn cursor_visible(&self) -> bool {
        if !self.config.show_cursor {
            return false;
        }
        if self.config.hide_cursor_while_typing
            && matches!(self.phase, Phase::Typing | Phase::Deleting)
        {
            return false;
        }
        let half = self.config.cursor_blink.as_nanos().max(1);
        (self.cursor_clock.as_nanos() / half) % 2 == 0
    }

    /// Consume `dt` of elapsed time. Returns whether the visible text changed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.cursor_clock = self.cursor_clock.saturating_add(dt);
        if self.phase == Phase::Done {
            return false;
        }
        let mut budget = self.pending.saturating_add(dt);
        let mut changed = false;

        loop {
            let len = self.current_len();
            let need = match self.phase {
                Phase::Done => break,
                Phase::Typing if self.typed >= len => {
                    self.finish_phrase();
                    continue;
                }
                Phase::Deleting if self.typed == 0 => {
                    self.next_phrase();
                    continue;
                }
                Phase::Waiting => self.config.initial_delay,
                Phase::Typing => self.config.type_interval,
                Phase::Holding => self.config.hold,
                Phase::Deleting => self.config.delete_interval,
            };
            if budget < need {
                break;
            }
            budget -= need;
            match self.phase {
                Phase::Waiting => self.phase = Phase::Typing,
                Phase::Typing => {
                    self.typed += 1;
                    changed = true;
                }
                Phase::Holding => self.phase = Phase::Deleting,
                Phase::Deleting => {
                    self.typed -= 1;
                    changed = true;
                }
                Phase::Done => break,
            }
        }

        self.pending = if self.phase == Phase::Done {
            Duration::ZERO
        } else {
            budget
        };
        changed
    }

    fn current_len(&self) -> usize {
        self.phrases.get(self.current).map_or(0, Phrase::len)
    }

    fn finish_phrase(&mut self) {
        self.phase = if self.phrases.len() <= 1 {
            Phase::Done
        } else {
            Phase::Holding
        };
        vitrine_core::trace!(phrase = self.current, phase = ?self.phase, "typewriter phrase typed");
    }

    /// Called once the current phrase is fully deleted. Without looping the
    /// last phrase is held and deleted like the others, then the line stays
    /// empty.
    fn next_phrase(&mut self) {
        let last = self.current + 1 == self.phrases.len();
        if last && !self.config.looping {
            self.phase = Phase::Done;
            return;
        }
        self.current = (self.current + 1) % self.phrases.len().max(1);
        self.phase = Phase::Waiting;
    }

    /// Visible text split into plain and highlighted runs.
    ///
    /// Only the first highlight pattern found in the full phrase applies,
    /// and the highlighted run covers only what has been typed so far.
    pub fn spans(&self) -> Vec<TextSpan> {
        let Some(phrase) = self.phrases.get(self.current) else {
            return Vec::new();
        };
        let plain = |from: usize, to: usize| TextSpan {
            text: phrase.slice(from, to).to_owned(),
            style: StyleToken::Plain,
        };
        let typed = self.typed;
        let mut spans = Vec::with_capacity(3);

        let found = self.config.highlights.iter().find_map(|(pattern, style)| {
            if pattern.is_empty() {
                return None;
            }
            phrase.text.find(pattern.as_str()).map(|byte| {
                let start = phrase.grapheme_at(byte);
                let end = phrase.grapheme_at(byte + pattern.len());
                (start, end, *style)
            })
        });

        match found {
            Some((start, end, style)) if typed > start => {
                let hl_end = typed.min(end);
                if start > 0 {
                    spans.push(plain(0, start));
                }
                spans.push(TextSpan {
                    text: phrase.slice(start, hl_end).to_owned(),
                    style,
                });
                if typed > hl_end {
                    spans.push(plain(hl_end, typed));
                }
            }
            _ if typed > 0 => spans.push(plain(0, typed)),
            _ => {}
        }
        spans
    }
}

impl Widget for Typewriter {
    fn paint(&self, area: Rect, list: &mut DisplayList) {
        if area.is_empty() {
            return;
        }
        let glyph = self.config.glyph;
        let mut x = area.x;
        for (i, span) in self.spans().into_iter().enumerate() {
            let width = span.text.graphemes(true).count() as f32 * glyph.width;
            list.push(DisplayItem::new(
                format!("typewriter.span.{i}"),
                Rect::new(x, area.y, width, glyph.height),
                Content::Text {
                    text: span.text,
                    style: span.style,
                },
            ));
            x += width;
        }
        if self.config.show_cursor {
            list.push(DisplayItem::new(
                "typewriter.cursor",
                Rect::new(x + 4.0, area.y, glyph.width / 4.0, glyph.height),
                Content::Cursor {
                    visible: self.cursor_visible(),
                },
            ));
        }
    }

    fn is_decorative(&self) -> bool {
        false
    }
}
