#![forbid(unsafe_code)]

//! Tracing instrumentation tests.
//!
//! Widget spans enabled:
//!   cargo test -p vitrine-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p vitrine-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vitrine_core::geometry::Rect;
use vitrine_widgets::marquee::{Marquee, MarqueeConfig, MarqueeItem};
use vitrine_widgets::orbital::{NodeId, OrbitalConfig, OrbitalTimeline, TimelineItem};
use vitrine_widgets::{DisplayList, Widget};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its metadata.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records every new span.
struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<String>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<String>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let message = visitor
            .0
            .into_iter()
            .find(|(k, _)| k == "message")
            .map(|(_, v)| v)
            .unwrap_or_default();
        self.events.lock().unwrap().push(message);
    }
}

fn with_captured<F: FnOnce()>(f: F) -> CaptureHandle {
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCapture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn sample_marquee() -> Marquee {
    let items = vec![MarqueeItem::new("/icons/java.svg"); 4];
    Marquee::new(items, MarqueeConfig::default())
}

fn sample_ring() -> OrbitalTimeline {
    let items = (1..=4)
        .map(|id| TimelineItem::new(id, format!("Node {id}")).related([id % 4 + 1]))
        .collect();
    OrbitalTimeline::new(items, OrbitalConfig::default())
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn paint_spans_are_emitted() {
    let handle = with_captured(|| {
        let mut list = DisplayList::new();
        sample_marquee().paint(Rect::from_size(800.0, 120.0), &mut list);
        sample_ring().paint(Rect::from_size(600.0, 600.0), &mut list);
    });
    let spans = handle.spans();
    let names: Vec<&str> = spans.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"marquee.paint"), "spans: {names:?}");
    assert!(names.contains(&"orbital.paint"), "spans: {names:?}");
    let orbital = spans.iter().find(|s| s.name == "orbital.paint").unwrap();
    assert_eq!(orbital.fields.get("nodes").map(String::as_str), Some("4"));
}

#[test]
#[cfg(feature = "tracing")]
fn transitions_are_logged() {
    let handle = with_captured(|| {
        let mut ring = sample_ring();
        ring.click_node(NodeId(2));
        ring.click_background();
    });
    let events = handle.events();
    assert!(events.iter().any(|e| e.contains("orbital transition")), "{events:?}");
    assert!(events.iter().any(|e| e.contains("collapsed from background")), "{events:?}");
}

/// Without the feature the widgets must not reach the subscriber at all.
#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_without_feature() {
    let handle = with_captured(|| {
        let mut list = DisplayList::new();
        let mut ring = sample_ring();
        ring.click_node(NodeId(1));
        ring.paint(Rect::from_size(600.0, 600.0), &mut list);
        sample_marquee().paint(Rect::from_size(800.0, 120.0), &mut list);
        assert!(!list.is_empty());
    });
    assert!(handle.spans().is_empty());
    assert!(handle.events().is_empty());
}
