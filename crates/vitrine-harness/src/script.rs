#![forbid(unsafe_code)]

//! Scripted interaction over the whole page.
//!
//! The script replays what a visitor typically does: wait for the hero
//! tagline, scroll down to the tech stack, open a node, swipe the project
//! carousel, close the node, then scroll back to the top. Each step writes
//! one JSON line to the trace sink.

use std::io::Write;

use serde::Serialize;
use tracing::{debug, info};

use vitrine::page::PageLayout;
use vitrine::{
    HeadlessHost, NodeId, Point, PointerEvent, Portfolio, Result, ScrollEvent, Section, Stage,
    StageConfig, StepReport,
};

use crate::config::HarnessConfig;

/// Scripted input, keyed by the step index it fires before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ScrollTo(#[serde(serialize_with = "anchor")] Section),
    /// Click the orbital node with this item id.
    OpenNode(#[serde(serialize_with = "node_id")] NodeId),
    SwipeProjects,
    CloseNode,
}

fn anchor<S: serde::Serializer>(
    section: &Section,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(section.anchor())
}

fn node_id<S: serde::Serializer>(
    id: &NodeId,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u32(id.0)
}

/// Default script, spread proportionally over `frames` steps.
///
/// Short runs put several actions on the same step; they fire in order.
pub fn script(frames: u32) -> Vec<(u64, Action)> {
    let at = |fraction: f64| ((f64::from(frames) * fraction) as u64).max(1);
    vec![
        (at(0.15), Action::ScrollTo(Section::About)),
        (at(0.30), Action::ScrollTo(Section::TechStack)),
        (at(0.40), Action::OpenNode(NodeId(2))),
        (at(0.55), Action::SwipeProjects),
        (at(0.70), Action::CloseNode),
        (at(0.85), Action::ScrollTo(Section::Home)),
    ]
}

/// One line of the frame trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub frame_idx: u64,
    pub now_ms: u64,
    pub frames: usize,
    pub timers: usize,
    pub dirty: bool,
    /// Display items painted after the step.
    pub items: usize,
    /// Actions performed before the step, in script order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

impl TraceRecord {
    fn new(report: StepReport, items: usize, actions: Vec<Action>) -> Self {
        Self {
            frame_idx: report.frame_idx,
            now_ms: u64::try_from(report.now.as_millis()).unwrap_or(u64::MAX),
            frames: report.frames,
            timers: report.timers,
            dirty: report.dirty,
            items,
            actions,
        }
    }
}

/// Totals of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub steps: u64,
    pub frames: usize,
    pub timers: usize,
    pub actions: usize,
}

/// Mount the page, run the script, and write the trace to `out`.
pub fn run(config: &HarnessConfig, out: &mut impl Write) -> Result<Summary> {
    let mut stage = Stage::new(HeadlessHost::new(config.viewport), StageConfig::default());
    let page = Portfolio::mount(&mut stage);
    let layout = PageLayout::new(config.viewport);
    page.place(&mut stage, &layout)?;
    info!(
        frames = config.frames,
        frame_ms = config.frame.as_millis() as u64,
        width = config.viewport.width,
        height = config.viewport.height,
        "harness run starting"
    );

    let script = script(config.frames);
    let mut summary = Summary::default();
    for step in 1..=u64::from(config.frames) {
        let actions: Vec<Action> = script
            .iter()
            .filter(|&&(at, _)| at == step)
            .map(|&(_, action)| action)
            .collect();
        for &action in &actions {
            perform(&mut stage, &page, &layout, action);
        }
        summary.actions += actions.len();

        let report = stage.step(config.frame);
        let items = stage.paint().len();
        summary.steps += 1;
        summary.frames += report.frames;
        summary.timers += report.timers;

        let record = TraceRecord::new(report, items, actions);
        serde_json::to_writer(&mut *out, &record).map_err(std::io::Error::from)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    page.unmount(&mut stage)?;
    info!(
        steps = summary.steps,
        frames = summary.frames,
        timers = summary.timers,
        actions = summary.actions,
        "harness run complete"
    );
    Ok(summary)
}

fn perform(stage: &mut Stage<HeadlessHost>, page: &Portfolio, layout: &PageLayout, action: Action) {
    debug!(?action, "script action");
    match action {
        Action::ScrollTo(section) => {
            // Smooth scrolling delivers a burst of events; the last one wins.
            let target = layout.scroll_to(section);
            for fraction in [0.25, 0.5, 0.75, 1.0] {
                stage.scroll(ScrollEvent {
                    scroll_y: target * fraction,
                    document_height: layout.document_height(),
                    viewport_height: layout.viewport.height,
                });
            }
        }
        Action::OpenNode(id) => {
            let key = format!("orbital.node.{id}");
            if let Some(center) = stage.paint().get(&key).map(|item| item.bounds.center()) {
                click(stage, center);
            }
        }
        Action::SwipeProjects => {
            if let Some(area) = stage.bounds(page.projects) {
                let y = area.y + area.height / 2.0;
                let x = area.x + area.width / 2.0;
                stage.pointer(PointerEvent::down(x + 100.0, y));
                stage.pointer(PointerEvent::moved(x, y));
                stage.pointer(PointerEvent::up(x - 100.0, y));
            }
        }
        Action::CloseNode => {
            if let Some(area) = stage.bounds(page.orbital) {
                click(stage, Point::new(area.x + 4.0, area.y + 4.0));
            }
        }
    }
}

fn click(stage: &mut Stage<HeadlessHost>, at: Point) {
    stage.pointer(PointerEvent::up(at.x, at.y));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_fits_inside_the_run() {
        for frames in [1, 10, 240] {
            let script = script(frames);
            assert!(script.iter().all(|&(at, _)| at >= 1 && at <= u64::from(frames)));
        }
    }

    #[test]
    fn record_serializes_flat() {
        let report = StepReport {
            frame_idx: 3,
            now: std::time::Duration::from_millis(48),
            frames: 2,
            timers: 1,
            dirty: true,
        };
        let line = serde_json::to_string(&TraceRecord::new(report, 40, Vec::new())).unwrap();
        assert_eq!(
            line,
            r#"{"frame_idx":3,"now_ms":48,"frames":2,"timers":1,"dirty":true,"items":40}"#
        );

        let actions = vec![Action::ScrollTo(Section::TechStack), Action::OpenNode(NodeId(2))];
        let line = serde_json::to_string(&TraceRecord::new(report, 40, actions)).unwrap();
        assert!(
            line.ends_with(r##""actions":[{"scroll_to":"#tech-stack"},{"open_node":2}]}"##),
            "{line}"
        );
    }

    #[test]
    fn short_runs_share_steps() {
        let steps: Vec<u64> = script(5).iter().map(|&(at, _)| at).collect();
        assert_eq!(steps, [1, 1, 2, 2, 3, 4]);
    }
}
