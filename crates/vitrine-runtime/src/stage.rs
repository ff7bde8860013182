#![forbid(unsafe_code)]

//! The stage: mounted components, their time sources, and input routing.
//!
//! The stage owns the host and a [`Scheduler`]. Every callback into a
//! component (event, frame, timer) is followed by a reconcile of that
//! component's declared [`Sub`]scriptions:
//!
//! - `Sub::Frames` keeps exactly one frame request outstanding. The request
//!   is one-shot; after each frame the reconcile re-requests it if the
//!   component still wants frames.
//! - `Sub::Every` is keyed by `(id, interval)`. A changed interval stops the
//!   old timer and starts a new one.
//!
//! Unmounting cancels the pending frame, every timer and every pointer
//! capture the component holds, so nothing reaches a disposed component.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use vitrine_core::clock::{Clock, SystemClock};
use vitrine_core::event::{Event, PointerEvent, PointerId, ScrollEvent};
use vitrine_core::geometry::{Point, Rect, Size};
use vitrine_widgets::DisplayList;

use crate::component::{Component, Reaction, Sub, SubId};
use crate::host::{FrameToken, HeadlessHost, Host, HostError, WidgetId};
use crate::scheduler::{Scheduler, TaskHandle};

/// Stage configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageConfig {
    /// Paint passes slower than this are logged at `warn`.
    pub frame_budget: Duration,
    /// Skip decorative components when painting.
    pub reduced_motion: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            frame_budget: Duration::from_millis(16),
            reduced_motion: false,
        }
    }
}

impl StageConfig {
    #[must_use]
    pub fn frame_budget(mut self, budget: Duration) -> Self {
        self.frame_budget = budget;
        self
    }

    #[must_use]
    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }
}

/// Stage operation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// No component is mounted under this id.
    UnknownWidget(WidgetId),
    /// The host refused an operation.
    Host(HostError),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWidget(id) => write!(f, "no component mounted as {id}"),
            Self::Host(err) => write!(f, "host error: {err}"),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(err) => Some(err),
            Self::UnknownWidget(_) => None,
        }
    }
}

impl From<HostError> for StageError {
    fn from(err: HostError) -> Self {
        Self::Host(err)
    }
}

/// Scheduler payload: which component's which subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerKey {
    widget: WidgetId,
    sub: SubId,
}

struct RunningTimer {
    interval: Duration,
    handle: TaskHandle,
}

struct Mounted {
    component: Box<dyn Component>,
    bounds: Rect,
    frame: Option<FrameToken>,
    timers: HashMap<SubId, RunningTimer>,
    captures: Vec<PointerId>,
    dirty: bool,
}

/// Outcome of one [`Stage::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Index of this step, starting at 1.
    pub frame_idx: u64,
    /// Host time after the step.
    pub now: Duration,
    /// Frame callbacks delivered.
    pub frames: usize,
    /// Timer callbacks delivered.
    pub timers: usize,
    /// Whether any component needs a repaint.
    pub dirty: bool,
}

/// Mounted components on top of a [`Host`].
pub struct Stage<H: Host> {
    host: H,
    config: StageConfig,
    widgets: BTreeMap<WidgetId, Mounted>,
    scheduler: Scheduler<TimerKey>,
    next_id: u32,
    frame_idx: u64,
    paint_clock: SystemClock,
}

impl<H: Host> Stage<H> {
    pub fn new(host: H, config: StageConfig) -> Self {
        Self {
            host,
            config,
            widgets: BTreeMap::new(),
            scheduler: Scheduler::new(),
            next_id: 0,
            frame_idx: 0,
            paint_clock: SystemClock::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Number of mounted components.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn is_mounted(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(&id)
    }

    /// Last measured bounds of `id`.
    pub fn bounds(&self, id: WidgetId) -> Option<Rect> {
        self.widgets.get(&id).map(|m| m.bounds)
    }

    /// Whether `id` has a frame request outstanding.
    pub fn has_frame_request(&self, id: WidgetId) -> bool {
        self.widgets.get(&id).is_some_and(|m| m.frame.is_some())
    }

    /// Running interval subscriptions of `id`, sorted by subscription id.
    pub fn active_timers(&self, id: WidgetId) -> Vec<(SubId, Duration)> {
        let mut timers: Vec<(SubId, Duration)> = self
            .widgets
            .get(&id)
            .map(|m| m.timers.iter().map(|(&s, t)| (s, t.interval)).collect())
            .unwrap_or_default();
        timers.sort_unstable();
        timers
    }

    /// Pointers currently captured by `id`.
    pub fn captures(&self, id: WidgetId) -> &[PointerId] {
        self.widgets
            .get(&id)
            .map(|m| m.captures.as_slice())
            .unwrap_or(&[])
    }

    /// Whether any component changed since the last paint.
    pub fn needs_paint(&self) -> bool {
        self.widgets.values().any(|m| m.dirty)
    }

    /// Mount a component and start its subscriptions.
    ///
    /// A component mounted before the host has laid it out starts with empty
    /// bounds; [`resize`](Self::resize) delivers the real size later.
    pub fn mount(&mut self, component: impl Component + 'static) -> WidgetId {
        self.next_id += 1;
        let id = WidgetId(self.next_id);
        let bounds = match self.host.measure(id) {
            Ok(bounds) => bounds,
            Err(err) => {
                tracing::debug!(widget = %id, error = %err, "mounted before layout");
                Rect::default()
            }
        };
        let mut component: Box<dyn Component> = Box::new(component);
        component.on_mount(bounds, self.host.now());
        tracing::debug!(widget = %id, name = component.name(), "mount");
        self.widgets.insert(
            id,
            Mounted {
                component,
                bounds,
                frame: None,
                timers: HashMap::new(),
                captures: Vec::new(),
                dirty: true,
            },
        );
        self.reconcile(id);
        id
    }

    /// Tear down `id`: cancel its frame request and timers, release its
    /// pointer captures and detach it from the host.
    pub fn unmount(&mut self, id: WidgetId) -> Result<(), StageError> {
        let mounted = self
            .widgets
            .remove(&id)
            .ok_or(StageError::UnknownWidget(id))?;
        if let Some(token) = mounted.frame {
            self.host.cancel_frame(token);
        }
        for timer in mounted.timers.values() {
            timer.handle.cancel();
        }
        for &pointer in &mounted.captures {
            if let Err(err) = self.host.release_pointer(id, pointer) {
                tracing::warn!(widget = %id, error = %err, "release on unmount failed");
            }
        }
        self.host.detach(id);
        tracing::debug!(
            widget = %id,
            name = mounted.component.name(),
            timers = mounted.timers.len(),
            captures = mounted.captures.len(),
            "unmount"
        );
        Ok(())
    }

    /// Deliver `event` to `id` as is. Returns whether state changed.
    pub fn dispatch(&mut self, id: WidgetId, event: Event) -> Result<bool, StageError> {
        let mounted = self
            .widgets
            .get_mut(&id)
            .ok_or(StageError::UnknownWidget(id))?;
        let reaction = mounted.component.on_event(&event, mounted.bounds);
        self.apply(id, reaction);
        self.reconcile(id);
        Ok(reaction.dirty)
    }

    /// Route a pointer event given in page coordinates.
    ///
    /// A captured pointer goes to its owner; otherwise the topmost component
    /// whose bounds contain the position receives it. Returns the target.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<WidgetId> {
        let target = self.capture_owner(event.pointer).or_else(|| {
            self.widgets
                .iter()
                .rev()
                .find(|(_, m)| m.bounds.contains(event.position))
                .map(|(&id, _)| id)
        })?;
        let bounds = self.widgets.get(&target)?.bounds;
        let mut local = event;
        local.position = Point::new(event.position.x - bounds.x, event.position.y - bounds.y);
        match self.dispatch(target, Event::Pointer(local)) {
            Ok(_) => Some(target),
            Err(_) => None,
        }
    }

    /// Broadcast a document scroll to every component.
    pub fn scroll(&mut self, event: ScrollEvent) {
        let ids: Vec<WidgetId> = self.widgets.keys().copied().collect();
        for id in ids {
            let _ = self.dispatch(id, Event::Scroll(event));
        }
    }

    /// Re-measure `id` and forward its new size.
    pub fn resize(&mut self, id: WidgetId) -> Result<(), StageError> {
        let bounds = self.host.measure(id)?;
        let mounted = self
            .widgets
            .get_mut(&id)
            .ok_or(StageError::UnknownWidget(id))?;
        mounted.bounds = bounds;
        tracing::debug!(widget = %id, width = bounds.width, height = bounds.height, "resize");
        self.dispatch(id, Event::Resize(Size::new(bounds.width, bounds.height)))?;
        Ok(())
    }

    /// Host frame callback for the request `token` made on behalf of `id`.
    ///
    /// Stale tokens are ignored. Returns whether state changed.
    pub fn frame(&mut self, id: WidgetId, token: FrameToken) -> Result<bool, StageError> {
        let now = self.host.now();
        let mounted = self
            .widgets
            .get_mut(&id)
            .ok_or(StageError::UnknownWidget(id))?;
        if mounted.frame != Some(token) {
            tracing::trace!(widget = %id, token = token.0, "stale frame token");
            return Ok(false);
        }
        mounted.frame = None;
        let changed = mounted.component.on_frame(now);
        mounted.dirty |= changed;
        self.reconcile(id);
        Ok(changed)
    }

    /// Fire every due timer. Returns how many callbacks were delivered.
    pub fn poll_timers(&mut self) -> usize {
        let now = self.host.now();
        let mut delivered = 0;
        for (task, key) in self.scheduler.poll(now) {
            let Some(mounted) = self.widgets.get_mut(&key.widget) else {
                continue;
            };
            let live = mounted
                .timers
                .get(&key.sub)
                .is_some_and(|t| t.handle.id() == task);
            if !live {
                continue;
            }
            mounted.dirty |= mounted.component.on_timer(key.sub, now);
            delivered += 1;
            self.reconcile(key.widget);
        }
        delivered
    }

    /// Paint every component in mount order.
    pub fn paint(&mut self) -> DisplayList {
        let start = self.paint_clock.now_mono();
        let mut list = DisplayList::new();
        for mounted in self.widgets.values_mut() {
            mounted.dirty = false;
            if self.config.reduced_motion && mounted.component.is_decorative() {
                continue;
            }
            mounted.component.paint(mounted.bounds, &mut list);
        }
        let elapsed = self.paint_clock.now_mono().saturating_sub(start);
        if elapsed > self.config.frame_budget {
            tracing::warn!(
                elapsed_us = elapsed.as_micros() as u64,
                budget_us = self.config.frame_budget.as_micros() as u64,
                items = list.len(),
                "paint over frame budget"
            );
        }
        list
    }

    fn capture_owner(&self, pointer: PointerId) -> Option<WidgetId> {
        self.widgets
            .iter()
            .find(|(_, m)| m.captures.contains(&pointer))
            .map(|(&id, _)| id)
    }

    fn apply(&mut self, id: WidgetId, reaction: Reaction) {
        let Some(mounted) = self.widgets.get_mut(&id) else {
            return;
        };
        mounted.dirty |= reaction.dirty;
        if let Some(pointer) = reaction.capture {
            match self.host.capture_pointer(id, pointer) {
                Ok(()) => {
                    if !mounted.captures.contains(&pointer) {
                        mounted.captures.push(pointer);
                    }
                }
                Err(err) => tracing::warn!(widget = %id, error = %err, "pointer capture failed"),
            }
        }
        if let Some(pointer) = reaction.release {
            mounted.captures.retain(|&p| p != pointer);
            if let Err(err) = self.host.release_pointer(id, pointer) {
                tracing::warn!(widget = %id, error = %err, "pointer release failed");
            }
        }
    }

    fn reconcile(&mut self, id: WidgetId) {
        let Some(mounted) = self.widgets.get_mut(&id) else {
            return;
        };
        let declared = mounted.component.subscriptions();
        let wants_frames = declared.contains(&Sub::Frames);
        let wanted: HashMap<SubId, Duration> = declared
            .iter()
            .filter_map(|sub| match *sub {
                Sub::Every { id, interval } => Some((id, interval)),
                Sub::Frames => None,
            })
            .collect();
        let active_before = mounted.timers.len();

        tracing::trace!(
            widget = %id,
            declared = declared.len(),
            active_before,
            frames = wants_frames,
            "subscription reconcile starting"
        );

        let mut stopped = 0usize;
        mounted.timers.retain(|sub, timer| {
            if wanted.get(sub) == Some(&timer.interval) {
                return true;
            }
            tracing::debug!(widget = %id, sub_id = *sub, "stopping timer");
            timer.handle.cancel();
            stopped += 1;
            false
        });

        let now = self.host.now();
        let mut started = 0usize;
        for (sub, interval) in wanted {
            if mounted.timers.contains_key(&sub) {
                continue;
            }
            tracing::debug!(
                widget = %id,
                sub_id = sub,
                interval_ms = interval.as_millis() as u64,
                "starting timer"
            );
            let handle = self
                .scheduler
                .every(now, interval, TimerKey { widget: id, sub });
            mounted.timers.insert(sub, RunningTimer { interval, handle });
            started += 1;
        }

        match (wants_frames, mounted.frame) {
            (true, None) => mounted.frame = Some(self.host.request_frame(id)),
            (false, Some(token)) => {
                self.host.cancel_frame(token);
                mounted.frame = None;
            }
            _ => {}
        }

        tracing::trace!(
            widget = %id,
            active_before,
            active_after = mounted.timers.len(),
            started,
            stopped,
            "subscription reconcile complete"
        );
    }
}

impl Stage<HeadlessHost> {
    /// Lay out `id` on the headless host and deliver the resize.
    pub fn place(&mut self, id: WidgetId, bounds: Rect) -> Result<(), StageError> {
        self.host.place(id, bounds);
        self.resize(id)
    }

    /// Advance the virtual clock by `dt`, fire due timers, then deliver the
    /// frame requests that were outstanding.
    pub fn step(&mut self, dt: Duration) -> StepReport {
        self.host.advance(dt);
        self.frame_idx += 1;
        let timers = self.poll_timers();
        let mut frames = 0;
        for (token, id) in self.host.take_frames() {
            if self.frame(id, token).is_ok() {
                frames += 1;
            }
        }
        StepReport {
            frame_idx: self.frame_idx,
            now: self.host.now(),
            frames,
            timers,
            dirty: self.needs_paint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vitrine_core::event::PointerEventKind;
    use vitrine_widgets::{Content, DisplayItem, PointerOutcome};

    #[derive(Default)]
    struct Log {
        frames: u32,
        timers: Vec<SubId>,
        events: Vec<Event>,
    }

    /// Wants frames while `animating`, and a timer while `ticking`.
    struct Recorder {
        log: Rc<RefCell<Log>>,
        animating: bool,
        ticking: Option<Duration>,
    }

    impl Recorder {
        fn new(log: &Rc<RefCell<Log>>) -> Self {
            Self {
                log: Rc::clone(log),
                animating: true,
                ticking: Some(Duration::from_millis(50)),
            }
        }
    }

    impl Component for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn on_event(&mut self, event: &Event, _bounds: Rect) -> Reaction {
            self.log.borrow_mut().events.push(*event);
            match event {
                Event::Pointer(p) => {
                    let outcome = match p.kind {
                        PointerEventKind::Down(_) => {
                            self.animating = false;
                            PointerOutcome::Capture
                        }
                        PointerEventKind::Up(_) => {
                            self.animating = true;
                            PointerOutcome::Release
                        }
                        _ => PointerOutcome::Handled,
                    };
                    Reaction::from_outcome(outcome, p.pointer)
                }
                Event::Resize(size) => {
                    self.ticking = (!size.is_empty()).then(|| Duration::from_millis(20));
                    Reaction::dirty()
                }
                _ => Reaction::none(),
            }
        }

        fn on_frame(&mut self, _now: Duration) -> bool {
            self.log.borrow_mut().frames += 1;
            true
        }

        fn on_timer(&mut self, id: SubId, _now: Duration) -> bool {
            self.log.borrow_mut().timers.push(id);
            true
        }

        fn subscriptions(&self) -> Vec<Sub> {
            let mut subs = Vec::new();
            if self.animating {
                subs.push(Sub::Frames);
            }
            if let Some(interval) = self.ticking {
                subs.push(Sub::Every { id: 1, interval });
            }
            subs
        }

        fn paint(&self, area: Rect, list: &mut DisplayList) {
            list.push(DisplayItem::new("recorder", area, Content::Surface));
        }
    }

    fn stage() -> Stage<HeadlessHost> {
        Stage::new(HeadlessHost::new(Size::new(800.0, 600.0)), StageConfig::default())
    }

    #[test]
    fn mount_starts_declared_subscriptions() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        let id = stage.mount(Recorder::new(&log));
        assert!(stage.has_frame_request(id));
        assert_eq!(stage.active_timers(id), vec![(1, Duration::from_millis(50))]);
        assert_eq!(stage.bounds(id), Some(Rect::default()));
    }

    #[test]
    fn frames_rerequest_every_step() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        let id = stage.mount(Recorder::new(&log));
        for _ in 0..5 {
            let report = stage.step(Duration::from_millis(16));
            assert_eq!(report.frames, 1);
        }
        assert_eq!(log.borrow().frames, 5);
        assert!(stage.has_frame_request(id));
        assert_eq!(stage.host().pending_frames(), 1);
    }

    #[test]
    fn timers_fire_on_interval() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        stage.mount(Recorder::new(&log));
        let fired: usize = (0..10)
            .map(|_| stage.step(Duration::from_millis(25)).timers)
            .sum();
        assert_eq!(fired, 5);
        assert!(log.borrow().timers.iter().all(|&s| s == 1));
    }

    #[test]
    fn changed_interval_restarts_timer() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        let id = stage.mount(Recorder::new(&log));
        stage
            .place(id, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        assert_eq!(stage.active_timers(id), vec![(1, Duration::from_millis(20))]);
        stage.place(id, Rect::new(0.0, 0.0, 0.0, 0.0)).unwrap();
        assert!(stage.active_timers(id).is_empty());
        assert_eq!(stage.step(Duration::from_secs(1)).timers, 0);
    }

    #[test]
    fn pointer_capture_routes_and_releases() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        let id = stage.mount(Recorder::new(&log));
        stage
            .place(id, Rect::new(100.0, 100.0, 200.0, 50.0))
            .unwrap();

        assert_eq!(stage.pointer(PointerEvent::down(150.0, 120.0)), Some(id));
        assert_eq!(stage.captures(id), &[PointerId(0)]);
        assert_eq!(stage.host().capture_owner(PointerId(0)), Some(id));
        assert!(!stage.has_frame_request(id));

        // Outside the bounds, but captured.
        assert_eq!(stage.pointer(PointerEvent::moved(900.0, 900.0)), Some(id));
        assert_eq!(stage.pointer(PointerEvent::up(900.0, 900.0)), Some(id));
        assert!(stage.captures(id).is_empty());
        assert_eq!(stage.host().capture_count(), 0);
        assert!(stage.has_frame_request(id));

        let positions: Vec<Point> = log
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Pointer(p) => Some(p.position),
                _ => None,
            })
            .collect();
        assert_eq!(positions[0], Point::new(50.0, 20.0));
        assert_eq!(positions[1], Point::new(800.0, 800.0));
    }

    #[test]
    fn uncaptured_pointer_outside_bounds_is_dropped() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        let id = stage.mount(Recorder::new(&log));
        stage.place(id, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(stage.pointer(PointerEvent::moved(50.0, 50.0)), None);
    }

    #[test]
    fn unmount_cancels_everything() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        let id = stage.mount(Recorder::new(&log));
        stage.place(id, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        stage.pointer(PointerEvent::down(10.0, 10.0));
        stage.unmount(id).unwrap();

        assert_eq!(stage.host().pending_frames(), 0);
        assert_eq!(stage.host().capture_count(), 0);
        assert_eq!(
            stage.host().measure(id),
            Err(HostError::UnknownWidget(id))
        );
        assert_eq!(stage.host().placed(), 0);
        let report = stage.step(Duration::from_secs(5));
        assert_eq!((report.frames, report.timers), (0, 0));
        assert_eq!(log.borrow().frames, 0);
        assert!(log.borrow().timers.is_empty());
        assert_eq!(stage.unmount(id), Err(StageError::UnknownWidget(id)));
    }

    #[test]
    fn stale_frame_token_is_ignored() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        let id = stage.mount(Recorder::new(&log));
        assert_eq!(stage.frame(id, FrameToken(9_999)), Ok(false));
        assert_eq!(log.borrow().frames, 0);
    }

    #[test]
    fn resize_of_unplaced_widget_is_host_error() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        let id = stage.mount(Recorder::new(&log));
        assert_eq!(
            stage.resize(id),
            Err(StageError::Host(HostError::UnknownWidget(id)))
        );
    }

    #[test]
    fn paint_clears_dirty_and_honours_reduced_motion() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut stage = stage();
        stage.mount(Recorder::new(&log));
        assert!(stage.needs_paint());
        assert_eq!(stage.paint().len(), 1);
        assert!(!stage.needs_paint());

        let mut calm = Stage::new(
            HeadlessHost::default(),
            StageConfig::default().reduced_motion(true),
        );
        calm.mount(Recorder::new(&log));
        assert!(calm.paint().is_empty());
    }

    #[test]
    fn stage_error_display_and_source() {
        use std::error::Error as _;
        let err = StageError::from(HostError::Unsupported("capture"));
        assert_eq!(err.to_string(), "host error: unsupported: capture");
        assert!(err.source().is_some());
        assert!(StageError::UnknownWidget(WidgetId(1)).source().is_none());
    }
}
