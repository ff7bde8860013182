#![forbid(unsafe_code)]

//! Single-threaded timers evaluated against the host clock.
//!
//! Nothing here sleeps or spawns: the stage calls [`Scheduler::poll`] with the
//! current host time and receives the payloads of every task that came due.
//!
//! # Lag
//!
//! An interval that has fallen several periods behind fires once per poll
//! and re-anchors at `now + interval`. A page that was hidden for ten seconds
//! therefore gets one orbital tick, not two hundred.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Identifier of a scheduled task.
pub type TaskId = u64;

/// Shortest interval the scheduler accepts.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Shared cancellation flag for a scheduled task.
///
/// Clones observe the same flag. Cancelling is idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the task cancelled.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Handle returned when scheduling a task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    token: CancelToken,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Cancel the task. The next poll drops it without firing.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
struct Task<T> {
    id: TaskId,
    due: Duration,
    interval: Option<Duration>,
    token: CancelToken,
    payload: T,
}

/// Timer queue carrying a payload of type `T` per task.
#[derive(Debug)]
pub struct Scheduler<T> {
    tasks: Vec<Task<T>>,
    next_id: TaskId,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `payload` once, `delay` after `now`.
    pub fn after(&mut self, now: Duration, delay: Duration, payload: T) -> TaskHandle {
        self.insert(now + delay, None, payload)
    }

    /// Fire `payload` every `interval`, starting one interval after `now`.
    pub fn every(&mut self, now: Duration, interval: Duration, payload: T) -> TaskHandle {
        let interval = interval.max(MIN_INTERVAL);
        self.insert(now + interval, Some(interval), payload)
    }

    fn insert(&mut self, due: Duration, interval: Option<Duration>, payload: T) -> TaskHandle {
        self.next_id += 1;
        let token = CancelToken::new();
        self.tasks.push(Task {
            id: self.next_id,
            due,
            interval,
            token: token.clone(),
            payload,
        });
        TaskHandle {
            id: self.next_id,
            token,
        }
    }

    /// Cancel a task by id. Returns whether a live task was found.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().find(|t| t.id == id) {
            Some(task) if !task.token.is_cancelled() => {
                task.token.cancel();
                true
            }
            _ => false,
        }
    }

    /// Cancel every task whose payload matches. Returns how many were live.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut count = 0;
        for task in &self.tasks {
            if !task.token.is_cancelled() && pred(&task.payload) {
                task.token.cancel();
                count += 1;
            }
        }
        count
    }

    /// Collect the payloads of every task due at `now`, in deadline order.
    ///
    /// One-shot tasks are removed after firing; intervals are rescheduled.
    pub fn poll(&mut self, now: Duration) -> Vec<(TaskId, T)> {
        self.tasks.retain(|t| !t.token.is_cancelled());

        let mut due: Vec<usize> = (0..self.tasks.len())
            .filter(|&i| self.tasks[i].due <= now)
            .collect();
        due.sort_by_key(|&i| (self.tasks[i].due, self.tasks[i].id));

        let mut fired = Vec::with_capacity(due.len());
        for &i in &due {
            let task = &mut self.tasks[i];
            fired.push((task.id, task.payload.clone()));
            match task.interval {
                Some(interval) => {
                    task.due += interval;
                    if task.due <= now {
                        task.due = now + interval;
                    }
                }
                // Spent one-shots are swept below.
                None => task.token.cancel(),
            }
        }
        self.tasks.retain(|t| !t.token.is_cancelled());
        fired
    }

    /// Earliest deadline among live tasks.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks
            .iter()
            .filter(|t| !t.token.is_cancelled())
            .map(|t| t.due)
            .min()
    }

    /// Number of live tasks.
    pub fn len(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| !t.token.is_cancelled())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn after_fires_once() {
        let mut s = Scheduler::new();
        s.after(ms(0), ms(100), "a");
        assert!(s.poll(ms(99)).is_empty());
        assert_eq!(s.poll(ms(100)).len(), 1);
        assert!(s.poll(ms(500)).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn every_fires_each_interval() {
        let mut s = Scheduler::new();
        s.every(ms(0), ms(50), 7u8);
        let mut count = 0;
        for t in (0..=200).step_by(10) {
            count += s.poll(ms(t)).len();
        }
        assert_eq!(count, 4);
        assert_eq!(s.next_deadline(), Some(ms(250)));
    }

    #[test]
    fn lagging_interval_fires_once_and_reanchors() {
        let mut s = Scheduler::new();
        s.every(ms(0), ms(50), ());
        assert_eq!(s.poll(ms(1_000)).len(), 1);
        assert_eq!(s.next_deadline(), Some(ms(1_050)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = Scheduler::new();
        let handle = s.every(ms(0), ms(10), ());
        assert!(s.cancel(handle.id()));
        assert!(!s.cancel(handle.id()));
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(s.poll(ms(100)).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn handle_cancel_is_observed_by_poll() {
        let mut s = Scheduler::new();
        let handle = s.after(ms(0), ms(10), ());
        let observer = handle.token().clone();
        handle.cancel();
        assert!(observer.is_cancelled());
        assert!(s.poll(ms(10)).is_empty());
    }

    #[test]
    fn cancel_where_matches_payload() {
        let mut s = Scheduler::new();
        s.every(ms(0), ms(10), 1u32);
        s.every(ms(0), ms(10), 2u32);
        s.after(ms(0), ms(10), 1u32);
        assert_eq!(s.cancel_where(|&p| p == 1), 2);
        assert_eq!(s.cancel_where(|&p| p == 1), 0);
        let fired: Vec<u32> = s.poll(ms(10)).into_iter().map(|(_, p)| p).collect();
        assert_eq!(fired, vec![2]);
    }

    #[test]
    fn zero_interval_is_floored() {
        let mut s = Scheduler::new();
        s.every(ms(0), Duration::ZERO, ());
        assert_eq!(s.next_deadline(), Some(MIN_INTERVAL));
    }

    #[test]
    fn poll_orders_by_deadline() {
        let mut s = Scheduler::new();
        s.after(ms(0), ms(30), "late");
        s.after(ms(0), ms(10), "early");
        let order: Vec<&str> = s.poll(ms(30)).into_iter().map(|(_, p)| p).collect();
        assert_eq!(order, vec!["early", "late"]);
    }
}
