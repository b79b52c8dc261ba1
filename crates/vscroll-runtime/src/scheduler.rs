#![forbid(unsafe_code)]

//! Deterministic cooperative scheduler.
//!
//! Three kinds of deferral exist, mirroring a browser event loop:
//!
//! | Kind      | Fires when                                   |
//! |-----------|----------------------------------------------|
//! | microtask | the host drains microtasks after an event    |
//! | frame     | the host starts the N-th next animation frame |
//! | timer     | the logical clock reaches the deadline       |
//!
//! Tasks are plain values of type `T` (usually an enum of engine actions);
//! the scheduler never runs code itself. The owner pops due tasks and
//! dispatches them, which keeps all mutation on the owner's `&mut self`.
//!
//! # Failure Modes
//!
//! - **Forgotten cancellation**: a component that re-schedules without
//!   cancelling its previous [`TaskId`] gets two deliveries. Components keep
//!   at most one live id per concern and cancel before re-arming.
//! - **Stale tasks after teardown**: [`Scheduler::cancel_all`] drops every
//!   pending entry; owners call it from `Drop`.

use smallvec::SmallVec;
use std::time::Duration;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
enum When {
    Microtask,
    Frame { frames_left: u32 },
    Timer { due: Duration },
}

#[derive(Debug)]
struct Entry<T> {
    id: TaskId,
    when: When,
    task: T,
}

/// Queue of deferred tasks on a logical timeline.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    frame: u64,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            frame: 0,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of frames started so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Number of pending tasks of any kind.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    fn push(&mut self, when: When, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, when, task });
        id
    }

    /// Queue a task for the next microtask checkpoint.
    pub fn queue_microtask(&mut self, task: T) -> TaskId {
        self.push(When::Microtask, task)
    }

    /// Queue a task for the next animation frame.
    pub fn request_frame(&mut self, task: T) -> TaskId {
        self.request_frame_after(1, task)
    }

    /// Queue a task for the `frames`-th next animation frame (at least 1).
    pub fn request_frame_after(&mut self, frames: u32, task: T) -> TaskId {
        self.push(
            When::Frame {
                frames_left: frames.max(1),
            },
            task,
        )
    }

    /// Queue a task to fire once the clock reaches `now + delay`.
    pub fn set_timeout(&mut self, delay: Duration, task: T) -> TaskId {
        let due = self.now.saturating_add(delay);
        self.push(When::Timer { due }, task)
    }

    /// Cancel a pending task. Returns `false` if it already ran or was
    /// cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Cancel everything. Returns how many tasks were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.entries.len();
        if dropped > 0 {
            tracing::trace!(target: "vscroll", dropped, "scheduler cleared");
        }
        self.entries.clear();
        dropped
    }

    /// Pop the oldest pending microtask.
    pub fn next_microtask(&mut self) -> Option<T> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.when == When::Microtask)?;
        Some(self.entries.remove(pos).task)
    }

    /// Start a new animation frame: every frame task's countdown drops by
    /// one and the tasks reaching zero are returned in queue order.
    ///
    /// Tasks requested while the returned batch is being handled belong to
    /// the following frame.
    pub fn next_frame(&mut self) -> SmallVec<[T; 4]> {
        self.frame += 1;
        let mut due = SmallVec::new();
        let mut i = 0;
        while i < self.entries.len() {
            let fire = match &mut self.entries[i].when {
                When::Frame { frames_left } => {
                    *frames_left -= 1;
                    *frames_left == 0
                }
                _ => false,
            };
            if fire {
                due.push(self.entries.remove(i).task);
            } else {
                i += 1;
            }
        }
        due
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries
            .iter()
            .filter_map(|e| match e.when {
                When::Timer { due } => Some(due),
                _ => None,
            })
            .min()
    }

    /// Pop the earliest timer due at or before `limit`, moving the clock to
    /// its deadline. Ties go to the task queued first.
    pub fn pop_timer_until(&mut self, limit: Duration) -> Option<T> {
        let (pos, due) = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e.when {
                When::Timer { due } if due <= limit => Some((i, due, e.id)),
                _ => None,
            })
            .min_by_key(|&(_, due, id)| (due, id))
            .map(|(i, due, _)| (i, due))?;
        if due > self.now {
            self.now = due;
        }
        Some(self.entries.remove(pos).task)
    }

    /// Move the clock to `now` without firing anything. Going backwards is
    /// ignored.
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Job {
        A,
        B,
        C,
    }

    #[test]
    fn microtasks_fifo() {
        let mut s = Scheduler::new();
        s.queue_microtask(Job::A);
        s.queue_microtask(Job::B);
        assert_eq!(s.next_microtask(), Some(Job::A));
        assert_eq!(s.next_microtask(), Some(Job::B));
        assert_eq!(s.next_microtask(), None);
    }

    #[test]
    fn frame_countdown() {
        let mut s = Scheduler::new();
        s.request_frame(Job::A);
        s.request_frame_after(2, Job::B);
        assert_eq!(s.next_frame().as_slice(), &[Job::A]);
        assert_eq!(s.next_frame().as_slice(), &[Job::B]);
        assert!(s.next_frame().is_empty());
        assert_eq!(s.frame_count(), 3);
    }

    #[test]
    fn zero_frames_means_next_frame() {
        let mut s = Scheduler::new();
        s.request_frame_after(0, Job::C);
        assert_eq!(s.next_frame().as_slice(), &[Job::C]);
    }

    #[test]
    fn cancel_prevents_delivery() {
        let mut s = Scheduler::new();
        let a = s.request_frame(Job::A);
        s.request_frame(Job::B);
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert_eq!(s.next_frame().as_slice(), &[Job::B]);
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let mut s = Scheduler::new();
        s.set_timeout(Duration::from_millis(50), Job::A);
        s.set_timeout(Duration::from_millis(16), Job::B);
        s.set_timeout(Duration::from_millis(16), Job::C);
        assert_eq!(s.next_deadline(), Some(Duration::from_millis(16)));

        let limit = Duration::from_millis(40);
        assert_eq!(s.pop_timer_until(limit), Some(Job::B));
        assert_eq!(s.pop_timer_until(limit), Some(Job::C));
        assert_eq!(s.now(), Duration::from_millis(16));
        assert_eq!(s.pop_timer_until(limit), None);

        s.set_now(limit);
        assert_eq!(s.pop_timer_until(Duration::from_millis(60)), Some(Job::A));
        assert_eq!(s.now(), Duration::from_millis(50));
    }

    #[test]
    fn timeout_is_relative_to_now() {
        let mut s = Scheduler::new();
        s.set_now(Duration::from_millis(100));
        s.set_timeout(Duration::from_millis(16), Job::A);
        assert_eq!(s.next_deadline(), Some(Duration::from_millis(116)));
    }

    #[test]
    fn cancel_all_empties() {
        let mut s = Scheduler::new();
        s.queue_microtask(Job::A);
        s.request_frame(Job::B);
        s.set_timeout(Duration::from_millis(1), Job::C);
        assert_eq!(s.pending(), 3);
        assert_eq!(s.cancel_all(), 3);
        assert!(s.is_idle());
    }

    proptest! {
        #[test]
        fn timers_pop_sorted(delays in proptest::collection::vec(0u64..500, 1..20)) {
            let mut s = Scheduler::new();
            for (i, d) in delays.iter().enumerate() {
                s.set_timeout(Duration::from_millis(*d), i);
            }
            let mut last = Duration::ZERO;
            let mut count = 0;
            while let Some(i) = s.pop_timer_until(Duration::from_secs(1)) {
                let due = Duration::from_millis(delays[i]);
                prop_assert!(due >= last);
                last = due;
                count += 1;
            }
            prop_assert_eq!(count, delays.len());
        }
    }
}
