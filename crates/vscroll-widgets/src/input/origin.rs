#![forbid(unsafe_code)]

//! Edge pass-through.
//!
//! When the list sits at an edge and the user keeps scrolling outward, the
//! gesture should scroll whatever contains the list instead. Deciding that
//! per event makes a fast gesture leak: one event lands inside, the next at
//! the edge, and the page starts moving mid-flick. So any consumed delta
//! arms a short lock, and while it holds even edge deltas are consumed.

use crate::controller::ScrollEdges;
use crate::task::EngineTask;
use std::time::Duration;
use vscroll_core::Axis;
use vscroll_runtime::{Scheduler, TaskId};

/// How long a consumed delta keeps later edge deltas consumed.
pub const EDGE_LOCK: Duration = Duration::from_millis(50);

/// Edge pass-through decision with its debounce lock.
#[derive(Debug, Default)]
pub struct OriginScroll {
    locked: bool,
    unlock_task: Option<TaskId>,
}

impl OriginScroll {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Decide whether a delta should pass through to the outer scroller.
    ///
    /// Returns `true` when the list is at the edge the delta points past and
    /// no lock is held. Smooth (inertial) deltas at an edge also clear the
    /// lock so momentum can hand over immediately.
    pub fn check(
        &mut self,
        axis: Axis,
        delta: f64,
        smooth: bool,
        edges: ScrollEdges,
        sched: &mut Scheduler<EngineTask>,
    ) -> bool {
        let (at_start, at_end) = match axis {
            Axis::Vertical => (edges.at_top, edges.at_bottom),
            Axis::Horizontal => (edges.at_left, edges.at_right),
        };
        let origin = (delta < 0.0 && at_start) || (delta > 0.0 && at_end);

        if smooth && origin {
            self.release(sched);
        } else if !origin || self.locked {
            self.lock(sched);
        }

        !self.locked && origin
    }

    /// Lock timer elapsed.
    pub fn unlock(&mut self) {
        self.locked = false;
        self.unlock_task = None;
    }

    /// Drop the lock and its timer.
    pub fn release(&mut self, sched: &mut Scheduler<EngineTask>) {
        if let Some(id) = self.unlock_task.take() {
            sched.cancel(id);
        }
        self.locked = false;
    }

    fn lock(&mut self, sched: &mut Scheduler<EngineTask>) {
        if let Some(id) = self.unlock_task.take() {
            sched.cancel(id);
        }
        self.locked = true;
        self.unlock_task = Some(sched.set_timeout(EDGE_LOCK, EngineTask::EdgeUnlock));
    }
}
