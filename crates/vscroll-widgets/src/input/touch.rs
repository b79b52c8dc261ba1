#![forbid(unsafe_code)]

//! Single-finger touch scrolling with inertia.
//!
//! Each move reports the finger's travel since the previous move along the
//! dominant axis. After every move an inertia loop starts (or restarts):
//! every 16 ms the last delta is scaled by [`SMOOTH_PTG`] and applied again
//! until it falls to [`DECAY_EPSILON`] or the list reports it could not
//! consume it (an edge was reached).
//!
//! Lifting the finger does not stop the loop; that is the fling. A new
//! touch start or teardown does.

use crate::task::EngineTask;
use std::time::Duration;
use vscroll_core::{Axis, TouchEvent, TouchPoint};
use vscroll_runtime::{Scheduler, TaskId};

/// Per-step decay factor of the inertia loop.
pub const SMOOTH_PTG: f64 = 14.0 / 15.0;

/// Interval between inertia steps.
pub const DECAY_INTERVAL: Duration = Duration::from_millis(16);

/// Inertia stops once the delta magnitude is at or below this.
pub const DECAY_EPSILON: f64 = 0.1;

/// A delta produced by touch input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchDelta {
    pub axis: Axis,
    pub delta: f64,
    /// Produced by the inertia loop rather than the finger.
    pub smooth: bool,
}

/// Touch tracking and inertia state.
#[derive(Debug, Default)]
pub struct TouchMove {
    touched: bool,
    last: TouchPoint,
    inertia: Option<(Axis, f64)>,
    decay_task: Option<TaskId>,
}

impl TouchMove {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_touching(&self) -> bool {
        self.touched
    }

    #[must_use]
    pub fn is_decaying(&self) -> bool {
        self.decay_task.is_some()
    }

    /// Finger down. Multi-touch is ignored; any running inertia stops.
    pub fn touch_start(&mut self, event: &TouchEvent, sched: &mut Scheduler<EngineTask>) {
        self.stop_decay(sched);
        if self.touched {
            return;
        }
        if let [point] = event.touches.as_slice() {
            self.touched = true;
            self.last = TouchPoint {
                page_x: point.page_x.ceil(),
                page_y: point.page_y.ceil(),
            };
        }
    }

    /// Finger moved. Returns the delta to apply along the dominant axis and
    /// restarts the inertia loop with it.
    pub fn touch_move(
        &mut self,
        event: &TouchEvent,
        sched: &mut Scheduler<EngineTask>,
    ) -> Option<TouchDelta> {
        if !self.touched {
            return None;
        }
        let point = event.touches.first()?;
        let x = point.page_x.ceil();
        let y = point.page_y.ceil();
        let offset_x = self.last.page_x - x;
        let offset_y = self.last.page_y - y;

        let delta = if offset_x.abs() > offset_y.abs() {
            self.last.page_x = x;
            TouchDelta {
                axis: Axis::Horizontal,
                delta: offset_x,
                smooth: false,
            }
        } else {
            self.last.page_y = y;
            TouchDelta {
                axis: Axis::Vertical,
                delta: offset_y,
                smooth: false,
            }
        };

        self.stop_decay(sched);
        self.inertia = Some((delta.axis, delta.delta));
        self.decay_task = Some(sched.set_timeout(DECAY_INTERVAL, EngineTask::TouchDecay));
        Some(delta)
    }

    /// Finger up. Inertia keeps running.
    pub fn touch_end(&mut self) {
        self.touched = false;
    }

    /// Inertia timer fired: produce the next decayed delta. The caller
    /// applies it and then reports back through [`Self::continue_decay`].
    pub fn decay_step(&mut self) -> Option<TouchDelta> {
        self.decay_task = None;
        let (axis, delta) = self.inertia.as_mut()?;
        *delta *= SMOOTH_PTG;
        Some(TouchDelta {
            axis: *axis,
            delta: *delta,
            smooth: true,
        })
    }

    /// Re-arm the inertia loop unless the last step was not consumed or has
    /// decayed below the threshold.
    pub fn continue_decay(&mut self, consumed: bool, sched: &mut Scheduler<EngineTask>) {
        let alive = self
            .inertia
            .is_some_and(|(_, delta)| consumed && delta.abs() > DECAY_EPSILON);
        if alive {
            self.decay_task = Some(sched.set_timeout(DECAY_INTERVAL, EngineTask::TouchDecay));
        } else {
            self.inertia = None;
        }
    }

    pub fn stop_decay(&mut self, sched: &mut Scheduler<EngineTask>) {
        if let Some(id) = self.decay_task.take() {
            sched.cancel(id);
        }
        self.inertia = None;
    }

    pub fn cancel(&mut self, sched: &mut Scheduler<EngineTask>) {
        self.stop_decay(sched);
        self.touched = false;
    }
}
