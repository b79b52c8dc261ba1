#![forbid(unsafe_code)]

//! Frame-coalesced wheel handling.
//!
//! A trackpad can deliver several wheel events per frame. Vertical deltas
//! are summed and applied once on the next frame; horizontal deltas apply
//! immediately. The axis chosen for a gesture sticks for two frames after
//! its last event so a diagonal trackpad swipe does not jitter between axes.

use crate::controller::ScrollEdges;
use crate::input::origin::OriginScroll;
use crate::task::EngineTask;
use vscroll_core::{Axis, DeltaMode, WheelEvent};
use vscroll_runtime::{Scheduler, TaskId};

/// Pixels per line for line-mode wheel deltas.
pub const LINE_MULTIPLIER: f64 = 10.0;

/// Frames an axis choice survives without new wheel events.
pub const AXIS_STICKY_FRAMES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WheelAxis {
    X,
    Y,
    /// Vertical wheel with shift held, treated as horizontal.
    ShiftX,
}

/// What the wheel handler did with an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAction {
    /// Already consumed by another list.
    Ignored,
    /// At the edge; leave it to the outer scroller.
    PassThrough,
    /// Vertical delta queued for the next frame.
    Queued,
    /// Horizontal delta to apply now.
    Horizontal(f64),
}

/// Wheel accumulator.
#[derive(Debug, Default)]
pub struct FrameWheel {
    pending: f64,
    flush: Option<TaskId>,
    axis: Option<WheelAxis>,
    axis_reset: Option<TaskId>,
}

impl FrameWheel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertical offset waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> f64 {
        self.pending
    }

    /// Handle one wheel event.
    ///
    /// `horizontal` says whether horizontal scrolling is enabled; without
    /// it every event is treated as vertical and shift is ignored.
    pub fn on_wheel(
        &mut self,
        event: &mut WheelEvent,
        horizontal: bool,
        origin: &mut OriginScroll,
        edges: ScrollEdges,
        sched: &mut Scheduler<EngineTask>,
    ) -> WheelAction {
        if let Some(id) = self.axis_reset.take() {
            sched.cancel(id);
        }
        self.axis_reset =
            Some(sched.request_frame_after(AXIS_STICKY_FRAMES, EngineTask::WheelAxisReset));

        let multiplier = match event.delta_mode {
            DeltaMode::Line => LINE_MULTIPLIER,
            DeltaMode::Pixel => 1.0,
        };
        let shift_x = horizontal && event.shift && event.delta_y != 0.0 && event.delta_x == 0.0;
        let delta_x = if shift_x { event.delta_y } else { event.delta_x };
        let delta_y = event.delta_y;

        let axis = *self.axis.get_or_insert(if shift_x {
            WheelAxis::ShiftX
        } else if horizontal && delta_x.abs() > delta_y.abs() {
            WheelAxis::X
        } else {
            WheelAxis::Y
        });

        match axis {
            WheelAxis::Y => {
                if origin.check(Axis::Vertical, delta_y, false, edges, sched) {
                    return WheelAction::PassThrough;
                }
                if !event.mark_virtual_handled() {
                    return WheelAction::Ignored;
                }
                self.push(delta_y * multiplier, sched);
                event.prevent_default();
                WheelAction::Queued
            }
            WheelAxis::X | WheelAxis::ShiftX => {
                if origin.check(Axis::Horizontal, delta_x, false, edges, sched) {
                    return WheelAction::PassThrough;
                }
                if !event.mark_virtual_handled() {
                    return WheelAction::Ignored;
                }
                event.prevent_default();
                WheelAction::Horizontal(delta_x * multiplier)
            }
        }
    }

    /// Add a vertical delta and make sure a flush is scheduled. Several
    /// pushes in one frame share the flush.
    pub fn push(&mut self, delta: f64, sched: &mut Scheduler<EngineTask>) {
        self.pending += delta;
        if self.flush.is_none() {
            self.flush = Some(sched.request_frame(EngineTask::WheelFlush));
        }
    }

    /// Flush fired: hand over the accumulated offset and reset it.
    pub fn take_pending(&mut self) -> f64 {
        self.flush = None;
        std::mem::take(&mut self.pending)
    }

    /// Axis stickiness expired.
    pub fn reset_axis(&mut self) {
        self.axis = None;
        self.axis_reset = None;
    }

    pub fn cancel(&mut self, sched: &mut Scheduler<EngineTask>) {
        for id in [self.flush.take(), self.axis_reset.take()].into_iter().flatten() {
            sched.cancel(id);
        }
        self.pending = 0.0;
        self.axis = None;
    }
}
