#![forbid(unsafe_code)]

//! Auto-scroll while drag-selecting past the container.
//!
//! With the left button held down inside the list, moving the pointer above
//! or below the container scrolls every frame by `floor(sqrt(distance))`
//! pixels, so the speed grows gently with distance.

use crate::task::EngineTask;
use vscroll_core::{Bounds, MouseButton, MouseEvent, MouseEventKind};
use vscroll_runtime::{Scheduler, TaskId};

/// Per-frame offset for a pointer `distance` pixels past the edge.
#[must_use]
pub fn smooth_scroll_offset(distance: f64) -> f64 {
    distance.abs().sqrt().floor()
}

/// Drag-select auto-scroll state.
#[derive(Debug, Default)]
pub struct DragAutoScroll {
    pressed: bool,
    offset: f64,
    task: Option<TaskId>,
}

impl DragAutoScroll {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.task.is_some()
    }

    /// Route a mouse event. `bounds` is the container's vertical extent in
    /// page coordinates.
    pub fn handle(&mut self, event: &mut MouseEvent, bounds: Bounds, sched: &mut Scheduler<EngineTask>) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(event),
            MouseEventKind::Up(_) => self.mouse_up(sched),
            MouseEventKind::Moved => self.mouse_move(event.page_y, bounds, sched),
            MouseEventKind::Down(_) => {}
        }
    }

    /// Left button down on a non-draggable target starts tracking, unless a
    /// nested list already claimed the event.
    pub fn mouse_down(&mut self, event: &mut MouseEvent) {
        if event.target_draggable {
            return;
        }
        if event.mark_virtual_handled() {
            self.pressed = true;
        }
    }

    pub fn mouse_up(&mut self, sched: &mut Scheduler<EngineTask>) {
        self.pressed = false;
        self.stop(sched);
    }

    pub fn mouse_move(&mut self, page_y: f64, bounds: Bounds, sched: &mut Scheduler<EngineTask>) {
        if !self.pressed {
            return;
        }
        match bounds.overshoot(page_y) {
            Some(distance) => {
                self.offset = smooth_scroll_offset(distance).copysign(distance);
                if self.task.is_none() {
                    self.task = Some(sched.request_frame(EngineTask::DragScroll));
                }
            }
            None => self.stop(sched),
        }
    }

    /// Frame fired: return the offset to apply and schedule the next frame.
    pub fn on_frame(&mut self, sched: &mut Scheduler<EngineTask>) -> Option<f64> {
        self.task = None;
        if !self.pressed {
            return None;
        }
        self.task = Some(sched.request_frame(EngineTask::DragScroll));
        Some(self.offset)
    }

    fn stop(&mut self, sched: &mut Scheduler<EngineTask>) {
        if let Some(id) = self.task.take() {
            sched.cancel(id);
        }
        self.offset = 0.0;
    }

    pub fn cancel(&mut self, sched: &mut Scheduler<EngineTask>) {
        self.pressed = false;
        self.stop(sched);
    }
}
