#![forbid(unsafe_code)]

//! Scrollbar thumb geometry and interaction state.
//!
//! The engine does not draw a scrollbar. It owns the numbers a host needs
//! to draw one: thumb size and position, whether a drag is in progress, and
//! whether the bar should currently be visible.

use crate::outcome::MouseResult;
use crate::task::EngineTask;
use std::time::Duration;
use vscroll_core::{MouseButton, MouseEvent, MouseEventKind};
use vscroll_runtime::{Scheduler, TaskId};

/// Smallest thumb, in pixels, unless configured otherwise.
pub const DEFAULT_MIN_THUMB: f64 = 20.0;

/// Inactivity before the scrollbar hides.
pub const HIDE_DELAY: Duration = Duration::from_millis(3000);

/// Thumb length for a viewport over a scroll range.
///
/// Proportional to `viewport / range`, floored at `min`, never longer than
/// the viewport, rounded down to whole pixels.
#[must_use]
pub fn spin_size(viewport: f64, scroll_range: f64, min: f64) -> f64 {
    if viewport <= 0.0 {
        return 0.0;
    }
    let proportional = if scroll_range > 0.0 {
        viewport / scroll_range * viewport
    } else {
        viewport
    };
    proportional.max(min).min(viewport).floor()
}

/// Thumb and track dimensions along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThumbGeometry {
    /// Total content length.
    pub scroll_range: f64,
    /// Visible length (also the track length).
    pub viewport: f64,
    /// Thumb length.
    pub thumb: f64,
}

impl ThumbGeometry {
    /// Geometry with the thumb sized by [`spin_size`].
    #[must_use]
    pub fn new(scroll_range: f64, viewport: f64, min_thumb: f64) -> Self {
        Self {
            scroll_range,
            viewport,
            thumb: spin_size(viewport, scroll_range, min_thumb),
        }
    }

    /// Geometry with an explicit thumb length.
    #[must_use]
    pub const fn with_thumb(scroll_range: f64, viewport: f64, thumb: f64) -> Self {
        Self {
            scroll_range,
            viewport,
            thumb,
        }
    }

    /// Whether the content overflows the viewport.
    #[must_use]
    pub fn is_scrollable(&self) -> bool {
        self.scroll_range > self.viewport
    }

    /// Maximum scroll offset.
    #[must_use]
    pub fn scroll_span(&self) -> f64 {
        (self.scroll_range - self.viewport).max(0.0)
    }

    /// Distance the thumb can travel.
    #[must_use]
    pub fn track_span(&self) -> f64 {
        (self.viewport - self.thumb).max(0.0)
    }

    /// Thumb offset for a scroll offset. Zero when nothing scrolls.
    #[must_use]
    pub fn thumb_top(&self, scroll_top: f64) -> f64 {
        let span = self.scroll_span();
        if span <= 0.0 {
            return 0.0;
        }
        scroll_top / span * self.track_span()
    }

    /// Scroll offset for a thumb offset, rounded up to a whole pixel.
    ///
    /// The result is not clamped; it goes through the offset controller.
    #[must_use]
    pub fn scroll_top_for(&self, thumb_top: f64) -> f64 {
        let track = self.track_span();
        let ratio = if track > 0.0 { thumb_top / track } else { 0.0 };
        (ratio * self.scroll_span()).ceil()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ThumbDrag {
    start_page_y: f64,
    start_top: f64,
}

/// Thumb drag and visibility state.
#[derive(Debug, Default)]
pub struct ScrollbarState {
    drag: Option<ThumbDrag>,
    visible: bool,
    hide_task: Option<TaskId>,
}

impl ScrollbarState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Show the scrollbar and restart the hide countdown.
    pub fn flash(&mut self, sched: &mut Scheduler<EngineTask>) {
        self.visible = true;
        if let Some(id) = self.hide_task.take() {
            sched.cancel(id);
        }
        self.hide_task = Some(sched.set_timeout(HIDE_DELAY, EngineTask::HideScrollbar));
    }

    /// Hide countdown elapsed. A drag in progress keeps the bar up and
    /// restarts the countdown.
    pub fn on_hide_timer(&mut self, sched: &mut Scheduler<EngineTask>) {
        self.hide_task = None;
        if self.is_dragging() {
            self.flash(sched);
        } else {
            self.visible = false;
        }
    }

    /// Handle a mouse event for the thumb.
    ///
    /// `on_thumb` says whether the pointer hit the thumb (only consulted on
    /// button down). Moves are tracked anywhere once a drag has started,
    /// like a pointer capture.
    pub fn handle_mouse(
        &mut self,
        event: &MouseEvent,
        on_thumb: bool,
        geometry: ThumbGeometry,
        scroll_top: f64,
    ) -> MouseResult {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) if on_thumb => {
                self.drag = Some(ThumbDrag {
                    start_page_y: event.page_y,
                    start_top: geometry.thumb_top(scroll_top),
                });
                MouseResult::Captured
            }
            MouseEventKind::Moved => match self.drag {
                Some(drag) => {
                    let new_top = drag.start_top + (event.page_y - drag.start_page_y);
                    MouseResult::Scrolled(geometry.scroll_top_for(new_top))
                }
                None => MouseResult::Ignored,
            },
            MouseEventKind::Up(MouseButton::Left) if self.drag.is_some() => {
                self.drag = None;
                MouseResult::Released
            }
            _ => MouseResult::Ignored,
        }
    }

    /// Drop drag state and the hide countdown.
    pub fn cancel(&mut self, sched: &mut Scheduler<EngineTask>) {
        self.drag = None;
        if let Some(id) = self.hide_task.take() {
            sched.cancel(id);
        }
    }
}
