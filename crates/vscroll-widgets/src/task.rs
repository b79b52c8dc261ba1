#![forbid(unsafe_code)]

//! Deferred work the engine schedules on its [`Scheduler`](vscroll_runtime::Scheduler).
//!
//! Each variant names a continuation owned by exactly one component; the
//! list pops due tasks and routes them back to that component.

/// A deferred engine action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineTask {
    /// Apply reported heights to the cache (microtask).
    FlushHeights,
    /// Apply the accumulated vertical wheel offset (frame).
    WheelFlush,
    /// Forget the sticky wheel axis (frame).
    WheelAxisReset,
    /// Release the edge pass-through lock (timer).
    EdgeUnlock,
    /// One step of touch inertia (timer).
    TouchDecay,
    /// One step of drag-select auto-scroll (frame).
    DragScroll,
    /// One iteration of a convergent scroll-to (frame).
    ScrollToStep,
    /// Hide the scrollbar after inactivity (timer).
    HideScrollbar,
}
