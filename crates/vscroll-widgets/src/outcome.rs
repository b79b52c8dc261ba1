//! Shared result types for input handling.

/// Result of processing a mouse event on the scrollbar thumb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseResult {
    /// Event not relevant to the thumb.
    Ignored,
    /// A thumb drag started.
    Captured,
    /// Dragging moved the thumb; scroll to this offset.
    Scrolled(f64),
    /// The drag ended.
    Released,
}

/// What happened to a wheel or touch event.
///
/// Anything except [`InputOutcome::Consumed`] leaves the event's default
/// action alone so the host can scroll an outer container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Not in virtual mode, or another list instance already took it.
    Ignored,
    /// At a scroll edge moving outward: let the native scroll through.
    PassThrough,
    /// The engine will scroll; default prevented.
    Consumed,
}

impl InputOutcome {
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}
