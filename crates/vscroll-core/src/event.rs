#![forbid(unsafe_code)]

//! Device-neutral input events consumed by the scroll engine.
//!
//! The host translates its native wheel, touch, and mouse events into these
//! types. Two pieces of per-event state travel with them:
//!
//! - `virtual_handled`: stamped by the first list instance that consumes the
//!   event. A nested instance the event bubbles through sees the stamp and
//!   leaves the event alone.
//! - `default_prevented`: set when the engine consumed the event. When it is
//!   still `false` after dispatch the host must let native scrolling (for
//!   example of an outer page) proceed.

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeltaMode {
    /// Deltas are pixels (trackpads, most mice).
    #[default]
    Pixel,
    /// Deltas are lines (classic notched mouse wheels on some platforms).
    Line,
}

/// A wheel event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WheelEvent {
    pub delta_x: f64,
    pub delta_y: f64,
    pub shift: bool,
    pub delta_mode: DeltaMode,
    virtual_handled: bool,
    default_prevented: bool,
}

impl WheelEvent {
    /// Vertical wheel event in pixel mode.
    #[must_use]
    pub fn vertical(delta_y: f64) -> Self {
        Self {
            delta_y,
            ..Self::default()
        }
    }

    /// Wheel event with both axes.
    #[must_use]
    pub fn new(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            ..Self::default()
        }
    }

    /// Set the shift modifier.
    #[must_use]
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    /// Set the delta unit.
    #[must_use]
    pub fn with_delta_mode(mut self, mode: DeltaMode) -> Self {
        self.delta_mode = mode;
        self
    }

    /// Whether a list instance already consumed this event.
    #[must_use]
    pub fn is_virtual_handled(&self) -> bool {
        self.virtual_handled
    }

    /// Stamp the event as consumed by a list instance.
    ///
    /// Returns `false` if it was already stamped.
    pub fn mark_virtual_handled(&mut self) -> bool {
        !std::mem::replace(&mut self.virtual_handled, true)
    }

    /// Suppress the native default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether the native default action was suppressed.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// One active touch point, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub page_x: f64,
    pub page_y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(page_x: f64, page_y: f64) -> Self {
        Self { page_x, page_y }
    }
}

/// A touch start / move event carrying the currently active touch points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TouchEvent {
    pub touches: Vec<TouchPoint>,
    default_prevented: bool,
    virtual_handled: bool,
}

impl TouchEvent {
    /// Event with a single active touch point.
    #[must_use]
    pub fn single(page_x: f64, page_y: f64) -> Self {
        Self {
            touches: vec![TouchPoint::new(page_x, page_y)],
            default_prevented: false,
            virtual_handled: false,
        }
    }

    /// Event with the given touch points.
    #[must_use]
    pub fn with_touches(touches: Vec<TouchPoint>) -> Self {
        Self {
            touches,
            default_prevented: false,
            virtual_handled: false,
        }
    }

    /// Suppress the native default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether the native default action was suppressed.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    #[must_use]
    pub fn is_virtual_handled(&self) -> bool {
        self.virtual_handled
    }

    /// Claim the move for the innermost list. Returns `false` if another
    /// list already claimed it.
    pub fn mark_virtual_handled(&mut self) -> bool {
        !std::mem::replace(&mut self.virtual_handled, true)
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Mouse event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Moved,
}

/// A mouse event in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub page_x: f64,
    pub page_y: f64,
    /// The event target is itself draggable (native drag and drop wins).
    pub target_draggable: bool,
    virtual_handled: bool,
}

impl MouseEvent {
    #[must_use]
    pub fn new(kind: MouseEventKind, page_x: f64, page_y: f64) -> Self {
        Self {
            kind,
            page_x,
            page_y,
            target_draggable: false,
            virtual_handled: false,
        }
    }

    /// Mark the event target as draggable.
    #[must_use]
    pub fn with_draggable_target(mut self, draggable: bool) -> Self {
        self.target_draggable = draggable;
        self
    }

    /// Page coordinate along `axis`.
    #[must_use]
    pub fn page(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.page_x,
            Axis::Vertical => self.page_y,
        }
    }

    #[must_use]
    pub fn is_virtual_handled(&self) -> bool {
        self.virtual_handled
    }

    /// Stamp the event as consumed; `false` if it was already stamped.
    pub fn mark_virtual_handled(&mut self) -> bool {
        !std::mem::replace(&mut self.virtual_handled, true)
    }
}
