#![forbid(unsafe_code)]

//! Geometric primitives shared by the engine and the host.

/// Vertical extent of the scroll container in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Signed distance of `y` outside the bounds: negative above, positive
    /// below, zero inside (edges count as outside with distance 0).
    #[must_use]
    pub fn overshoot(&self, y: f64) -> Option<f64> {
        if y <= self.top {
            Some(y - self.top)
        } else if y >= self.bottom {
            Some(y - self.bottom)
        } else {
            None
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }
}

/// Snapshot of the scroll offsets, as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollInfo {
    pub x: f64,
    pub y: f64,
}

impl ScrollInfo {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
