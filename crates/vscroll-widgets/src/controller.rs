#![forbid(unsafe_code)]

//! The single writer of the scroll offset.
//!
//! Every source of scrolling (wheel, touch, drag-select, thumb drag, native
//! scroll events, `scroll_to`) ends in [`ScrollOffsetController::set_scroll_top`].
//! It clamps to the scrollable span, short-circuits when nothing would
//! change, and otherwise commits the value and pushes it to the host's
//! scroll container through [`ScrollHost`].
//!
//! The short-circuit is what breaks the loop between a programmatic write
//! and the native scroll event it causes: the echo arrives with the value we
//! already hold and stops here.

use vscroll_core::ScrollInfo;

/// The host's scroll container.
pub trait ScrollHost {
    /// Write the container's vertical offset.
    fn sync_scroll_top(&mut self, top: f64);

    /// Write the container's horizontal offset.
    fn sync_scroll_left(&mut self, _left: f64) {}
}

/// A host that ignores writes, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl ScrollHost for NoopHost {
    fn sync_scroll_top(&mut self, _top: f64) {}
}

/// A requested change of offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollUpdate {
    /// Absolute offset.
    To(f64),
    /// Relative to the current offset.
    By(f64),
}

impl From<f64> for ScrollUpdate {
    fn from(top: f64) -> Self {
        Self::To(top)
    }
}

/// Which scroll edges the offset sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollEdges {
    pub at_top: bool,
    pub at_bottom: bool,
    pub at_left: bool,
    pub at_right: bool,
}

/// Clamp `value` into `[0, max]`. NaN becomes 0.
#[must_use]
pub fn keep_in_range(value: f64, max: f64) -> f64 {
    let max = max.max(0.0);
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

/// Owner of the vertical and horizontal offsets.
pub struct ScrollOffsetController {
    top: f64,
    left: f64,
    content_height: f64,
    viewport_height: f64,
    scroll_width: Option<f64>,
    viewport_width: f64,
    host: Box<dyn ScrollHost>,
}

impl std::fmt::Debug for ScrollOffsetController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollOffsetController")
            .field("top", &self.top)
            .field("left", &self.left)
            .field("content_height", &self.content_height)
            .field("viewport_height", &self.viewport_height)
            .finish_non_exhaustive()
    }
}

impl Default for ScrollOffsetController {
    fn default() -> Self {
        Self::new(Box::new(NoopHost))
    }
}

impl ScrollOffsetController {
    #[must_use]
    pub fn new(host: Box<dyn ScrollHost>) -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            content_height: 0.0,
            viewport_height: 0.0,
            scroll_width: None,
            viewport_width: 0.0,
            host,
        }
    }

    /// Replace the host sink.
    pub fn set_host(&mut self, host: Box<dyn ScrollHost>) {
        self.host = host;
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.top
    }

    #[must_use]
    pub fn scroll_left(&self) -> f64 {
        self.left
    }

    #[must_use]
    pub fn info(&self) -> ScrollInfo {
        ScrollInfo::new(self.left, self.top)
    }

    /// Update the vertical extent. Does not move the offset; call
    /// [`Self::reclamp`] afterwards if the span may have shrunk.
    pub fn set_extent(&mut self, content_height: f64, viewport_height: f64) {
        self.content_height = content_height.max(0.0);
        self.viewport_height = viewport_height.max(0.0);
    }

    /// Update the horizontal extent. `None` disables horizontal scrolling.
    pub fn set_horizontal_extent(&mut self, scroll_width: Option<f64>, viewport_width: f64) {
        self.scroll_width = scroll_width;
        self.viewport_width = viewport_width.max(0.0);
    }

    /// Largest valid vertical offset.
    #[must_use]
    pub fn max_scroll_top(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Largest valid horizontal offset.
    #[must_use]
    pub fn max_scroll_left(&self) -> f64 {
        self.scroll_width
            .map_or(0.0, |w| (w - self.viewport_width).max(0.0))
    }

    /// Whether horizontal scrolling has anywhere to go.
    #[must_use]
    pub fn horizontal_enabled(&self) -> bool {
        self.max_scroll_left() > 0.0
    }

    #[must_use]
    pub fn edges(&self) -> ScrollEdges {
        ScrollEdges {
            at_top: self.top <= 0.0,
            at_bottom: self.top >= self.max_scroll_top(),
            at_left: self.left <= 0.0,
            at_right: self.left >= self.max_scroll_left(),
        }
    }

    /// Clamp and commit a vertical offset. Returns the new offset if it
    /// changed; the host is only written on change.
    pub fn set_scroll_top(&mut self, update: impl Into<ScrollUpdate>) -> Option<f64> {
        let target = match update.into() {
            ScrollUpdate::To(top) => top,
            ScrollUpdate::By(delta) => self.top + delta,
        };
        self.commit_top(target)
    }

    /// Clamp and commit the result of `f(current)`.
    pub fn set_scroll_top_with(&mut self, f: impl FnOnce(f64) -> f64) -> Option<f64> {
        let target = f(self.top);
        self.commit_top(target)
    }

    /// Re-clamp the current offset against the current extent.
    pub fn reclamp(&mut self) -> Option<f64> {
        self.commit_top(self.top)
    }

    /// Clamp and commit a horizontal offset.
    pub fn set_scroll_left(&mut self, update: impl Into<ScrollUpdate>) -> Option<f64> {
        let target = match update.into() {
            ScrollUpdate::To(left) => left,
            ScrollUpdate::By(delta) => self.left + delta,
        };
        let left = keep_in_range(target, self.max_scroll_left());
        if left == self.left {
            return None;
        }
        self.left = left;
        self.host.sync_scroll_left(left);
        Some(left)
    }

    fn commit_top(&mut self, target: f64) -> Option<f64> {
        let top = keep_in_range(target, self.max_scroll_top());
        if top == self.top {
            return None;
        }
        self.top = top;
        self.host.sync_scroll_top(top);
        Some(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<f64>>>);

    impl ScrollHost for Recorder {
        fn sync_scroll_top(&mut self, top: f64) {
            self.0.borrow_mut().push(top);
        }
    }

    fn controller(total: f64, viewport: f64) -> (ScrollOffsetController, Recorder) {
        let rec = Recorder::default();
        let mut c = ScrollOffsetController::new(Box::new(rec.clone()));
        c.set_extent(total, viewport);
        (c, rec)
    }

    #[test]
    fn clamps_into_span() {
        let (mut c, _) = controller(1000.0, 200.0);
        assert_eq!(c.set_scroll_top(5000.0), Some(800.0));
        assert_eq!(c.set_scroll_top(-20.0), Some(0.0));
        assert_eq!(c.max_scroll_top(), 800.0);
    }

    #[test]
    fn short_content_pins_to_zero() {
        let (mut c, rec) = controller(100.0, 200.0);
        assert_eq!(c.set_scroll_top(50.0), None);
        assert_eq!(c.scroll_top(), 0.0);
        assert!(rec.0.borrow().is_empty());
    }

    #[test]
    fn unchanged_value_does_not_reach_host() {
        let (mut c, rec) = controller(1000.0, 200.0);
        c.set_scroll_top(100.0);
        c.set_scroll_top(100.0);
        c.set_scroll_top(ScrollUpdate::By(0.0));
        assert_eq!(*rec.0.borrow(), vec![100.0]);
    }

    #[test]
    fn relative_and_updater_forms() {
        let (mut c, _) = controller(1000.0, 200.0);
        c.set_scroll_top(ScrollUpdate::By(30.0));
        c.set_scroll_top(ScrollUpdate::By(-10.0));
        assert_eq!(c.scroll_top(), 20.0);
        c.set_scroll_top_with(|t| t * 3.0);
        assert_eq!(c.scroll_top(), 60.0);
    }

    #[test]
    fn nan_becomes_zero() {
        let (mut c, _) = controller(1000.0, 200.0);
        c.set_scroll_top(100.0);
        assert_eq!(c.set_scroll_top(f64::NAN), Some(0.0));
    }

    #[test]
    fn reclamp_after_shrink() {
        let (mut c, _) = controller(1000.0, 200.0);
        c.set_scroll_top(800.0);
        c.set_extent(500.0, 200.0);
        assert_eq!(c.reclamp(), Some(300.0));
        assert_eq!(c.reclamp(), None);
    }

    #[test]
    fn edges_track_offset() {
        let (mut c, _) = controller(1000.0, 200.0);
        assert!(c.edges().at_top);
        assert!(!c.edges().at_bottom);
        c.set_scroll_top(800.0);
        assert!(c.edges().at_bottom);
        assert!(!c.edges().at_top);
    }

    #[test]
    fn horizontal_needs_scroll_width() {
        let (mut c, _) = controller(1000.0, 200.0);
        assert!(!c.horizontal_enabled());
        assert_eq!(c.set_scroll_left(40.0), None);

        c.set_horizontal_extent(Some(600.0), 400.0);
        assert!(c.horizontal_enabled());
        assert_eq!(c.set_scroll_left(ScrollUpdate::By(500.0)), Some(200.0));
        assert!(c.edges().at_right);
        assert_eq!(c.info(), ScrollInfo::new(200.0, 0.0));
    }
}
