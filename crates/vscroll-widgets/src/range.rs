#![forbid(unsafe_code)]

//! Visible-range calculation for variable-height rows.
//!
//! Given the row keys, the [`HeightCache`], a fallback item height, the
//! scroll offset, and the viewport height, the range pass answers: which
//! contiguous rows must be rendered, where does the first one sit, and how
//! tall is the whole list.
//!
//! # Core Types
//!
//! - [`Virtualization`] - whether windowing applies at all
//! - [`RenderWindow`] - the answer: rows `start..=end`, first-row offset, total
//! - [`RangeCalculator`] - the linear pass
//! - [`RangeMemo`] - caches the last window against its inputs
//!
//! # Algorithm
//!
//! One walk over the rows accumulates `top`/`bottom` per row (cached height or
//! the fallback). The first row whose bottom reaches `scroll_top` is the
//! start; the first row whose bottom passes `scroll_top + viewport` is the
//! end, then one more row is added as overscan. The walk always finishes so
//! the total height comes out of the same pass.
//!
//! Cost is O(n) per computation. Memoization keeps that to one pass per
//! change of offset, data, cache, or viewport.
//!
//! # Invariants
//!
//! 1. For a fixed list, `start` is non-decreasing in `scroll_top`.
//! 2. For `scroll_top` in `[0, total - viewport]` the window covers
//!    `[scroll_top, scroll_top + viewport]`.
//! 3. `start_offset` equals the sum of heights before `start`.

use crate::height_cache::HeightCache;
use std::ops::Range;
use vscroll_core::ItemKey;
use vscroll_core::logging::TARGET;

/// Whether the list is windowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Virtualization {
    /// No viewport height or item height configured, or windowing turned
    /// off. Every row renders.
    Disabled,
    /// Configured, but the estimated content fits the viewport. Every row
    /// renders and the input handlers stay out of the way.
    Inactive,
    /// Windowing in effect.
    Active,
}

impl Virtualization {
    /// Decide the mode from configuration and row count.
    ///
    /// The estimate uses the fallback height only, so the mode does not
    /// flip back and forth as measurements arrive. Width plays no part:
    /// windowing is vertical only.
    #[must_use]
    pub fn resolve(
        enabled: bool,
        viewport_height: Option<f64>,
        item_height: Option<f64>,
        len: usize,
    ) -> Self {
        match (enabled, viewport_height, item_height) {
            (true, Some(vh), Some(ih)) if vh > 0.0 && ih > 0.0 => {
                if ih * len as f64 > vh {
                    Self::Active
                } else {
                    Self::Inactive
                }
            }
            _ => Self::Disabled,
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Windowing is configured, whether or not it is in effect.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// Output of the range pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderWindow {
    /// First rendered row.
    pub start: usize,
    /// Last rendered row, inclusive.
    pub end: usize,
    /// Pixel offset of row `start` from the top of the content.
    pub start_offset: f64,
    /// Total content height (measured plus estimated).
    pub total_height: f64,
    /// Row count the window was computed for.
    pub item_count: usize,
    pub mode: Virtualization,
}

impl RenderWindow {
    /// The window of an empty list.
    #[must_use]
    pub const fn empty(mode: Virtualization) -> Self {
        Self {
            start: 0,
            end: 0,
            start_offset: 0.0,
            total_height: 0.0,
            item_count: 0,
            mode,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Rendered rows as a half-open range.
    #[must_use]
    pub fn indices(&self) -> Range<usize> {
        if self.is_empty() {
            0..0
        } else {
            self.start..self.end + 1
        }
    }

    /// Number of rendered rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices().len()
    }
}

/// Inputs to one range computation.
#[derive(Debug, Clone, Copy)]
pub struct RangeInput<'a> {
    pub keys: &'a [ItemKey],
    pub heights: &'a HeightCache,
    pub item_height: f64,
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub mode: Virtualization,
}

/// The linear range pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeCalculator;

impl RangeCalculator {
    /// Compute the render window.
    ///
    /// Outside [`Virtualization::Active`] the window is the whole list; the
    /// total still comes from cached heights (fallback for unmeasured rows)
    /// so the controller can clamp against it.
    #[must_use]
    pub fn compute(input: RangeInput<'_>) -> RenderWindow {
        let len = input.keys.len();
        if len == 0 {
            return RenderWindow::empty(input.mode);
        }
        let last = len - 1;

        if !input.mode.is_active() {
            return RenderWindow {
                start: 0,
                end: last,
                start_offset: 0.0,
                total_height: total_height(input.keys, input.heights, input.item_height),
                item_count: len,
                mode: input.mode,
            };
        }

        let view_bottom = input.scroll_top + input.viewport_height;
        let mut top = 0.0;
        let mut start: Option<(usize, f64)> = None;
        let mut end: Option<usize> = None;

        for (i, key) in input.keys.iter().enumerate() {
            let bottom = top + input.heights.height_or(key, input.item_height);
            if start.is_none() && bottom >= input.scroll_top {
                start = Some((i, top));
            }
            if start.is_some() && end.is_none() && bottom > view_bottom {
                end = Some(i);
            }
            top = bottom;
        }

        // `scroll_top` past the content: fall back to a top-anchored window
        // sized from the estimate.
        let (start, start_offset, end) = match start {
            Some((s, offset)) => (s, offset, end.unwrap_or(last)),
            None => {
                let fill = (input.viewport_height / input.item_height).ceil() as usize;
                (0, 0.0, fill)
            }
        };
        let end = end.saturating_add(1).min(last);

        RenderWindow {
            start,
            end: end.max(start),
            start_offset,
            total_height: top,
            item_count: len,
            mode: input.mode,
        }
    }
}

/// Sum of cached heights, using `fallback` for unmeasured rows.
#[must_use]
pub fn total_height(keys: &[ItemKey], heights: &HeightCache, fallback: f64) -> f64 {
    keys.iter().map(|k| heights.height_or(k, fallback)).sum()
}

// ============================================================================
// Memoization
// ============================================================================

/// Everything a window depends on, reduced to comparable scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeDeps {
    pub scroll_top: u64,
    pub viewport_height: u64,
    pub item_height: u64,
    pub data_version: u64,
    pub cache_version: u64,
    pub mode: Virtualization,
}

impl RangeDeps {
    /// Build from floats; equality is bitwise so `0.0` and `-0.0` differ,
    /// which only costs a spurious recomputation.
    #[must_use]
    pub fn new(input: &RangeInput<'_>, data_version: u64) -> Self {
        Self {
            scroll_top: input.scroll_top.to_bits(),
            viewport_height: input.viewport_height.to_bits(),
            item_height: input.item_height.to_bits(),
            data_version,
            cache_version: input.heights.version(),
            mode: input.mode,
        }
    }
}

/// Caches the last [`RenderWindow`] against its [`RangeDeps`].
#[derive(Debug, Clone, Default)]
pub struct RangeMemo {
    last: Option<(RangeDeps, RenderWindow)>,
    passes: u64,
}

impl RangeMemo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached window if the inputs are unchanged, otherwise run
    /// the pass and cache it.
    pub fn window(&mut self, input: RangeInput<'_>, data_version: u64) -> RenderWindow {
        let deps = RangeDeps::new(&input, data_version);
        if let Some((cached, window)) = self.last
            && cached == deps
        {
            return window;
        }
        let _span = tracing::debug_span!(
            target: TARGET,
            "range_pass",
            rows = input.keys.len(),
            scroll_top = input.scroll_top
        )
        .entered();
        let window = RangeCalculator::compute(input);
        self.passes += 1;
        tracing::trace!(
            target: TARGET,
            start = window.start,
            end = window.end,
            total = window.total_height,
            "range pass"
        );
        self.last = Some((deps, window));
        window
    }

    /// Last computed window, if any.
    #[must_use]
    pub fn last_window(&self) -> Option<RenderWindow> {
        self.last.map(|(_, w)| w)
    }

    /// How many full passes have run.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
