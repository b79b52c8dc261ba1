#![forbid(unsafe_code)]

//! Convergent scroll-to-item.
//!
//! Scrolling to row `i` needs the heights of every row above it, and most
//! of them have never been rendered. So the request runs as a short series
//! of frame-spaced iterations:
//!
//! 1. estimate the row's top and bottom from cached heights (fallback for
//!    the rest) and scroll there;
//! 2. let the host render and measure the rows that became visible;
//! 3. repeat while the computed target keeps moving and the rows that
//!    decide the final position are still unmeasured.
//!
//! A target that no longer moves is a fixed point even if some rows were
//! never measured (the host may not measure at all). A hard cap
//! ([`MAX_TIMES`] by default) bounds the loop when heights keep changing;
//! the last position stands and a warning is logged if dev warnings are on.
//!
//! A new request replaces one in flight.

use crate::controller::ScrollOffsetController;
use crate::height_cache::HeightCache;
use crate::task::EngineTask;
use std::fmt;
use vscroll_core::ItemKey;
use vscroll_core::logging::TARGET;
use vscroll_runtime::{Scheduler, TaskId};

/// Default iteration cap.
pub const MAX_TIMES: u32 = 10;

/// Where the target row should land in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollAlign {
    /// Row top at viewport top (plus offset).
    Top,
    /// Row bottom at viewport bottom (minus offset).
    Bottom,
    /// Only scroll if the row is out of view, to the nearer edge.
    #[default]
    Auto,
}

/// Row identified by index or key.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemTarget {
    Index(usize),
    Key(ItemKey),
}

/// A scroll-to-row request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollToItem {
    pub target: ItemTarget,
    pub align: ScrollAlign,
    /// Pixel gap kept between the row and the aligned edge.
    pub offset: f64,
}

impl ScrollToItem {
    #[must_use]
    pub fn index(index: usize) -> Self {
        Self {
            target: ItemTarget::Index(index),
            align: ScrollAlign::Auto,
            offset: 0.0,
        }
    }

    #[must_use]
    pub fn key(key: impl Into<ItemKey>) -> Self {
        Self {
            target: ItemTarget::Key(key.into()),
            align: ScrollAlign::Auto,
            offset: 0.0,
        }
    }

    #[must_use]
    pub fn with_align(mut self, align: ScrollAlign) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

/// Argument of `VirtualList::scroll_to`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    /// Absolute vertical offset.
    Top(f64),
    /// Either or both offsets.
    Position { left: Option<f64>, top: Option<f64> },
    /// A row.
    Item(ScrollToItem),
    /// No movement; just show the scrollbar.
    Flash,
}

impl From<f64> for ScrollTarget {
    fn from(top: f64) -> Self {
        Self::Top(top)
    }
}

impl From<ScrollToItem> for ScrollTarget {
    fn from(item: ScrollToItem) -> Self {
        Self::Item(item)
    }
}

/// Failure of a scroll-to request.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollToError {
    /// No row has this key.
    UnknownKey(ItemKey),
}

impl fmt::Display for ScrollToError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "scroll_to: no item with key {key}"),
        }
    }
}

impl std::error::Error for ScrollToError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy)]
struct SyncState {
    times: u32,
    index: usize,
    offset: f64,
    origin_align: ScrollAlign,
    /// Edge chosen by an `Auto` request once the row was found out of view.
    target_align: Option<Edge>,
    last_top: Option<f64>,
}

impl SyncState {
    fn align(&self) -> ScrollAlign {
        match self.target_align {
            Some(Edge::Top) => ScrollAlign::Top,
            Some(Edge::Bottom) => ScrollAlign::Bottom,
            None => self.origin_align,
        }
    }
}

/// Data an iteration reads.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub keys: &'a [ItemKey],
    pub heights: &'a HeightCache,
    pub item_height: f64,
    pub viewport_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// No request in flight.
    Idle,
    /// Another iteration is scheduled.
    Continue,
    /// Done; the row is where it should be.
    Settled,
    /// Gave up at the iteration cap.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub status: StepStatus,
    /// New offset, if the iteration moved it.
    pub scrolled: Option<f64>,
}

/// The convergent scroll-to state machine.
#[derive(Debug)]
pub struct ConvergentScrollTo {
    state: Option<SyncState>,
    task: Option<TaskId>,
    max_times: u32,
    dev_warnings: bool,
    iterations: u32,
}

impl Default for ConvergentScrollTo {
    fn default() -> Self {
        Self::new(MAX_TIMES, cfg!(debug_assertions))
    }
}

impl ConvergentScrollTo {
    #[must_use]
    pub fn new(max_times: u32, dev_warnings: bool) -> Self {
        Self {
            state: None,
            task: None,
            max_times: max_times.max(1),
            dev_warnings,
            iterations: 0,
        }
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_converging(&self) -> bool {
        self.state.is_some()
    }

    /// Iterations run by the current (or last) request.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Begin a request for row `index`. The first iteration runs on the next
    /// frame.
    pub fn start(
        &mut self,
        index: usize,
        align: ScrollAlign,
        offset: f64,
        sched: &mut Scheduler<EngineTask>,
    ) {
        self.cancel(sched);
        self.state = Some(SyncState {
            times: 0,
            index,
            offset,
            origin_align: align,
            target_align: None,
            last_top: None,
        });
        self.iterations = 0;
        self.task = Some(sched.request_frame(EngineTask::ScrollToStep));
    }

    /// Drop the request in flight, if any.
    pub fn cancel(&mut self, sched: &mut Scheduler<EngineTask>) {
        if let Some(id) = self.task.take() {
            sched.cancel(id);
        }
        self.state = None;
    }

    /// Run one iteration against fresh data.
    pub fn step(
        &mut self,
        ctx: StepContext<'_>,
        controller: &mut ScrollOffsetController,
        sched: &mut Scheduler<EngineTask>,
    ) -> StepOutcome {
        self.task = None;
        let Some(mut state) = self.state.take() else {
            return StepOutcome {
                status: StepStatus::Idle,
                scrolled: None,
            };
        };

        if state.times >= self.max_times {
            if self.dev_warnings {
                tracing::warn!(
                    target: TARGET,
                    index = state.index,
                    limit = self.max_times,
                    "scroll_to reached its iteration limit before heights settled"
                );
            }
            return StepOutcome {
                status: StepStatus::Exhausted,
                scrolled: None,
            };
        }

        if ctx.keys.is_empty() || ctx.viewport_height <= 0.0 {
            return StepOutcome {
                status: StepStatus::Settled,
                scrolled: None,
            };
        }

        let _span = tracing::debug_span!(
            target: TARGET,
            "scroll_to_step",
            index = state.index,
            times = state.times
        )
        .entered();
        self.iterations += 1;

        let height = ctx.viewport_height;
        let max_len = state.index.min(ctx.keys.len() - 1);

        let mut item_top = 0.0;
        let mut item_bottom = 0.0;
        for key in &ctx.keys[..=max_len] {
            item_top = item_bottom;
            item_bottom = item_top + ctx.heights.height_or(key, ctx.item_height);
        }

        // Auto picks the nearer edge once the row is seen out of view.
        if state.align() == ScrollAlign::Auto {
            let scroll_top = controller.scroll_top();
            if item_top < scroll_top {
                state.target_align = Some(Edge::Top);
            } else if item_bottom > scroll_top + height {
                state.target_align = Some(Edge::Bottom);
            }
        }
        let align = state.align();

        // Rows between the target and the aligned edge must be measured for
        // the position to be final.
        let mut unmeasured = false;
        let mut left = match align {
            ScrollAlign::Top => state.offset,
            ScrollAlign::Bottom | ScrollAlign::Auto => height - state.offset,
        };
        for key in ctx.keys[..=max_len].iter().rev() {
            match ctx.heights.get(key) {
                None => {
                    unmeasured = true;
                    break;
                }
                Some(h) => {
                    left -= h;
                    if left <= 0.0 {
                        break;
                    }
                }
            }
        }

        let target_top = match align {
            ScrollAlign::Top => Some(item_top - state.offset),
            ScrollAlign::Bottom => Some(item_bottom - height + state.offset),
            ScrollAlign::Auto => None,
        };

        let scrolled = target_top.and_then(|top| controller.set_scroll_top(top));
        // The first iteration always gets a verification round. After that
        // the request is done once the target stops moving or every row
        // that decides it is measured.
        let moved = target_top != state.last_top;
        if state.times == 0 || (unmeasured && moved) {
            state.times += 1;
            state.last_top = target_top;
            self.state = Some(state);
            self.task = Some(sched.request_frame(EngineTask::ScrollToStep));
            StepOutcome {
                status: StepStatus::Continue,
                scrolled,
            }
        } else {
            tracing::debug!(
                target: TARGET,
                index = state.index,
                iterations = self.iterations,
                "scroll_to settled"
            );
            StepOutcome {
                status: StepStatus::Settled,
                scrolled,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<ItemKey> {
        (0..n).map(ItemKey::from).collect()
    }

    fn ctx<'a>(keys: &'a [ItemKey], heights: &'a HeightCache) -> StepContext<'a> {
        StepContext {
            keys,
            heights,
            item_height: 20.0,
            viewport_height: 200.0,
        }
    }

    fn controller(total: f64) -> ScrollOffsetController {
        let mut c = ScrollOffsetController::default();
        c.set_extent(total, 200.0);
        c
    }

    fn measured(keys: &[ItemKey], h: f64) -> HeightCache {
        let mut cache = HeightCache::new();
        for k in keys {
            cache.set(k.clone(), h);
        }
        cache
    }

    #[test]
    fn idle_without_request() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::default();
        let k = keys(10);
        let cache = HeightCache::new();
        let out = s.step(ctx(&k, &cache), &mut controller(200.0), &mut sched);
        assert_eq!(out.status, StepStatus::Idle);
    }

    #[test]
    fn top_align_with_measured_rows_settles_in_two() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::default();
        let k = keys(100);
        let cache = measured(&k, 20.0);
        let mut c = controller(2000.0);

        s.start(50, ScrollAlign::Top, 0.0, &mut sched);
        assert!(s.is_converging());
        assert_eq!(sched.next_frame().as_slice(), &[EngineTask::ScrollToStep]);

        let first = s.step(ctx(&k, &cache), &mut c, &mut sched);
        assert_eq!(first.status, StepStatus::Continue);
        assert_eq!(first.scrolled, Some(1000.0));

        sched.next_frame();
        let second = s.step(ctx(&k, &cache), &mut c, &mut sched);
        assert_eq!(second.status, StepStatus::Settled);
        assert_eq!(second.scrolled, None);
        assert!(!s.is_converging());
        assert_eq!(s.iterations(), 2);
    }

    #[test]
    fn bottom_align_with_offset() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::default();
        let k = keys(100);
        let cache = measured(&k, 20.0);
        let mut c = controller(2000.0);

        s.start(50, ScrollAlign::Bottom, 10.0, &mut sched);
        let out = s.step(ctx(&k, &cache), &mut c, &mut sched);
        // row 50 bottom is 1020
        assert_eq!(out.scrolled, Some(1020.0 - 200.0 + 10.0));
    }

    #[test]
    fn auto_does_not_move_visible_row() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::default();
        let k = keys(100);
        let cache = measured(&k, 20.0);
        let mut c = controller(2000.0);

        s.start(3, ScrollAlign::Auto, 0.0, &mut sched);
        let a = s.step(ctx(&k, &cache), &mut c, &mut sched);
        assert_eq!(a.scrolled, None);
        let b = s.step(ctx(&k, &cache), &mut c, &mut sched);
        assert_eq!(b.status, StepStatus::Settled);
        assert_eq!(c.scroll_top(), 0.0);
    }

    #[test]
    fn auto_picks_nearer_edge() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::default();
        let k = keys(100);
        let cache = measured(&k, 20.0);
        let mut c = controller(2000.0);

        s.start(40, ScrollAlign::Auto, 0.0, &mut sched);
        let out = s.step(ctx(&k, &cache), &mut c, &mut sched);
        // row 40 ends at 820, aligned to the bottom
        assert_eq!(out.scrolled, Some(620.0));
        let out = s.step(ctx(&k, &cache), &mut c, &mut sched);
        assert_eq!(out.status, StepStatus::Settled);
        assert_eq!(c.scroll_top(), 620.0);

        c.set_scroll_top(1500.0);
        s.start(2, ScrollAlign::Auto, 0.0, &mut sched);
        let out = s.step(ctx(&k, &cache), &mut c, &mut sched);
        assert_eq!(out.scrolled, Some(40.0));
    }

    #[test]
    fn unmeasured_rows_iterate_while_target_moves() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::default();
        let k = keys(100);
        let mut cache = HeightCache::new();
        let mut c = controller(4000.0);

        s.start(50, ScrollAlign::Top, 0.0, &mut sched);
        s.step(ctx(&k, &cache), &mut c, &mut sched);
        cache.set(k[0].clone(), 45.0);
        let out = s.step(ctx(&k, &cache), &mut c, &mut sched);
        assert_eq!(out.status, StepStatus::Continue);
        assert_eq!(out.scrolled, Some(1025.0));
    }

    #[test]
    fn fixed_point_settles_with_unmeasured_rows() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::default();
        let k = keys(100);
        let cache = HeightCache::new();
        let mut c = controller(2000.0);

        s.start(50, ScrollAlign::Top, 0.0, &mut sched);
        assert_eq!(
            s.step(ctx(&k, &cache), &mut c, &mut sched).status,
            StepStatus::Continue
        );
        let out = s.step(ctx(&k, &cache), &mut c, &mut sched);
        assert_eq!(out.status, StepStatus::Settled);
        assert_eq!(s.iterations(), 2);
        assert_eq!(c.scroll_top(), 1000.0);
    }

    #[test]
    fn exhausts_at_the_cap() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::new(3, false);
        let k = keys(100);
        let mut cache = HeightCache::new();
        let mut c = controller(4000.0);

        s.start(50, ScrollAlign::Top, 0.0, &mut sched);
        let mut last = StepStatus::Continue;
        let mut steps = 0;
        while last == StepStatus::Continue {
            steps += 1;
            // row 0 keeps growing, so the target never stops moving
            cache.set(k[0].clone(), 20.0 + f64::from(steps));
            last = s.step(ctx(&k, &cache), &mut c, &mut sched).status;
        }
        assert_eq!(last, StepStatus::Exhausted);
        assert_eq!(steps, 4);
        assert_eq!(s.iterations(), 3);
        assert!(!s.is_converging());
        // best-effort position stands
        assert_eq!(c.scroll_top(), 1003.0);
    }

    #[test]
    fn new_request_supersedes() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::default();
        s.start(10, ScrollAlign::Top, 0.0, &mut sched);
        s.start(20, ScrollAlign::Top, 0.0, &mut sched);
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn index_past_end_targets_last_row() {
        let mut sched = Scheduler::new();
        let mut s = ConvergentScrollTo::default();
        let k = keys(100);
        let cache = measured(&k, 20.0);
        let mut c = controller(2000.0);
        s.start(5000, ScrollAlign::Bottom, 0.0, &mut sched);
        let out = s.step(ctx(&k, &cache), &mut c, &mut sched);
        assert_eq!(out.scrolled, Some(1800.0));
    }

    #[test]
    fn error_display_names_key() {
        let err = ScrollToError::UnknownKey(ItemKey::from("row-9"));
        assert!(err.to_string().contains("row-9"));
    }
}
