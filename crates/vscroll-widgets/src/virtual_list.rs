#![forbid(unsafe_code)]

//! The virtual list engine.
//!
//! [`VirtualList`] owns the rows, their keys, the height cache, the scroll
//! offset, and every input state machine. The host drives it:
//!
//! 1. render the rows of [`VirtualList::window`] at `start_offset`;
//! 2. report their measured heights with [`VirtualList::report_height`];
//! 3. forward wheel / touch / mouse / native scroll events;
//! 4. pump deferred work: [`VirtualList::run_microtasks`] after each event,
//!    [`VirtualList::run_frame`] once per animation frame, and
//!    [`VirtualList::advance_to`] as time passes.
//!
//! # Event flow
//!
//! ```text
//!  wheel ──► FrameWheel ──(frame)──┐
//!  touch ──► TouchMove ──(16 ms)───┤
//!  drag  ──► DragAutoScroll ─(frame)┤
//!  thumb ──► ScrollbarState ───────┼──► ScrollOffsetController ──► host
//!  native scroll ──────────────────┤          │
//!  scroll_to ──► ConvergentScrollTo┘          ▼
//!                                       RangeMemo ──► RenderWindow
//! ```
//!
//! # Failure Modes
//!
//! - **Duplicate keys**: rows sharing a key share a cached height. Logged
//!   with `tracing::warn!` when dev warnings are on; not rejected.
//! - **Unknown key in `scroll_to`**: returns [`ScrollToError::UnknownKey`].
//! - **Heights that never settle**: `scroll_to` stops at its iteration cap
//!   and leaves the offset at the last estimate.

use crate::config::{ContainerSizing, VirtualListConfig};
use crate::controller::{ScrollEdges, ScrollHost, ScrollOffsetController, ScrollUpdate};
use crate::height_cache::HeightCache;
use crate::input::{DragAutoScroll, FrameWheel, OriginScroll, TouchDelta, TouchMove, WheelAction};
use crate::list_diff::{ListDiff, find_list_diff, index_by_start_loc};
use crate::measure::{HeightCollector, HeightObserver};
use crate::outcome::{InputOutcome, MouseResult};
use crate::range::{RangeInput, RangeMemo, RenderWindow, Virtualization};
use crate::scroll_to::{ConvergentScrollTo, ItemTarget, ScrollTarget, ScrollToError, StepContext};
use crate::scrollbar::{ScrollbarState, ThumbGeometry};
use crate::task::EngineTask;
use rustc_hash::FxHashSet;
use std::time::Duration;
use vscroll_core::logging::TARGET;
use vscroll_core::{
    Axis, Bounds, ItemKey, KeyExtractor, MouseEvent, MouseEventKind, ScrollInfo, TouchEvent,
    WheelEvent,
};
use vscroll_runtime::{Clock, Observable, Scheduler, Subscription};

type VisibleChange<T> = Box<dyn FnMut(&[T], &[T])>;
type ScrollListener = Box<dyn FnMut(ScrollInfo)>;

/// Signature of the last reported visible slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisibleSig {
    start: usize,
    end: usize,
    len: usize,
    data_version: u64,
}

/// A windowed list over `T`.
pub struct VirtualList<T> {
    config: VirtualListConfig,
    items: Vec<T>,
    keys: Vec<ItemKey>,
    key_of: KeyExtractor<T>,
    data_version: u64,
    last_diff: Option<ListDiff>,

    heights: HeightCache,
    collector: HeightCollector,
    memo: RangeMemo,
    controller: ScrollOffsetController,
    scheduler: Scheduler<EngineTask>,

    origin: OriginScroll,
    wheel: FrameWheel,
    touch: TouchMove,
    drag: DragAutoScroll,
    scroll_to: ConvergentScrollTo,
    scrollbar: ScrollbarState,

    virtual_scroll: Observable<ScrollInfo>,
    scroll_listeners: Vec<ScrollListener>,
    visible_change: Option<VisibleChange<T>>,
    last_visible: Option<VisibleSig>,
}

impl<T> std::fmt::Debug for VirtualList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualList")
            .field("len", &self.items.len())
            .field("data_version", &self.data_version)
            .field("controller", &self.controller)
            .field("pending_tasks", &self.scheduler.pending())
            .finish_non_exhaustive()
    }
}

impl<T> VirtualList<T> {
    /// Create a list over `items`, keyed by `key_of`.
    #[must_use]
    pub fn new(config: VirtualListConfig, items: Vec<T>, key_of: KeyExtractor<T>) -> Self {
        if let Err(errors) = config.validate() {
            for error in &errors {
                tracing::warn!(target: TARGET, %error, "invalid list config");
            }
        }
        let keys = key_of.keys_of(&items);
        let mut controller = ScrollOffsetController::default();
        controller.set_horizontal_extent(config.scroll_width, config.width);
        let scroll_to = ConvergentScrollTo::new(config.scroll_to_retries, config.dev_warnings);

        let mut list = Self {
            config,
            items,
            keys,
            key_of,
            data_version: 0,
            last_diff: None,
            heights: HeightCache::new(),
            collector: HeightCollector::new(),
            memo: RangeMemo::new(),
            controller,
            scheduler: Scheduler::new(),
            origin: OriginScroll::new(),
            wheel: FrameWheel::new(),
            touch: TouchMove::new(),
            drag: DragAutoScroll::new(),
            scroll_to,
            scrollbar: ScrollbarState::new(),
            virtual_scroll: Observable::new(ScrollInfo::default()),
            scroll_listeners: Vec::new(),
            visible_change: None,
            last_visible: None,
        };
        list.warn_duplicate_keys();
        list.refresh();
        list
    }

    /// Route offset writes to the host's scroll container.
    #[must_use]
    pub fn with_host(mut self, host: Box<dyn ScrollHost>) -> Self {
        self.controller.set_host(host);
        self
    }

    /// Measure rows through `observer`. Support is checked once, here.
    #[must_use]
    pub fn with_height_observer(mut self, observer: Box<dyn HeightObserver>) -> Self {
        self.collector = HeightCollector::with_observer(observer);
        self
    }

    /// Called with `(visible, all)` whenever the rendered slice or the data
    /// changes. Fires on the next [`Self::window`] call after registration.
    #[must_use]
    pub fn on_visible_change(mut self, callback: impl FnMut(&[T], &[T]) + 'static) -> Self {
        self.visible_change = Some(Box::new(callback));
        self.last_visible = None;
        self
    }

    /// Called for every native scroll event, after the offset synced.
    #[must_use]
    pub fn on_scroll(mut self, callback: impl FnMut(ScrollInfo) + 'static) -> Self {
        self.scroll_listeners.push(Box::new(callback));
        self
    }

    /// Subscribe to offset changes made while windowing is active.
    pub fn subscribe_virtual_scroll(&self, callback: impl Fn(&ScrollInfo) + 'static) -> Subscription {
        self.virtual_scroll.subscribe(callback)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &VirtualListConfig {
        &self.config
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn keys(&self) -> &[ItemKey] {
        &self.keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bumps on every [`Self::set_items`].
    #[must_use]
    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    /// Diff computed by the last [`Self::set_items`].
    #[must_use]
    pub fn last_diff(&self) -> Option<ListDiff> {
        self.last_diff
    }

    #[must_use]
    pub fn heights(&self) -> &HeightCache {
        &self.heights
    }

    #[must_use]
    pub fn mode(&self) -> Virtualization {
        Virtualization::resolve(
            self.config.virtual_enabled,
            self.config.height,
            self.config.item_height,
            self.items.len(),
        )
    }

    #[must_use]
    pub fn container_sizing(&self) -> ContainerSizing {
        self.config.container_sizing()
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.controller.scroll_top()
    }

    #[must_use]
    pub fn scroll_left(&self) -> f64 {
        self.controller.scroll_left()
    }

    /// Current offsets.
    #[must_use]
    pub fn scroll_info(&self) -> ScrollInfo {
        self.controller.info()
    }

    #[must_use]
    pub fn is_scrollbar_visible(&self) -> bool {
        self.scrollbar.is_visible()
    }

    /// Whether a convergent `scroll_to` is in flight.
    #[must_use]
    pub fn is_converging(&self) -> bool {
        self.scroll_to.is_converging()
    }

    /// Iterations run by the current or last convergent `scroll_to`.
    #[must_use]
    pub fn scroll_to_iterations(&self) -> u32 {
        self.scroll_to.iterations()
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Earliest pending timer, so the host knows when to call back.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Whether any deferred work is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    // ========================================================================
    // Data and layout
    // ========================================================================

    /// Replace the rows. Returns where the new keys diverge from the old.
    pub fn set_items(&mut self, items: Vec<T>) -> Option<ListDiff> {
        let keys = self.key_of.keys_of(&items);
        let diff = find_list_diff(&self.keys, &keys);
        tracing::debug!(
            target: TARGET,
            old_len = self.keys.len(),
            new_len = keys.len(),
            diff_index = diff.map(|d| d.index),
            "items replaced"
        );
        self.items = items;
        self.keys = keys;
        self.data_version += 1;
        self.last_diff = diff;
        self.warn_duplicate_keys();
        self.refresh();
        diff
    }

    /// Viewport resized.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.config.height = Some(height);
        self.refresh();
    }

    /// Content or viewport width changed. `None` disables horizontal
    /// scrolling.
    pub fn set_horizontal_extent(&mut self, scroll_width: Option<f64>, width: f64) {
        self.config.scroll_width = scroll_width;
        self.config.width = width;
        self.controller.set_horizontal_extent(scroll_width, width);
        if self.controller.set_scroll_left(self.controller.scroll_left()).is_some() {
            self.publish_scroll();
        }
    }

    /// The rows to render.
    pub fn window(&mut self) -> RenderWindow {
        self.refresh()
    }

    /// The rows to render, as a slice.
    pub fn visible_items(&mut self) -> &[T] {
        let window = self.refresh();
        &self.items[window.indices()]
    }

    /// Thumb geometry for the current content and viewport.
    pub fn thumb_geometry(&mut self) -> ThumbGeometry {
        let window = self.refresh();
        ThumbGeometry::new(
            window.total_height,
            self.viewport_height(),
            self.config.min_thumb_size,
        )
    }

    // ========================================================================
    // Measurement
    // ========================================================================

    /// A rendered row was measured. Applied on the next microtask.
    pub fn report_height(&mut self, key: impl Into<ItemKey>, height: f64) -> bool {
        self.collector.report(key.into(), height, &mut self.scheduler)
    }

    pub fn mount_item(&mut self, key: &ItemKey) {
        self.collector.mount(key);
    }

    pub fn unmount_item(&mut self, key: &ItemKey) {
        self.collector.unmount(key);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Wheel event. When the outcome is not consumed the host must let the
    /// native scroll proceed.
    pub fn handle_wheel(&mut self, event: &mut WheelEvent) -> InputOutcome {
        if !self.mode().is_active() {
            return InputOutcome::Ignored;
        }
        let edges = self.edges();
        let horizontal = self.controller.horizontal_enabled();
        match self
            .wheel
            .on_wheel(event, horizontal, &mut self.origin, edges, &mut self.scheduler)
        {
            WheelAction::Ignored => InputOutcome::Ignored,
            WheelAction::PassThrough => InputOutcome::PassThrough,
            WheelAction::Queued => InputOutcome::Consumed,
            WheelAction::Horizontal(delta) => {
                self.set_scroll_left(ScrollUpdate::By(delta));
                InputOutcome::Consumed
            }
        }
    }

    pub fn handle_touch_start(&mut self, event: &TouchEvent) {
        if self.mode().is_active() {
            self.touch.touch_start(event, &mut self.scheduler);
        }
    }

    pub fn handle_touch_move(&mut self, event: &mut TouchEvent) -> InputOutcome {
        if !self.mode().is_active() {
            return InputOutcome::Ignored;
        }
        let Some(delta) = self.touch.touch_move(event, &mut self.scheduler) else {
            return InputOutcome::Ignored;
        };
        if self.touch_passes_through(delta) {
            return InputOutcome::PassThrough;
        }
        if !event.mark_virtual_handled() {
            // an inner list owns this gesture, inertia included
            self.touch.stop_decay(&mut self.scheduler);
            return InputOutcome::Ignored;
        }
        self.push_touch_delta(delta);
        event.prevent_default();
        InputOutcome::Consumed
    }

    /// Finger lifted. Inertia keeps running.
    pub fn handle_touch_end(&mut self) {
        self.touch.touch_end();
    }

    /// Mouse event for drag-select auto-scroll. `bounds` is the container's
    /// vertical extent in page coordinates.
    pub fn handle_mouse(&mut self, event: &mut MouseEvent, bounds: Bounds) {
        if matches!(event.kind, MouseEventKind::Down(_)) && !self.mode().is_active() {
            return;
        }
        self.drag.handle(event, bounds, &mut self.scheduler);
    }

    /// Mouse event for the scrollbar thumb.
    pub fn handle_thumb_mouse(&mut self, event: &MouseEvent, on_thumb: bool) -> MouseResult {
        let geometry = self.thumb_geometry();
        let result =
            self.scrollbar
                .handle_mouse(event, on_thumb, geometry, self.controller.scroll_top());
        match result {
            MouseResult::Scrolled(top) => {
                self.sync_scroll_top(ScrollUpdate::To(top));
            }
            MouseResult::Captured => self.scrollbar.flash(&mut self.scheduler),
            MouseResult::Released | MouseResult::Ignored => {}
        }
        result
    }

    /// The host container scrolled natively (including the echo of our own
    /// writes, which is a no-op).
    pub fn handle_native_scroll(&mut self, top: f64) {
        if top != self.controller.scroll_top() {
            self.sync_scroll_top(ScrollUpdate::To(top));
        }
        let info = self.controller.info();
        for listener in &mut self.scroll_listeners {
            listener(info);
        }
    }

    // ========================================================================
    // Imperative scrolling
    // ========================================================================

    /// Scroll to an offset, a row, or just flash the scrollbar. Replaces a
    /// convergent request in flight.
    pub fn scroll_to(&mut self, target: impl Into<ScrollTarget>) -> Result<(), ScrollToError> {
        match target.into() {
            ScrollTarget::Flash => {
                self.scrollbar.flash(&mut self.scheduler);
            }
            ScrollTarget::Top(top) => {
                self.scroll_to.cancel(&mut self.scheduler);
                self.sync_scroll_top(ScrollUpdate::To(top));
            }
            ScrollTarget::Position { left, top } => {
                self.scroll_to.cancel(&mut self.scheduler);
                if let Some(left) = left {
                    self.set_scroll_left(ScrollUpdate::To(left));
                }
                if let Some(top) = top {
                    self.sync_scroll_top(ScrollUpdate::To(top));
                }
            }
            ScrollTarget::Item(item) => {
                let index = match item.target {
                    ItemTarget::Index(index) => index,
                    ItemTarget::Key(key) => match self.index_of_key(&key) {
                        Some(index) => index,
                        None => return Err(ScrollToError::UnknownKey(key)),
                    },
                };
                if self.items.is_empty() {
                    self.scroll_to.cancel(&mut self.scheduler);
                } else {
                    self.scroll_to
                        .start(index, item.align, item.offset, &mut self.scheduler);
                }
            }
        }
        Ok(())
    }

    /// Index of the row with `key`, searching outward from the current
    /// window start.
    #[must_use]
    pub fn index_of_key(&self, key: &ItemKey) -> Option<usize> {
        let last = self.keys.len().checked_sub(1)?;
        let start = self.memo.last_window().map_or(0, |w| w.start).min(last);
        (0..=last)
            .map(|step| index_by_start_loc(0, last, start, step))
            .find(|&i| self.keys[i] == *key)
    }

    /// Horizontal offset write.
    pub fn set_scroll_left(&mut self, update: impl Into<ScrollUpdate>) -> Option<f64> {
        let changed = self.controller.set_scroll_left(update);
        if changed.is_some() {
            self.publish_scroll();
        }
        changed
    }

    // ========================================================================
    // Driving deferred work
    // ========================================================================

    /// Drain the microtask queue. Returns how many tasks ran.
    pub fn run_microtasks(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.scheduler.next_microtask() {
            self.dispatch(task);
            ran += 1;
        }
        ran
    }

    /// Start an animation frame: run its tasks, then the microtasks they
    /// queued.
    pub fn run_frame(&mut self) {
        for task in self.scheduler.next_frame() {
            self.dispatch(task);
        }
        self.run_microtasks();
    }

    /// Fire every timer due by `now`, in deadline order.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some(task) = self.scheduler.pop_timer_until(now) {
            self.dispatch(task);
            self.run_microtasks();
        }
        self.scheduler.set_now(now);
    }

    pub fn advance_by(&mut self, dt: Duration) {
        self.advance_to(self.scheduler.now().saturating_add(dt));
    }

    /// Catch up with `clock` and run one frame.
    pub fn tick(&mut self, clock: &dyn Clock) {
        self.advance_to(clock.now());
        self.run_frame();
    }

    /// Cancel all deferred work and input state. Also runs on drop.
    pub fn teardown(&mut self) {
        self.wheel.cancel(&mut self.scheduler);
        self.touch.cancel(&mut self.scheduler);
        self.drag.cancel(&mut self.scheduler);
        self.scroll_to.cancel(&mut self.scheduler);
        self.scrollbar.cancel(&mut self.scheduler);
        self.collector.cancel(&mut self.scheduler);
        self.origin.release(&mut self.scheduler);
        self.scheduler.cancel_all();
    }

    fn dispatch(&mut self, task: EngineTask) {
        match task {
            EngineTask::FlushHeights => self.flush_heights(),
            EngineTask::WheelFlush => {
                let delta = self.wheel.take_pending();
                if delta != 0.0 {
                    self.sync_scroll_top(ScrollUpdate::By(delta));
                }
            }
            EngineTask::WheelAxisReset => self.wheel.reset_axis(),
            EngineTask::EdgeUnlock => self.origin.unlock(),
            EngineTask::TouchDecay => {
                if let Some(step) = self.touch.decay_step() {
                    let consumed = self.apply_touch_delta(step);
                    self.touch.continue_decay(consumed, &mut self.scheduler);
                }
            }
            EngineTask::DragScroll => {
                if let Some(offset) = self.drag.on_frame(&mut self.scheduler)
                    && offset != 0.0
                {
                    self.sync_scroll_top(ScrollUpdate::By(offset));
                }
            }
            EngineTask::ScrollToStep => self.scroll_to_step(),
            EngineTask::HideScrollbar => self.scrollbar.on_hide_timer(&mut self.scheduler),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn viewport_height(&self) -> f64 {
        self.config.height.unwrap_or(0.0)
    }

    fn compute_window(&mut self) -> RenderWindow {
        let mode = self.mode();
        let input = RangeInput {
            keys: &self.keys,
            heights: &self.heights,
            item_height: self.config.item_height.unwrap_or(0.0),
            scroll_top: self.controller.scroll_top(),
            viewport_height: self.config.height.unwrap_or(0.0),
            mode,
        };
        self.memo.window(input, self.data_version)
    }

    /// Recompute the window, update the scroll extent, and keep the offset
    /// in range. Fires the visible-change callback if the slice moved.
    fn refresh(&mut self) -> RenderWindow {
        let mut window = self.compute_window();
        self.controller
            .set_extent(window.total_height, self.viewport_height());
        if self.controller.reclamp().is_some() {
            self.publish_scroll();
            window = self.compute_window();
        }
        self.emit_visible_change(window);
        window
    }

    fn emit_visible_change(&mut self, window: RenderWindow) {
        let sig = VisibleSig {
            start: window.start,
            end: window.end,
            len: window.item_count,
            data_version: self.data_version,
        };
        if self.last_visible == Some(sig) {
            return;
        }
        self.last_visible = Some(sig);
        if let Some(callback) = self.visible_change.as_mut() {
            callback(&self.items[window.indices()], &self.items);
        }
    }

    fn edges(&mut self) -> ScrollEdges {
        self.refresh();
        self.controller.edges()
    }

    /// The one path for vertical offset changes.
    fn sync_scroll_top(&mut self, update: ScrollUpdate) -> Option<f64> {
        self.refresh();
        let changed = self.controller.set_scroll_top(update);
        if changed.is_some() {
            self.after_scroll();
        }
        changed
    }

    fn after_scroll(&mut self) {
        self.publish_scroll();
        if self.mode().is_active() {
            self.scrollbar.flash(&mut self.scheduler);
        }
        self.refresh();
    }

    fn publish_scroll(&mut self) {
        let info = self.controller.info();
        if self.mode().is_active() {
            self.virtual_scroll.set(info);
        } else {
            self.virtual_scroll.set_silently(info);
        }
    }

    /// Apply an inertia step. Returns `false` if the edge let it through.
    fn apply_touch_delta(&mut self, delta: TouchDelta) -> bool {
        if self.touch_passes_through(delta) {
            return false;
        }
        self.push_touch_delta(delta);
        true
    }

    fn touch_passes_through(&mut self, delta: TouchDelta) -> bool {
        if delta.axis == Axis::Horizontal && !self.controller.horizontal_enabled() {
            return true;
        }
        let edges = self.edges();
        self.origin
            .check(delta.axis, delta.delta, delta.smooth, edges, &mut self.scheduler)
    }

    fn push_touch_delta(&mut self, delta: TouchDelta) {
        match delta.axis {
            Axis::Vertical => self.wheel.push(delta.delta, &mut self.scheduler),
            Axis::Horizontal => {
                self.set_scroll_left(ScrollUpdate::By(delta.delta));
            }
        }
    }

    fn flush_heights(&mut self) {
        let rendered = self.memo.last_window();
        let changed = self.collector.flush(&mut self.heights);
        let correction = if changed > 0 {
            self.drift_correction(rendered)
        } else {
            None
        };
        self.heights.reset_record();
        match correction {
            Some(diff) => {
                tracing::trace!(target: TARGET, diff, "first visible row drift corrected");
                self.sync_scroll_top(ScrollUpdate::By(diff));
            }
            None => {
                self.refresh();
            }
        }
    }

    /// When the only new measurement is the first rendered row and that row
    /// starts above the viewport, shift the offset by its estimate error so
    /// the content under the viewport stays put.
    fn drift_correction(&self, rendered: Option<RenderWindow>) -> Option<f64> {
        let rendered = rendered.filter(|w| w.mode.is_active() && !w.is_empty())?;
        let item_height = self.config.item_height?;
        let (key, previous) = self.heights.single_record()?;
        if previous.is_some() || self.keys.get(rendered.start) != Some(key) {
            return None;
        }
        if rendered.start_offset >= self.controller.scroll_top() {
            return None;
        }
        let diff = self.heights.get(key)? - item_height;
        (diff != 0.0).then_some(diff)
    }

    fn scroll_to_step(&mut self) {
        // Measurements reported since the last frame must land first.
        self.run_microtasks();
        self.refresh();
        let ctx = StepContext {
            keys: &self.keys,
            heights: &self.heights,
            item_height: self.config.item_height.unwrap_or(0.0),
            viewport_height: self.config.height.unwrap_or(0.0),
        };
        let outcome = self
            .scroll_to
            .step(ctx, &mut self.controller, &mut self.scheduler);
        if outcome.scrolled.is_some() {
            self.after_scroll();
        }
    }

    fn warn_duplicate_keys(&self) {
        if !self.config.dev_warnings {
            return;
        }
        let mut seen = FxHashSet::default();
        if let Some(key) = self.keys.iter().find(|k| !seen.insert(*k)) {
            tracing::warn!(
                target: TARGET,
                %key,
                "duplicate item key; rows sharing a key share one cached height"
            );
        }
    }
}

impl<T> Drop for VirtualList<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}
