#![forbid(unsafe_code)]

//! End-to-end scenarios for the virtual list engine.
//!
//! Each test plays the host: it renders the current window, reports row
//! heights, forwards input events, and pumps microtasks, frames, and timers
//! the way a browser-like event loop would.

use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{Level, info};
use vscroll_core::{
    Bounds, ItemKey, KeyExtractor, MouseButton, MouseEvent, MouseEventKind, TouchEvent, WheelEvent,
};
use vscroll_widgets::{
    HeightObserver, InputOutcome, ListDiff, ScrollAlign, ScrollHost, ScrollToItem, ThumbGeometry,
    VirtualList, VirtualListConfig, Virtualization,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

fn list(len: usize, viewport: f64) -> VirtualList<usize> {
    VirtualList::new(
        VirtualListConfig::windowed(viewport, 20.0).with_dev_warnings(false),
        (0..len).collect(),
        KeyExtractor::new(|i: &usize| ItemKey::from(*i)),
    )
}

/// Rows are 20..=40 px tall, never matching the 20 px estimate for long.
fn true_height(i: usize) -> f64 {
    20.0 + ((i * 7) % 21) as f64
}

/// Render the current window and report every row's real height.
fn render(list: &mut VirtualList<usize>) {
    let window = list.window();
    for i in window.indices() {
        list.report_height(i, true_height(i));
    }
    list.run_microtasks();
}

#[derive(Clone, Default)]
struct RecordingHost {
    writes: Rc<RefCell<Vec<f64>>>,
}

impl ScrollHost for RecordingHost {
    fn sync_scroll_top(&mut self, top: f64) {
        self.writes.borrow_mut().push(top);
    }
}

/// A host that cannot measure rows.
struct NoMeasuring;

impl HeightObserver for NoMeasuring {
    fn is_supported(&self) -> bool {
        false
    }

    fn observe(&mut self, _key: &ItemKey) {}

    fn unobserve(&mut self, _key: &ItemKey) {}
}

// ============================================================================
// Convergent scroll-to
// ============================================================================

#[test]
fn scroll_to_last_row_converges_with_unknown_heights() {
    init_tracing();
    let mut l = list(1000, 200.0);
    render(&mut l);

    l.scroll_to(ScrollToItem::index(999).with_align(ScrollAlign::Bottom))
        .unwrap();
    for _ in 0..20 {
        if !l.is_converging() {
            break;
        }
        l.run_frame();
        render(&mut l);
    }

    assert!(!l.is_converging());
    assert!(l.scroll_to_iterations() <= 10);
    let window = l.window();
    assert_eq!(window.end, 999);
    let gap = window.total_height - (l.scroll_top() + 200.0);
    info!(
        iterations = l.scroll_to_iterations(),
        scroll_top = l.scroll_top(),
        total = window.total_height,
        "converged"
    );
    assert!(gap.abs() <= 1.0, "last row bottom off by {gap}");
}

#[test]
fn scroll_to_middle_row_top_aligns() {
    let mut l = list(1000, 200.0);
    l.scroll_to(ScrollToItem::index(500).with_align(ScrollAlign::Top))
        .unwrap();
    for _ in 0..20 {
        l.run_frame();
        render(&mut l);
    }
    assert!(!l.is_converging());

    let window = l.window();
    assert!(window.indices().contains(&500));
    let mut top = window.start_offset;
    for i in window.start..500 {
        top += l.heights().height_or(&ItemKey::from(i), 20.0);
    }
    assert_eq!(top, l.scroll_top());
}

#[test]
fn scroll_to_settles_when_rows_are_never_measured() {
    let mut l = list(1000, 200.0).with_height_observer(Box::new(NoMeasuring));
    l.scroll_to(ScrollToItem::index(500).with_align(ScrollAlign::Top))
        .unwrap();
    for _ in 0..20 {
        if !l.is_converging() {
            break;
        }
        l.run_frame();
        render(&mut l);
    }

    assert!(!l.is_converging());
    assert!(
        l.scroll_to_iterations() <= 2,
        "took {} iterations",
        l.scroll_to_iterations()
    );
    assert_eq!(l.scroll_top(), 10_000.0);
}

#[test]
fn native_scroll_supersedes_scroll_to() {
    let mut l = list(1000, 200.0);
    l.scroll_to(ScrollToItem::index(700)).unwrap();
    assert!(l.is_converging());
    l.scroll_to(120.0).unwrap();
    assert!(!l.is_converging());
    l.run_frame();
    assert_eq!(l.scroll_top(), 120.0);
}

// ============================================================================
// Scrollbar
// ============================================================================

#[test]
fn thumb_position_round_trips() {
    let geometry = ThumbGeometry::with_thumb(2000.0, 200.0, 40.0);
    assert_eq!(geometry.thumb_top(900.0), 80.0);
    assert_eq!(geometry.scroll_top_for(80.0), 900.0);
}

// ============================================================================
// Data changes
// ============================================================================

#[test]
fn append_keeps_window_anchor() {
    let mut l = list(100, 280.0);
    l.scroll_to(210.0).unwrap();
    let before = l.window();
    assert_eq!((before.start, before.end), (10, 25));
    assert_eq!(before.start_offset, 200.0);

    let diff = l.set_items((0..110).collect());
    assert_eq!(
        diff,
        Some(ListDiff {
            index: 100,
            multiple: true
        })
    );
    let after = l.window();
    assert_eq!(after.start, before.start);
    assert_eq!(after.start_offset, before.start_offset);
    assert_eq!(l.scroll_top(), 210.0);
}

#[test]
fn shrinking_below_viewport_deactivates() {
    let mut l = list(100, 200.0);
    l.scroll_to(500.0).unwrap();
    l.set_items((0..5).collect());
    assert_eq!(l.mode(), Virtualization::Inactive);
    assert_eq!(l.scroll_top(), 0.0);
    let window = l.window();
    assert_eq!((window.start, window.end), (0, 4));
}

// ============================================================================
// Wheel
// ============================================================================

#[test]
fn wheel_at_top_passes_through_until_lock_expires() {
    let mut l = list(100, 200.0);

    let mut up = WheelEvent::vertical(-30.0);
    assert_eq!(l.handle_wheel(&mut up), InputOutcome::PassThrough);
    assert!(!up.is_default_prevented());

    let mut down = WheelEvent::vertical(40.0);
    assert_eq!(l.handle_wheel(&mut down), InputOutcome::Consumed);
    assert!(down.is_default_prevented());
    l.run_frame();
    assert_eq!(l.scroll_top(), 40.0);

    let mut back = WheelEvent::vertical(-100.0);
    assert_eq!(l.handle_wheel(&mut back), InputOutcome::Consumed);
    l.run_frame();
    assert_eq!(l.scroll_top(), 0.0);

    // At the edge again, but the inner scroll just happened.
    let mut again = WheelEvent::vertical(-10.0);
    assert_eq!(l.handle_wheel(&mut again), InputOutcome::Consumed);

    l.advance_by(Duration::from_millis(50));
    let mut later = WheelEvent::vertical(-10.0);
    assert_eq!(l.handle_wheel(&mut later), InputOutcome::PassThrough);
}

#[test]
fn wheel_at_bottom_passes_through_after_lock() {
    let mut l = list(100, 200.0);
    l.scroll_to(1800.0).unwrap();
    l.advance_by(Duration::from_millis(50));

    let mut down = WheelEvent::vertical(10.0);
    assert_eq!(l.handle_wheel(&mut down), InputOutcome::PassThrough);
    assert!(!down.is_default_prevented());
    assert!(!down.is_virtual_handled());

    let mut up = WheelEvent::vertical(-10.0);
    assert_eq!(l.handle_wheel(&mut up), InputOutcome::Consumed);
    l.run_frame();
    assert_eq!(l.scroll_top(), 1790.0);
}

#[test]
fn nested_lists_consume_a_wheel_event_once() {
    let mut inner = list(100, 200.0);
    let mut outer = list(100, 200.0);

    let mut ev = WheelEvent::vertical(25.0);
    assert_eq!(inner.handle_wheel(&mut ev), InputOutcome::Consumed);
    assert_eq!(outer.handle_wheel(&mut ev), InputOutcome::Ignored);

    inner.run_frame();
    outer.run_frame();
    assert_eq!(inner.scroll_top(), 25.0);
    assert_eq!(outer.scroll_top(), 0.0);
}

#[test]
fn wheel_events_in_one_frame_share_a_flush() {
    let host = RecordingHost::default();
    let writes = Rc::clone(&host.writes);
    let mut l = list(100, 200.0).with_host(Box::new(host));

    for _ in 0..3 {
        let mut ev = WheelEvent::vertical(10.0);
        l.handle_wheel(&mut ev);
    }
    l.run_frame();
    assert_eq!(*writes.borrow(), vec![30.0]);

    // Echo from the host's container.
    l.handle_native_scroll(30.0);
    assert_eq!(writes.borrow().len(), 1);
}

// ============================================================================
// Touch and drag
// ============================================================================

#[test]
fn touch_flick_decays_to_rest() {
    let mut l = list(100, 200.0);
    l.handle_touch_start(&TouchEvent::single(50.0, 500.0));
    let mut mv = TouchEvent::single(50.0, 470.0);
    assert_eq!(l.handle_touch_move(&mut mv), InputOutcome::Consumed);
    assert!(mv.is_default_prevented());
    l.handle_touch_end();
    l.run_frame();
    assert_eq!(l.scroll_top(), 30.0);

    for _ in 0..200 {
        l.advance_by(Duration::from_millis(16));
        l.run_frame();
    }
    let rest = l.scroll_top();
    assert!((440.0..450.0).contains(&rest), "rested at {rest}");

    l.advance_by(Duration::from_secs(4));
    l.run_frame();
    assert!(!l.is_scrollbar_visible());
    assert!(l.is_idle());
}

#[test]
fn new_touch_stops_inertia() {
    let mut l = list(100, 200.0);
    l.handle_touch_start(&TouchEvent::single(50.0, 500.0));
    l.handle_touch_move(&mut TouchEvent::single(50.0, 470.0));
    l.handle_touch_end();
    l.run_frame();

    l.handle_touch_start(&TouchEvent::single(50.0, 300.0));
    for _ in 0..10 {
        l.advance_by(Duration::from_millis(16));
        l.run_frame();
    }
    assert_eq!(l.scroll_top(), 30.0);
}

#[test]
fn nested_lists_consume_a_touch_move_once() {
    let mut inner = list(100, 200.0);
    let mut outer = list(100, 200.0);

    let start = TouchEvent::single(50.0, 500.0);
    inner.handle_touch_start(&start);
    outer.handle_touch_start(&start);

    let mut mv = TouchEvent::single(50.0, 470.0);
    assert_eq!(inner.handle_touch_move(&mut mv), InputOutcome::Consumed);
    assert_eq!(outer.handle_touch_move(&mut mv), InputOutcome::Ignored);
    assert!(mv.is_default_prevented());

    inner.handle_touch_end();
    outer.handle_touch_end();
    for _ in 0..20 {
        inner.advance_by(Duration::from_millis(16));
        outer.advance_by(Duration::from_millis(16));
        inner.run_frame();
        outer.run_frame();
    }
    assert!(inner.scroll_top() > 30.0);
    assert_eq!(outer.scroll_top(), 0.0);
}

#[test]
fn drag_select_below_container_auto_scrolls() {
    let mut l = list(100, 200.0);
    let bounds = Bounds::new(100.0, 300.0);

    let mut down = MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 0.0, 200.0);
    l.handle_mouse(&mut down, bounds);
    let mut mv = MouseEvent::new(MouseEventKind::Moved, 0.0, 349.0);
    l.handle_mouse(&mut mv, bounds);
    for _ in 0..3 {
        l.run_frame();
    }
    assert_eq!(l.scroll_top(), 21.0);

    let mut up = MouseEvent::new(MouseEventKind::Up(MouseButton::Left), 0.0, 349.0);
    l.handle_mouse(&mut up, bounds);
    l.run_frame();
    assert_eq!(l.scroll_top(), 21.0);
}

// ============================================================================
// Notifications
// ============================================================================

#[test]
fn visible_change_reports_rendered_slice() {
    let seen: Rc<RefCell<Vec<(usize, usize)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let mut l = list(100, 200.0).on_visible_change(move |visible: &[usize], _all: &[usize]| {
        let first = visible.first().copied().unwrap_or_default();
        let last = visible.last().copied().unwrap_or_default();
        sink.borrow_mut().push((first, last));
    });

    l.window();
    l.scroll_to(400.0).unwrap();
    l.scroll_to(400.0).unwrap();
    assert_eq!(*seen.borrow(), vec![(0, 11), (19, 31)]);
}

#[test]
fn virtual_scroll_subscribers_see_engine_moves() {
    let tops: Rc<RefCell<Vec<f64>>> = Rc::default();
    let sink = Rc::clone(&tops);
    let mut l = list(100, 200.0);
    let _sub = l.subscribe_virtual_scroll(move |info| sink.borrow_mut().push(info.y));

    let mut ev = WheelEvent::vertical(15.0);
    l.handle_wheel(&mut ev);
    l.run_frame();
    l.scroll_to(60.0).unwrap();
    assert_eq!(*tops.borrow(), vec![15.0, 60.0]);
}
