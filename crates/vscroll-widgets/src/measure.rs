#![forbid(unsafe_code)]

//! Height measurement plumbing.
//!
//! The host measures rendered rows; the engine only hears about the
//! results. [`HeightObserver`] is the host-side capability (start/stop
//! watching a row) and [`HeightCollector`] batches the reports it produces
//! so that a burst of measurements after one render turns into a single
//! cache update on the next microtask.

use crate::height_cache::HeightCache;
use crate::task::EngineTask;
use rustc_hash::FxHashMap;
use vscroll_core::ItemKey;
use vscroll_core::logging::TARGET;
use vscroll_runtime::{Scheduler, TaskId};

/// Host capability for watching row sizes.
///
/// When observation is unsupported every row keeps the fallback height and
/// reports are dropped.
pub trait HeightObserver {
    /// Whether the host can measure rows at all. Checked once.
    fn is_supported(&self) -> bool {
        true
    }

    /// Start watching a mounted row.
    fn observe(&mut self, key: &ItemKey);

    /// Stop watching a row that is about to unmount.
    fn unobserve(&mut self, key: &ItemKey);
}

/// Batches height reports until the next microtask.
pub struct HeightCollector {
    observer: Option<Box<dyn HeightObserver>>,
    enabled: bool,
    pending: FxHashMap<ItemKey, f64>,
    flush_task: Option<TaskId>,
}

impl std::fmt::Debug for HeightCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightCollector")
            .field("enabled", &self.enabled)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl Default for HeightCollector {
    fn default() -> Self {
        Self {
            observer: None,
            enabled: true,
            pending: FxHashMap::default(),
            flush_task: None,
        }
    }
}

impl HeightCollector {
    /// Collector without an observer; reports come straight from the host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector backed by an observer. An unsupported observer disables
    /// collection for the collector's lifetime.
    #[must_use]
    pub fn with_observer(observer: Box<dyn HeightObserver>) -> Self {
        let enabled = observer.is_supported();
        if !enabled {
            tracing::debug!(target: TARGET, "height observation unsupported; using fallback heights");
        }
        Self {
            observer: Some(observer),
            enabled,
            pending: FxHashMap::default(),
            flush_task: None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Reports waiting for the next flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn mount(&mut self, key: &ItemKey) {
        if let (true, Some(observer)) = (self.enabled, self.observer.as_mut()) {
            observer.observe(key);
        }
    }

    /// Stop watching `key` and forget its unflushed report.
    pub fn unmount(&mut self, key: &ItemKey) {
        self.pending.remove(key);
        if let (true, Some(observer)) = (self.enabled, self.observer.as_mut()) {
            observer.unobserve(key);
        }
    }

    /// Queue a measurement. A later report for the same key replaces an
    /// earlier one. Returns `false` if the report was dropped.
    pub fn report(&mut self, key: ItemKey, height: f64, sched: &mut Scheduler<EngineTask>) -> bool {
        if !self.enabled {
            return false;
        }
        if !height.is_finite() || height < 0.0 {
            tracing::debug!(target: TARGET, %key, height, "ignoring invalid height report");
            return false;
        }
        self.pending.insert(key, height);
        self.schedule(sched);
        true
    }

    /// Make sure pending reports get flushed on the next microtask.
    pub fn schedule(&mut self, sched: &mut Scheduler<EngineTask>) {
        if self.flush_task.is_none() && !self.pending.is_empty() {
            self.flush_task = Some(sched.queue_microtask(EngineTask::FlushHeights));
        }
    }

    /// Apply the batch. Only values that differ from the cache are written.
    /// Returns how many keys changed.
    pub fn flush(&mut self, cache: &mut HeightCache) -> usize {
        self.flush_task = None;
        let mut changed = 0;
        for (key, height) in self.pending.drain() {
            if cache.get(&key) != Some(height) {
                cache.set(key, height);
                changed += 1;
            }
        }
        if changed > 0 {
            tracing::debug!(target: TARGET, changed, "height flush");
        }
        changed
    }

    pub fn cancel(&mut self, sched: &mut Scheduler<EngineTask>) {
        if let Some(id) = self.flush_task.take() {
            sched.cancel(id);
        }
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Watch {
        log: Rc<RefCell<Vec<String>>>,
        unsupported: bool,
    }

    impl HeightObserver for Watch {
        fn is_supported(&self) -> bool {
            !self.unsupported
        }
        fn observe(&mut self, key: &ItemKey) {
            self.log.borrow_mut().push(format!("+{key}"));
        }
        fn unobserve(&mut self, key: &ItemKey) {
            self.log.borrow_mut().push(format!("-{key}"));
        }
    }

    #[test]
    fn reports_batch_into_one_microtask() {
        let mut sched = Scheduler::new();
        let mut cache = HeightCache::new();
        let mut collector = HeightCollector::new();

        collector.report(ItemKey::from(1), 30.0, &mut sched);
        collector.report(ItemKey::from(2), 40.0, &mut sched);
        collector.report(ItemKey::from(1), 35.0, &mut sched);
        assert_eq!(sched.pending(), 1);

        assert_eq!(sched.next_microtask(), Some(EngineTask::FlushHeights));
        assert_eq!(collector.flush(&mut cache), 2);
        assert_eq!(cache.get(&ItemKey::from(1)), Some(35.0));
        assert_eq!(collector.pending(), 0);
    }

    #[test]
    fn unchanged_heights_are_not_written() {
        let mut sched = Scheduler::new();
        let mut cache = HeightCache::new();
        let mut collector = HeightCollector::new();
        collector.report(ItemKey::from(1), 30.0, &mut sched);
        collector.flush(&mut cache);
        let version = cache.version();

        collector.report(ItemKey::from(1), 30.0, &mut sched);
        assert_eq!(collector.flush(&mut cache), 0);
        assert_eq!(cache.version(), version);
    }

    #[test]
    fn invalid_heights_are_dropped() {
        let mut sched = Scheduler::new();
        let mut collector = HeightCollector::new();
        assert!(!collector.report(ItemKey::from(1), f64::NAN, &mut sched));
        assert!(!collector.report(ItemKey::from(1), -3.0, &mut sched));
        assert!(sched.is_idle());
    }

    #[test]
    fn unmount_drops_pending_and_unobserves() {
        let watch = Watch::default();
        let log = Rc::clone(&watch.log);
        let mut sched = Scheduler::new();
        let mut collector = HeightCollector::with_observer(Box::new(watch));

        collector.mount(&ItemKey::from("a"));
        collector.report(ItemKey::from("a"), 12.0, &mut sched);
        collector.unmount(&ItemKey::from("a"));
        assert_eq!(collector.pending(), 0);
        assert_eq!(*log.borrow(), vec!["+a".to_string(), "-a".to_string()]);
    }

    #[test]
    fn unsupported_observer_disables_collection() {
        let watch = Watch {
            unsupported: true,
            ..Watch::default()
        };
        let log = Rc::clone(&watch.log);
        let mut sched = Scheduler::new();
        let mut collector = HeightCollector::with_observer(Box::new(watch));
        assert!(!collector.is_enabled());

        collector.mount(&ItemKey::from("a"));
        assert!(!collector.report(ItemKey::from("a"), 12.0, &mut sched));
        assert!(log.borrow().is_empty());
    }
}
