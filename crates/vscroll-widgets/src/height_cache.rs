#![forbid(unsafe_code)]

//! Measured row heights keyed by [`ItemKey`].
//!
//! Absence of an entry is the normal state for a row that has never been
//! rendered; callers fall back to the configured item height. Besides the
//! heights themselves the cache keeps:
//!
//! - a **version** that bumps on every mutation, so dependents can memoize
//!   against "cache identity" instead of comparing maps;
//! - **diff records**: for every key set since the last
//!   [`HeightCache::reset_record`], the value it had just before the latest
//!   `set` (`None` if it was absent).
//!
//! Entries for keys that leave the list are not pruned. A long-lived list
//! whose keys never repeat therefore grows without bound; [`HeightCache::clear`]
//! is the hard reset for that case.

use rustc_hash::FxHashMap;
use vscroll_core::ItemKey;

/// Key → measured height map with change tracking.
#[derive(Debug, Clone, Default)]
pub struct HeightCache {
    heights: FxHashMap<ItemKey, f64>,
    record: FxHashMap<ItemKey, Option<f64>>,
    version: u64,
}

impl HeightCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Measured height of `key`, if any.
    #[must_use]
    pub fn get(&self, key: &ItemKey) -> Option<f64> {
        self.heights.get(key).copied()
    }

    /// Measured height of `key`, or `fallback` when unmeasured.
    #[must_use]
    pub fn height_or(&self, key: &ItemKey, fallback: f64) -> f64 {
        self.get(key).unwrap_or(fallback)
    }

    /// Store a measurement.
    ///
    /// Unconditional: the previous value goes into the diff records and the
    /// version bumps even if `height` equals it. Callers only set heights
    /// that a measurement pass found to differ.
    pub fn set(&mut self, key: ItemKey, height: f64) {
        let previous = self.heights.insert(key.clone(), height);
        self.record.insert(key, previous);
        self.version += 1;
    }

    /// Keys changed since the last reset, with their previous values.
    #[must_use]
    pub fn record(&self) -> &FxHashMap<ItemKey, Option<f64>> {
        &self.record
    }

    /// The single changed key and its previous value, when exactly one key
    /// changed since the last reset.
    #[must_use]
    pub fn single_record(&self) -> Option<(&ItemKey, Option<f64>)> {
        if self.record.len() != 1 {
            return None;
        }
        self.record.iter().next().map(|(k, prev)| (k, *prev))
    }

    /// Forget the diff records.
    pub fn reset_record(&mut self) {
        self.record.clear();
    }

    /// Mutation counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of measured keys (including orphans).
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Drop every measurement and record.
    pub fn clear(&mut self) {
        self.heights.clear();
        self.record.clear();
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(s: &str) -> ItemKey {
        ItemKey::from(s)
    }

    #[test]
    fn absent_key_is_none() {
        let cache = HeightCache::new();
        assert_eq!(cache.get(&k("a")), None);
        assert_eq!(cache.height_or(&k("a"), 20.0), 20.0);
        assert!(cache.is_empty());
    }

    #[test]
    fn set_overwrites_and_bumps_version() {
        let mut cache = HeightCache::new();
        cache.set(k("a"), 30.0);
        cache.set(k("a"), 30.0);
        assert_eq!(cache.get(&k("a")), Some(30.0));
        assert_eq!(cache.version(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn record_holds_previous_value() {
        let mut cache = HeightCache::new();
        cache.set(k("a"), 10.0);
        assert_eq!(cache.record().get(&k("a")), Some(&None));

        cache.reset_record();
        assert!(cache.record().is_empty());

        cache.set(k("a"), 25.0);
        assert_eq!(cache.record().get(&k("a")), Some(&Some(10.0)));
        assert_eq!(cache.get(&k("a")), Some(25.0));
    }

    #[test]
    fn repeated_set_records_value_before_latest() {
        let mut cache = HeightCache::new();
        cache.set(k("a"), 1.0);
        cache.set(k("a"), 2.0);
        assert_eq!(cache.record().get(&k("a")), Some(&Some(1.0)));
    }

    #[test]
    fn single_record_only_for_one_key() {
        let mut cache = HeightCache::new();
        assert!(cache.single_record().is_none());
        cache.set(k("a"), 1.0);
        assert_eq!(cache.single_record(), Some((&k("a"), None)));
        cache.set(k("b"), 1.0);
        assert!(cache.single_record().is_none());
    }

    #[test]
    fn clear_is_a_mutation() {
        let mut cache = HeightCache::new();
        cache.set(k("a"), 1.0);
        let v = cache.version();
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.record().is_empty());
        assert!(cache.version() > v);
    }
}
