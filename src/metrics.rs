//! Store Metrics
//!
//! Counters describing how a store has been used, reported through the
//! [`CacheMetrics`] trait as a `BTreeMap` so the output order is stable across
//! runs.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Counters maintained by an [`LruStore`](crate::LruStore).
///
/// A touch or a promoting lookup counts as one request: a hit when the key was
/// resident, a miss otherwise. Non-promoting reads (`peek`, `contains`,
/// `snapshot`) are not counted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreMetrics {
    /// Requests that found their key resident.
    pub hits: u64,
    /// Requests that did not.
    pub misses: u64,
    /// Entries created by a missing touch.
    pub insertions: u64,
    /// Entries dropped because the store went over capacity.
    pub evictions: u64,
    /// Entries dropped through an explicit `remove` or `pop_lru`.
    pub removals: u64,
}

impl StoreMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a request that found its key.
    #[inline]
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a request that did not find its key.
    #[inline]
    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts a new entry.
    #[inline]
    pub(crate) fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Counts an entry dropped for capacity.
    #[inline]
    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Counts an explicit removal.
    #[inline]
    pub(crate) fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Total number of counted requests.
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of requests that hit, between 0.0 and 1.0. Zero before the
    /// first request.
    pub fn hit_rate(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            requests => self.hits as f64 / requests as f64,
        }
    }

    /// Fraction of requests that missed, between 0.0 and 1.0. Zero before the
    /// first request.
    pub fn miss_rate(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            requests => self.misses as f64 / requests as f64,
        }
    }

    /// Converts the counters to a name → value map in deterministic order.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.hits as f64);
        metrics.insert("cache_misses".to_string(), self.misses as f64);
        metrics.insert("requests".to_string(), self.requests() as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics
    }
}

/// Uniform metrics reporting.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs, keys sorted alphabetically.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short name of the eviction policy, e.g. `"LRU"`.
    fn algorithm_name(&self) -> &'static str;
}
