//! Least Recently Used (LRU) Store
//!
//! A fixed-capacity key-value store that evicts the entry which has gone
//! longest without being touched once the configured capacity is exceeded.
//!
//! # Algorithm
//!
//! Two structures are kept in lock step:
//!
//! - a recency list ordered from most- to least-recently-used, anchored by two
//!   sentinel nodes that never carry data;
//! - a key index mapping each key to its node in that list.
//!
//! ```text
//!   index:  Dog ──┐   Tee ──┐   Soda ──┐
//!                 ▼         ▼          ▼
//!   list:  [front] ⇄ {Dog} ⇄ {Tee} ⇄ {Soda} ⇄ [back]
//!                  most recent        least recent
//! ```
//!
//! A [`touch`](LruStore::touch) looks the key up in the index. On a hit the
//! node is detached and re-attached at the front; on a miss a new node is
//! attached at the front and registered in the index. If the list is then
//! longer than the capacity, the node just before the back sentinel is
//! evicted from both structures. Because the touched node is already at the
//! front when eviction runs, it is never the one evicted, even at capacity 1.
//!
//! # Performance Characteristics
//!
//! - Touch / get / remove: O(1) average (one hash lookup, constant relinking)
//! - Snapshot / iteration: O(n)
//! - A touch hit performs no allocation. Evicted slots are recycled, so a
//!   store at steady state stops allocating list nodes altogether.
//!
//! # Thread Safety
//!
//! All mutation takes `&mut self`. To share a store between threads wrap the
//! whole store in a single `Mutex`; each touch then runs as one critical
//! section.

use crate::config::LruStoreConfig;
use crate::error::ConfigurationError;
use crate::index::{DefaultHashBuilder, KeyIndex};
use crate::list::{self, NodeId, RecencyList};
use crate::metrics::{CacheMetrics, StoreMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::num::NonZeroUsize;
use tracing::{debug, trace};

/// Upper bound on the nodes reserved up front by a new store.
const MAX_PREALLOCATED_NODES: usize = 1 << 16;

/// A fixed-capacity Least Recently Used store.
///
/// # Examples
///
/// ```
/// use lru_store::LruStore;
///
/// let mut store = LruStore::new(2).unwrap();
///
/// store.touch("apple", 1);
/// store.touch("banana", 2);
///
/// // Touching an existing key promotes it without growing the store.
/// store.touch("apple", 1);
/// assert_eq!(store.snapshot(), vec![1, 2]);
///
/// // Going over capacity evicts the least recently used entry.
/// assert_eq!(store.touch("cherry", 3), Some(("banana", 2)));
/// assert!(!store.contains(&"banana"));
/// assert_eq!(store.len(), 2);
/// ```
pub struct LruStore<K, V, S = DefaultHashBuilder> {
    config: LruStoreConfig,
    list: RecencyList<(K, V)>,
    index: KeyIndex<K, S>,
    metrics: StoreMetrics,
}

impl<K: Hash + Eq, V> LruStore<K, V> {
    /// Creates a store holding at most `capacity` entries.
    ///
    /// Fails with [`ConfigurationError::ZeroCapacity`] when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self, ConfigurationError> {
        let config = LruStoreConfig::new(capacity)?;
        Ok(LruStore::init(config, None))
    }

    /// Creates a store from a configuration with an optional hasher.
    ///
    /// The config's capacity is non-zero by construction, so this cannot fail.
    pub fn init(config: LruStoreConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        LruStore::with_hasher(config.capacity, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruStore<K, V, S> {
    /// Creates a store with the given capacity and hash builder.
    pub fn with_hasher(capacity: NonZeroUsize, hash_builder: S) -> Self {
        // One spare slot: the list briefly holds capacity + 1 entries before
        // the eviction step of a missing touch. Huge capacities grow on demand.
        let nodes = capacity.get().saturating_add(1).min(MAX_PREALLOCATED_NODES);
        debug!(capacity = capacity.get(), "creating LRU store");
        LruStore {
            config: LruStoreConfig { capacity },
            list: RecencyList::with_capacity(nodes),
            // Twice the live entry count keeps the table at most half full, so
            // tombstone cleanup under churn rehashes in place instead of growing.
            index: KeyIndex::with_capacity_and_hasher(nodes.saturating_mul(2), hash_builder),
            metrics: StoreMetrics::new(),
        }
    }

    /// Returns `true` if `key` is resident. Does not change recency.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains(key)
    }

    /// Returns the value for `key` without promoting it.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.index.get(key)?;
        Some(&self.list.get(node).1)
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.index.get(key) {
            Some(node) => {
                self.list.move_to_front(node);
                self.metrics.record_hit();
                Some(&self.list.get(node).1)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Mutable counterpart of [`LruStore::get`].
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.index.get(key) {
            Some(node) => {
                self.list.move_to_front(node);
                self.metrics.record_hit();
                Some(&mut self.list.get_mut(node).1)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.index.delete(key)?;
        let (_, value) = self.list.remove(node);
        self.metrics.record_removal();
        Some(value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_back()?;
        self.index.delete(&key);
        self.metrics.record_removal();
        Some((key, value))
    }

    /// Removes every entry. Capacity and metrics are kept.
    pub fn clear(&mut self) {
        debug!(dropped = self.list.len(), "clearing LRU store");
        self.list.clear();
        self.index.clear();
    }

    /// Brings `node` to the front, optionally replacing its value first.
    fn promote(&mut self, node: NodeId, value: Option<V>) {
        self.list.detach(node);
        if let Some(value) = value {
            self.list.get_mut(node).1 = value;
        }
        self.list.attach(node);
        self.metrics.record_hit();
    }

    /// Evicts the back-most entry if the last insertion pushed the store over
    /// capacity.
    fn enforce_capacity(&mut self) -> Option<(K, V)> {
        debug_assert_eq!(self.list.len(), self.index.len());
        if self.list.len() <= self.config.capacity.get() {
            return None;
        }
        let (key, value) = self.list.pop_back()?;
        self.index.delete(&key);
        self.metrics.record_eviction();
        trace!(
            len = self.list.len(),
            capacity = self.config.capacity.get(),
            "evicted least recently used entry"
        );
        Some((key, value))
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruStore<K, V, S> {
    /// Inserts `key` or promotes it to most recently used.
    ///
    /// On a hit the stored value is replaced by `value` and the node is moved
    /// to the front without allocating. On a miss a new entry is created at
    /// the front. If the store is then over capacity, the least recently used
    /// entry is evicted and returned.
    pub fn touch(&mut self, key: K, value: V) -> Option<(K, V)> {
        match self.index.get(&key) {
            Some(node) => self.promote(node, Some(value)),
            None => self.insert(key, value),
        }
        self.enforce_capacity()
    }

    /// Like [`LruStore::touch`], but only builds the value on a miss. A hit
    /// leaves the stored value as it is.
    pub fn touch_with<F>(&mut self, key: K, factory: F) -> Option<(K, V)>
    where
        F: FnOnce() -> V,
    {
        match self.index.get(&key) {
            Some(node) => self.promote(node, None),
            None => self.insert(key, factory()),
        }
        self.enforce_capacity()
    }

    fn insert(&mut self, key: K, value: V) {
        let node = self.list.push_front((key.clone(), value));
        self.index.put(key, node);
        self.metrics.record_miss();
        self.metrics.record_insertion();
    }
}

impl<K, V, S> LruStore<K, V, S> {
    /// Returns the configured capacity.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    /// Returns the number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the store holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the usage counters.
    #[inline]
    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    /// Returns the most recently used entry without touching it.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        let (key, value) = self.list.get(self.list.front()?);
        Some((key, value))
    }

    /// Returns the least recently used entry, the next eviction candidate.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let (key, value) = self.list.get(self.list.back()?);
        Some((key, value))
    }

    /// Iterates over entries from most to least recently used. Does not
    /// change recency.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    /// Copies the values out in recency order, most recently used first.
    pub fn snapshot(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Number of keys held by the index. Equal to [`LruStore::len`] at every
    /// operation boundary.
    #[cfg(test)]
    pub(crate) fn index_len(&self) -> usize {
        self.index.len()
    }
}

impl<K, V, S> fmt::Debug for LruStore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStore")
            .field("capacity", &self.config.capacity)
            .field("len", &self.list.len())
            .finish()
    }
}

/// Renders the store as `len - [{mru}<-->...<-->{lru}]`.
impl<K, V: fmt::Display, S> fmt::Display for LruStore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - [", self.len())?;
        for (i, (_, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("<-->")?;
            }
            write!(f, "{{{value}}}")?;
        }
        f.write_str("]")
    }
}

impl<K, V, S> CacheMetrics for LruStore<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<'a, K, V, S> IntoIterator for &'a LruStore<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// Iterator over a store's entries, most recently used first.
///
/// Created by [`LruStore::iter`].
pub struct Iter<'a, K, V> {
    inner: list::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn make_store<K: Hash + Eq + Clone, V>(cap: usize) -> LruStore<K, V> {
        LruStore::new(cap).unwrap()
    }

    /// Checks that list and index describe the same set of entries.
    fn assert_consistent<K: Hash + Eq + Clone, V>(store: &LruStore<K, V>) {
        assert_eq!(store.len(), store.index_len());
        assert_eq!(store.iter().count(), store.len());
        assert_eq!(store.iter().rev().count(), store.len());
        for (key, _) in store.iter() {
            assert!(store.contains(key));
        }
        assert!(store.len() <= store.cap().get());
    }

    #[test]
    fn test_touch_inserts_at_front() {
        let mut store = make_store(3);
        assert_eq!(store.touch("a", 1), None);
        assert_eq!(store.touch("b", 2), None);
        assert_eq!(store.snapshot(), vec![2, 1]);
        assert_eq!(store.peek_mru(), Some((&"b", &2)));
        assert_eq!(store.peek_lru(), Some((&"a", &1)));
        assert_consistent(&store);
    }

    #[test]
    fn test_touch_hit_overwrites_and_promotes() {
        let mut store = make_store(3);
        store.touch("a", 1);
        store.touch("b", 2);
        store.touch("c", 3);
        assert_eq!(store.touch("a", 10), None);
        assert_eq!(store.len(), 3);
        assert_eq!(store.snapshot(), vec![10, 3, 2]);
        assert_consistent(&store);
    }

    #[test]
    fn test_touch_with_keeps_value_on_hit() {
        let mut store = make_store(2);
        store.touch_with("a", || 1);
        store.touch_with("b", || 2);
        store.touch_with("a", || panic!("factory must not run on a hit"));
        assert_eq!(store.snapshot(), vec![1, 2]);

        let evicted = store.touch_with("c", || 3);
        assert_eq!(evicted, Some(("b", 2)));
        assert_consistent(&store);
    }

    #[test]
    fn test_eviction_returns_least_recent() {
        let mut store = make_store(2);
        store.touch("apple", 1);
        store.touch("banana", 2);
        store.touch("apple", 1);
        assert_eq!(store.touch("cherry", 3), Some(("banana", 2)));
        assert!(!store.contains(&"banana"));
        assert_eq!(store.snapshot(), vec![3, 1]);
        assert_consistent(&store);
    }

    #[test]
    fn test_capacity_one_keeps_newest() {
        let mut store = make_store(1);
        store.touch("A", 'A');
        assert_eq!(store.touch("B", 'B'), Some(("A", 'A')));
        assert_eq!(store.snapshot(), vec!['B']);
        assert_eq!(store.touch("B", 'B'), None);
        assert_eq!(store.len(), 1);
        assert_consistent(&store);
    }

    #[test]
    fn test_zero_capacity_fails() {
        let result: Result<LruStore<&str, i32>, _> = LruStore::new(0);
        assert_eq!(result.unwrap_err(), ConfigurationError::ZeroCapacity);
    }

    #[test]
    fn test_get_promotes_peek_does_not() {
        let mut store = make_store(2);
        store.touch("a", 1);
        store.touch("b", 2);

        assert_eq!(store.peek(&"a"), Some(&1));
        assert_eq!(store.snapshot(), vec![2, 1]);

        assert_eq!(store.get(&"a"), Some(&1));
        assert_eq!(store.snapshot(), vec![1, 2]);

        assert_eq!(store.get(&"zzz"), None);
        assert_consistent(&store);
    }

    #[test]
    fn test_get_mut_updates_value() {
        let mut store = make_store(2);
        store.touch("a", 1);
        store.touch("b", 2);
        if let Some(v) = store.get_mut(&"a") {
            *v = 5;
        }
        assert_eq!(store.snapshot(), vec![5, 2]);
    }

    #[test]
    fn test_remove_and_pop_lru() {
        let mut store = make_store(3);
        store.touch("a", 1);
        store.touch("b", 2);
        store.touch("c", 3);

        assert_eq!(store.remove(&"b"), Some(2));
        assert_eq!(store.remove(&"b"), None);
        assert_eq!(store.pop_lru(), Some(("a", 1)));
        assert_eq!(store.snapshot(), vec![3]);
        assert_consistent(&store);

        assert_eq!(store.pop_lru(), Some(("c", 3)));
        assert_eq!(store.pop_lru(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = make_store(2);
        store.touch("a", 1);
        store.touch("b", 2);
        store.clear();
        assert!(store.is_empty());
        assert!(!store.contains(&"a"));
        assert_consistent(&store);

        store.touch("c", 3);
        assert_eq!(store.snapshot(), vec![3]);
    }

    #[test]
    fn test_string_keys_borrowed_lookup() {
        let mut store = make_store(2);
        store.touch(String::from("apple"), 1);
        assert!(store.contains("apple"));
        assert_eq!(store.peek("apple"), Some(&1));
        assert_eq!(store.remove("apple"), Some(1));
    }

    #[test]
    fn test_display_format() {
        let mut store = make_store(5);
        assert_eq!(store.to_string(), "0 - []");
        for word in ["Terry", "Tee", "Dog"] {
            store.touch(word, word);
        }
        assert_eq!(store.to_string(), "3 - [{Dog}<-->{Tee}<-->{Terry}]");
    }

    #[test]
    fn test_metrics_counts() {
        let mut store = make_store(2);
        store.touch("a", 1);
        store.touch("b", 2);
        store.touch("a", 1);
        store.touch("c", 3);
        store.get(&"nope");
        store.remove(&"a");

        let m = store.metrics();
        assert_eq!(m.hits, 1);
        assert_eq!(m.misses, 4);
        assert_eq!(m.insertions, 3);
        assert_eq!(m.evictions, 1);
        assert_eq!(m.removals, 1);
        assert_eq!(store.algorithm_name(), "LRU");
        assert_eq!(CacheMetrics::metrics(&store)["requests"], 5.0);
    }

    #[test]
    fn test_iter_reverse_matches_forward() {
        let mut store = make_store(4);
        for i in 0..6 {
            store.touch(i, i * 10);
        }
        let forward: Vec<_> = store.iter().map(|(k, _)| *k).collect();
        let mut backward: Vec<_> = store.iter().rev().map(|(k, _)| *k).collect();
        backward.reverse();
        assert_eq!(forward, vec![5, 4, 3, 2]);
        assert_eq!(forward, backward);
        assert_eq!((&store).into_iter().len(), 4);
    }

    #[test]
    fn test_mixed_operations_stay_consistent() {
        let mut store = make_store(4);
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let key = seed % 9;
            match seed % 5 {
                0 => {
                    store.remove(&key);
                }
                1 => {
                    store.get(&key);
                }
                _ => {
                    store.touch(key, seed);
                }
            }
            assert_consistent(&store);
            let mru_should_be_key = seed % 5 >= 2;
            if mru_should_be_key {
                assert_eq!(store.peek_mru().map(|(k, _)| *k), Some(key));
            }
        }
    }
}
