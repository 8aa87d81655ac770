//! Key Index
//!
//! Maps each cached key to the handle of the recency-list node that holds it.
//! The index never touches the list itself; keeping both sides consistent is
//! the store's job.

use crate::list::NodeId;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
pub use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
pub use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Key → node lookup with O(1) average time.
pub(crate) struct KeyIndex<K, S = DefaultHashBuilder> {
    map: HashMap<K, NodeId, S>,
}

impl<K: Hash + Eq, S: BuildHasher> KeyIndex<K, S> {
    /// Creates an empty index sized for `capacity` keys.
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        KeyIndex {
            map: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Returns the node currently holding `key`.
    #[inline]
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key).copied()
    }

    /// Points `key` at `node`, replacing any previous mapping.
    #[inline]
    pub(crate) fn put(&mut self, key: K, node: NodeId) {
        self.map.insert(key, node);
    }

    /// Drops the mapping for `key`. Absent keys are ignored.
    #[inline]
    pub(crate) fn delete<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key)
    }

    /// Returns `true` if `key` is mapped.
    #[inline]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }
}

impl<K, S> KeyIndex<K, S> {
    /// Number of mapped keys.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    /// Drops every mapping. The table keeps its allocation.
    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, S> fmt::Debug for KeyIndex<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyIndex")
            .field("len", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::RecencyList;

    fn index() -> KeyIndex<&'static str> {
        KeyIndex::with_capacity_and_hasher(4, DefaultHashBuilder::default())
    }

    #[test]
    fn test_put_get_delete() {
        let mut list = RecencyList::with_capacity(2);
        let dog = list.push_front("dog");
        let cat = list.push_front("cat");

        let mut index = index();
        assert_eq!(index.get("dog"), None);

        index.put("dog", dog);
        index.put("cat", cat);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("dog"), Some(dog));
        assert!(index.contains("cat"));

        assert_eq!(index.delete("dog"), Some(dog));
        assert_eq!(index.get("dog"), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut index = index();
        assert_eq!(index.delete("ghost"), None);
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_put_overwrites() {
        let mut list = RecencyList::with_capacity(2);
        let first = list.push_front(1);
        let second = list.push_front(2);

        let mut index = index();
        index.put("k", first);
        index.put("k", second);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("k"), Some(second));

        index.clear();
        assert!(!index.contains("k"));
    }
}
