use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

/// Slot index of the front sentinel (most-recently-used side).
const FRONT: usize = 0;
/// Slot index of the back sentinel (least-recently-used side).
const BACK: usize = 1;

/// Handle to a node stored in a [`RecencyList`].
///
/// A handle stays valid from the moment the node is created until it is
/// removed from the list. Using it afterwards is a programming error and
/// panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node in the doubly linked list.
///
/// Contains a value and the slot indices of the previous and next entries.
/// Sentinels and released slots hold no value.
struct Entry<T> {
    /// The value stored in this entry. `None` for sigil nodes and free slots.
    val: Option<T>,
    /// Slot of the previous entry (towards the front sentinel).
    prev: usize,
    /// Slot of the next entry (towards the back sentinel).
    next: usize,
    /// Whether the entry is currently spliced into the chain.
    linked: bool,
}

impl<T> Entry<T> {
    fn new(val: T) -> Self {
        Entry {
            val: Some(val),
            prev: FRONT,
            next: BACK,
            linked: false,
        }
    }

    /// Creates a sigil (sentinel) entry. Sigils never carry a value.
    fn new_sigil(prev: usize, next: usize) -> Self {
        Entry {
            val: None,
            prev,
            next,
            linked: true,
        }
    }
}

/// A doubly linked list ordered from most-recently-used to least-recently-used.
///
/// Nodes live in an arena owned by the list and refer to their neighbours by
/// slot index, so neighbours never own each other. Two permanent sigil nodes
/// anchor the ends of the chain, which keeps insertion and removal free of
/// boundary cases. Released slots are recycled through a free list.
///
/// Invariants, held at every method boundary:
/// - following `next` from the front sigil reaches the back sigil in exactly
///   `len + 1` hops, and following `prev` from the back sigil reaches the front
///   sigil in exactly `len + 1` hops;
/// - `len` counts the linked, value-carrying nodes and is never recomputed.
pub(crate) struct RecencyList<T> {
    slots: Vec<Entry<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> RecencyList<T> {
    /// Creates an empty list with room for `nodes` entries before the arena
    /// has to grow.
    pub(crate) fn with_capacity(nodes: usize) -> Self {
        let mut slots = Vec::with_capacity(nodes.saturating_add(2));
        slots.push(Entry::new_sigil(FRONT, BACK));
        slots.push(Entry::new_sigil(FRONT, BACK));
        RecencyList {
            slots,
            free: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of linked nodes.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if only the two sigils are linked.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the node right after the front sigil, if any.
    pub(crate) fn front(&self) -> Option<NodeId> {
        let first = self.slots[FRONT].next;
        (first != BACK).then_some(NodeId(first))
    }

    /// Returns the node right before the back sigil, if any.
    pub(crate) fn back(&self) -> Option<NodeId> {
        let last = self.slots[BACK].prev;
        (last != FRONT).then_some(NodeId(last))
    }

    /// Stores `val` in a fresh node and links it at the front.
    pub(crate) fn push_front(&mut self, val: T) -> NodeId {
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Entry::new(val);
                slot
            }
            None => {
                self.slots.push(Entry::new(val));
                self.slots.len() - 1
            }
        };
        let node = NodeId(slot);
        self.attach(node);
        node
    }

    /// Links a detached node immediately after the front sigil.
    ///
    /// # Panics
    ///
    /// Panics if `node` is a sigil, has been removed, or is already linked.
    pub(crate) fn attach(&mut self, node: NodeId) {
        let slot = node.0;
        assert!(
            self.is_live(slot) && !self.slots[slot].linked,
            "recency list: cannot attach node {slot}, it is not a detached live node"
        );

        let first = self.slots[FRONT].next;
        {
            let entry = &mut self.slots[slot];
            entry.prev = FRONT;
            entry.next = first;
            entry.linked = true;
        }
        self.slots[FRONT].next = slot;
        self.slots[first].prev = slot;
        self.len += 1;
    }

    /// Splices a linked node out of the chain, keeping its value in place so
    /// it can be attached again without reallocating.
    ///
    /// # Panics
    ///
    /// Panics if `node` is a sigil, has been removed, or is already detached.
    pub(crate) fn detach(&mut self, node: NodeId) {
        let slot = node.0;
        assert!(
            self.is_live(slot) && self.slots[slot].linked,
            "recency list: cannot detach node {slot}, it is not linked into this list"
        );

        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
        self.slots[slot].linked = false;
        self.len -= 1;
    }

    /// Unlinks `node`, releases its slot and hands back the stored value.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`RecencyList::detach`].
    pub(crate) fn remove(&mut self, node: NodeId) -> T {
        self.detach(node);
        self.free.push(node.0);
        match self.slots[node.0].val.take() {
            Some(val) => val,
            None => unreachable!("detach only succeeds on value-carrying nodes"),
        }
    }

    /// Makes `node` the most-recently-used entry.
    ///
    /// Expressed as detach followed by attach so that the first, a middle and
    /// the last node all go through the same path.
    pub(crate) fn move_to_front(&mut self, node: NodeId) {
        self.detach(node);
        self.attach(node);
    }

    /// Removes the least-recently-used node.
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        let last = self.back()?;
        Some(self.remove(last))
    }

    /// Returns the value stored in `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is a sigil or has been removed.
    pub(crate) fn get(&self, node: NodeId) -> &T {
        match self.slots.get(node.0).and_then(|entry| entry.val.as_ref()) {
            Some(val) => val,
            None => panic!("recency list: node {} is not live", node.0),
        }
    }

    /// Mutable counterpart of [`RecencyList::get`].
    pub(crate) fn get_mut(&mut self, node: NodeId) -> &mut T {
        match self.slots.get_mut(node.0).and_then(|entry| entry.val.as_mut()) {
            Some(val) => val,
            None => panic!("recency list: node {} is not live", node.0),
        }
    }

    /// Walks the list from the most- to the least-recently-used node.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: &self.slots,
            head: self.slots[FRONT].next,
            tail: self.slots[BACK].prev,
            remaining: self.len,
        }
    }

    /// Drops every node and relinks the two sigils. The arena keeps its
    /// allocation.
    pub(crate) fn clear(&mut self) {
        self.slots.truncate(2);
        self.slots[FRONT].next = BACK;
        self.slots[BACK].prev = FRONT;
        self.free.clear();
        self.len = 0;
    }

    fn is_live(&self, slot: usize) -> bool {
        slot > BACK && self.slots.get(slot).is_some_and(|entry| entry.val.is_some())
    }
}

impl<T> fmt::Debug for RecencyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyList")
            .field("len", &self.len)
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .finish()
    }
}

/// Borrowing iterator over a [`RecencyList`], front to back.
pub(crate) struct Iter<'a, T> {
    slots: &'a [Entry<T>],
    head: usize,
    tail: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let entry = &self.slots[self.head];
        self.head = entry.next;
        self.remaining -= 1;
        entry.val.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let entry = &self.slots[self.tail];
        self.tail = entry.prev;
        self.remaining -= 1;
        entry.val.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots,
            head: self.head,
            tail: self.tail,
            remaining: self.remaining,
        }
    }
}
