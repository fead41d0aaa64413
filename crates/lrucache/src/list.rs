//! Ordered list backing the LRU cache
//!
//! Entries live in a single arena (`Vec<Slot>`) and point at their
//! neighbours by index. Slots 0 and 1 are permanent head/tail sentinels, so
//! every real entry always has two neighbours and linking never special-cases
//! the ends of the list. Removed slots go onto a free list for reuse.

use std::fmt;
use std::iter::FusedIterator;

use crate::entry::{EntryId, Slot};

/// Arena index of the head sentinel (front = most recently used)
const HEAD: usize = 0;

/// Arena index of the tail sentinel (back = least recently used)
const TAIL: usize = 1;

/// Doubly linked list of key/value entries with O(1) relinking
pub struct List<K, V> {
    slots: Vec<Slot<K, V>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> List<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` entries before the
    /// arena has to grow
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity + 2);
        slots.push(Slot::sentinel(HEAD, TAIL));
        slots.push(Slot::sentinel(HEAD, TAIL));

        Self {
            slots,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Insert a new entry at the front and return its handle
    pub fn prepend(&mut self, key: K, value: V) -> EntryId {
        let idx = self.alloc(key, value);
        self.link_after(HEAD, idx);
        self.id_of(idx)
    }

    /// Insert a new entry at the back and return its handle
    pub fn append(&mut self, key: K, value: V) -> EntryId {
        let idx = self.alloc(key, value);
        let last = self.slots[TAIL].prev;
        self.link_after(last, idx);
        self.id_of(idx)
    }

    /// Move an entry to the front of the list
    ///
    /// Does nothing if the entry is already at the front. The handle must
    /// belong to this list; a handle whose entry has been removed is ignored.
    pub fn move_to_front(&mut self, id: EntryId) {
        let idx = match self.resolve(id) {
            Some(idx) => idx,
            None => return,
        };

        if self.slots[HEAD].next == idx {
            return;
        }

        self.unlink(idx);
        self.link_after(HEAD, idx);
    }

    /// Detach an entry and hand back its key and value
    ///
    /// Returns `None` if the handle no longer refers to a linked entry.
    pub fn remove(&mut self, id: EntryId) -> Option<(K, V)> {
        let idx = self.resolve(id)?;
        self.unlink(idx);
        self.release(idx)
    }

    /// Detach the back-most (oldest) entry
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let idx = self.slots[TAIL].prev;
        if idx == HEAD {
            return None;
        }

        self.unlink(idx);
        self.release(idx)
    }

    /// Handle of the front-most entry
    pub fn front(&self) -> Option<EntryId> {
        match self.slots[HEAD].next {
            TAIL => None,
            idx => Some(self.id_of(idx)),
        }
    }

    /// Handle of the back-most entry
    pub fn back(&self) -> Option<EntryId> {
        match self.slots[TAIL].prev {
            HEAD => None,
            idx => Some(self.id_of(idx)),
        }
    }

    /// Borrow the key and value behind a handle
    pub fn get(&self, id: EntryId) -> Option<(&K, &V)> {
        let idx = self.resolve(id)?;
        self.slots[idx]
            .entry
            .as_ref()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Borrow the key and mutably borrow the value behind a handle
    pub fn get_mut(&mut self, id: EntryId) -> Option<(&K, &mut V)> {
        let idx = self.resolve(id)?;
        self.slots[idx]
            .entry
            .as_mut()
            .map(|entry| (&entry.key, &mut entry.value))
    }

    /// Number of entries (sentinels excluded)
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry and return to the freshly constructed state
    ///
    /// Arena slots are kept on the free list with their generation bumped,
    /// so handles issued before the clear stop resolving.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (idx, slot) in self.slots.iter_mut().enumerate().skip(2) {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(idx);
        }

        self.slots[HEAD].next = TAIL;
        self.slots[TAIL].prev = HEAD;
        self.len = 0;
    }

    /// Iterate entries from front (most recent) to back (oldest)
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            front: self.slots[HEAD].next,
            back: self.slots[TAIL].prev,
            remaining: self.len,
        }
    }

    fn alloc(&mut self, key: K, value: V) -> usize {
        self.len += 1;

        if let Some(idx) = self.free_list.pop() {
            let generation = self.slots[idx].generation;
            self.slots[idx] = Slot::occupied(key, value);
            self.slots[idx].generation = generation;
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(Slot::occupied(key, value));
            idx
        }
    }

    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        let slot = &mut self.slots[idx];
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        self.free_list.push(idx);
        self.len -= 1;
        Some((entry.key, entry.value))
    }

    fn link_after(&mut self, at: usize, idx: usize) {
        let next = self.slots[at].next;

        self.slots[idx].prev = at;
        self.slots[idx].next = next;
        self.slots[next].prev = idx;
        self.slots[at].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;

        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }

    fn resolve(&self, id: EntryId) -> Option<usize> {
        if id.index <= TAIL {
            return None;
        }

        match self.slots.get(id.index) {
            Some(slot) if slot.is_live(id.generation) => Some(id.index),
            _ => None,
        }
    }

    fn id_of(&self, idx: usize) -> EntryId {
        EntryId {
            index: idx,
            generation: self.slots[idx].generation,
        }
    }
}

impl<K, V> Default for List<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for List<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a List<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`List`], front to back
///
/// Reversing it walks back to front.
pub struct Iter<'a, K, V> {
    slots: &'a [Slot<K, V>],
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let slot = &self.slots[self.front];
        self.front = slot.next;
        self.remaining -= 1;
        slot.entry.as_ref().map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let slot = &self.slots[self.back];
        self.back = slot.prev;
        self.remaining -= 1;
        slot.entry.as_ref().map(|entry| (&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
