//! LRU (Least Recently Used) cache implementation
//!
//! Pairs an AHash index (key -> [`EntryId`]) with the arena-backed [`List`].
//! Both are updated together by every mutating call, so the index key set
//! always equals the list key set.
//!
//! The cache never evicts on its own. Callers that want a bound check
//! [`LruCache::len`] and call [`LruCache::remove_oldest`] themselves.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::entry::EntryId;
use crate::list::{Iter, List};

/// Unbounded LRU cache
///
/// Not internally synchronized; see [`SharedLru`](crate::SharedLru) for a
/// lock-protected handle.
pub struct LruCache<K, V> {
    map: HashMap<K, EntryId, RandomState>,
    list: List<K, V>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            map: HashMap::with_hasher(RandomState::new()),
            list: List::new(),
        }
    }

    /// Create an empty cache with storage preallocated for `capacity`
    /// entries. This is not a size limit.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            list: List::with_capacity(capacity),
        }
    }

    /// Insert a key-value pair as the most recently used entry
    ///
    /// If `key` is already cached its entry is promoted and the stored value
    /// is kept; `value` is dropped. Use [`LruCache::upsert`] to overwrite.
    pub fn add(&mut self, key: K, value: V) {
        if let Some(&id) = self.map.get(&key) {
            self.list.move_to_front(id);
        } else {
            let id = self.list.prepend(key.clone(), value);
            self.map.insert(key, id);
        }
    }

    /// Insert or overwrite a key-value pair, promoting it to most recently
    /// used. Returns the previous value if the key was present.
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.map.get(&key) {
            self.list.move_to_front(id);
            self.list
                .get_mut(id)
                .map(|(_, slot)| std::mem::replace(slot, value))
        } else {
            let id = self.list.prepend(key.clone(), value);
            self.map.insert(key, id);
            None
        }
    }

    /// Get a value and mark it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.map.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|(_, value)| value)
    }

    /// Get a mutable value and mark it most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.map.get(key)?;
        self.list.move_to_front(id);
        self.list.get_mut(id).map(|(_, value)| value)
    }

    /// Get a value without touching recency order
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.map.get(key)?;
        self.list.get(id).map(|(_, value)| value)
    }

    /// Check if a key is cached, without touching recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Remove a key from the cache
    ///
    /// Returns `true` if the key was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.pop(key).is_some()
    }

    /// Remove a key from the cache and return its value
    pub fn pop<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.map.remove(key)?;
        self.list.remove(id).map(|(_, value)| value)
    }

    /// Evict the least recently used entry
    ///
    /// Returns `None` on an empty cache.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_back()?;
        self.map.remove(&key);
        trace!(remaining = self.list.len(), "evicted least recently used entry");
        Some((key, value))
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        debug!(dropped = self.list.len(), "clearing cache");
        self.map.clear();
        self.list.clear();
    }
}

impl<K, V> LruCache<K, V> {
    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Least recently used entry, without removing or promoting it
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        self.list.back().and_then(|id| self.list.get(id))
    }

    /// Iterate from most to least recently used without changing order
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Visit entries from most to least recently used
    ///
    /// `visit` returns `true` to stop early. Recency order is not changed,
    /// and the shared borrow rules out mutating the cache mid-traversal.
    pub fn iterate<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (key, value) in self.iter() {
            if visit(key, value) {
                break;
            }
        }
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut cache = Self::new();
        cache.extend(iter);
        cache
    }
}
