//! SharedLru: lock-protected LRU cache handle

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::lru::LruCache;
use crate::stats::{CacheStats, StatEvent};

/// Cloneable handle to an [`LruCache`] behind a `RwLock`
///
/// Every call holds the lock for its whole duration. Lookups that promote
/// (`get`, `add`) need the write lock; `peek`, `contains`, `len` and
/// iteration only read.
pub struct SharedLru<K, V> {
    /// Cache state
    cache: Arc<RwLock<LruCache<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,
}

impl<K, V> Clone for SharedLru<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K, V> SharedLru<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create an empty shared cache
    pub fn new() -> Self {
        Self::from_cache(LruCache::new())
    }

    /// Wrap an existing cache
    pub fn from_cache(cache: LruCache<K, V>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Insert without overwriting, see [`LruCache::add`]
    pub fn add(&self, key: K, value: V) {
        let mut cache = self.cache.write();
        if !cache.contains(&key) {
            self.stats.record(StatEvent::Insert);
        }
        cache.add(key, value);
    }

    /// Insert or overwrite, see [`LruCache::upsert`]
    pub fn upsert(&self, key: K, value: V) -> Option<V> {
        let previous = self.cache.write().upsert(key, value);
        if previous.is_none() {
            self.stats.record(StatEvent::Insert);
        }
        previous
    }

    /// Get a copy of a value and mark it most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.cache.write().get(key).cloned();
        match value {
            Some(_) => self.stats.record(StatEvent::Hit),
            None => self.stats.record(StatEvent::Miss),
        }
        value
    }

    /// Get a copy of a value without touching recency order or stats
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.read().peek(key).cloned()
    }

    /// Check if a key is cached
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.read().contains(key)
    }

    /// Remove a key, returning `true` if it was present
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.cache.write().remove(key);
        if removed {
            self.stats.record(StatEvent::Removal);
        }
        removed
    }

    /// Evict the least recently used entry
    pub fn remove_oldest(&self) -> Option<(K, V)> {
        let evicted = self.cache.write().remove_oldest();
        if evicted.is_some() {
            self.stats.record(StatEvent::Eviction);
        }
        evicted
    }

    /// Clear the cache and reset statistics
    pub fn clear(&self) {
        self.cache.write().clear();
        self.stats.reset();
    }

    /// Copy out every entry, most recently used first
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.cache
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K, V> SharedLru<K, V> {
    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Visit entries most recently used first while holding the read lock
    ///
    /// `visit` returns `true` to stop. It must not call back into this
    /// handle's mutating methods.
    pub fn iterate<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.cache.read().iterate(visit);
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<K, V> Default for SharedLru<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_basic() {
        let cache = SharedLru::new();

        cache.add(1, String::from("a"));
        assert_eq!(cache.get(&1), Some(String::from("a")));
        assert_eq!(cache.get(&2), None);

        assert_eq!(cache.stats().count(StatEvent::Hit), 1);
        assert_eq!(cache.stats().count(StatEvent::Miss), 1);
        assert_eq!(cache.stats().count(StatEvent::Insert), 1);
    }

    #[test]
    fn test_shared_repeat_add_counts_once() {
        let cache = SharedLru::new();

        cache.add("x", 1);
        cache.add("x", 2);
        assert_eq!(cache.upsert("x", 3), Some(1));

        assert_eq!(cache.stats().count(StatEvent::Insert), 1);
        assert_eq!(cache.peek("x"), Some(3));
    }

    #[test]
    fn test_shared_remove_and_evict() {
        let cache = SharedLru::new();

        cache.add("a", 1);
        cache.add("b", 2);
        cache.add("c", 3);

        assert!(cache.remove("b"));
        assert!(!cache.remove("b"));
        assert_eq!(cache.remove_oldest(), Some(("a", 1)));
        assert_eq!(cache.snapshot(), vec![("c", 3)]);

        let snap = cache.stats().snapshot();
        assert_eq!(snap.removals, 1);
        assert_eq!(snap.evictions, 1);
    }

    #[test]
    fn test_shared_clear() {
        let cache = SharedLru::new();

        cache.add(1, 1);
        cache.get(&1);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats().count(StatEvent::Hit), 0);
        assert_eq!(cache.remove_oldest(), None);
    }

    #[test]
    fn test_shared_iterate() {
        let cache = SharedLru::new();

        cache.add("a", 1);
        cache.add("b", 2);

        let mut seen = Vec::new();
        cache.iterate(|key, value| {
            seen.push((*key, *value));
            false
        });
        assert_eq!(seen, vec![("b", 2), ("a", 1)]);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = SharedLru::new();

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100u64 {
                        cache.add(t * 1000 + i, i);
                        cache.get(&(t * 1000 + i));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 400);
        assert_eq!(cache.stats().count(StatEvent::Insert), 400);
        assert_eq!(cache.stats().count(StatEvent::Hit), 400);
        assert_eq!(cache.snapshot().len(), 400);
    }
}
