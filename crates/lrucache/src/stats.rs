//! Cache statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};

/// Kinds of cache activity counted by [`CacheStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatEvent {
    /// Promoting lookup that found its key
    Hit,
    /// Promoting lookup that missed
    Miss,
    /// Key newly added
    Insert,
    /// Key removed explicitly
    Removal,
    /// Entry dropped through `remove_oldest`
    Eviction,
}

const EVENT_KINDS: usize = 5;

/// Counters recorded by [`SharedLru`](crate::SharedLru)
///
/// Relaxed atomics: counts are eventually exact, but a snapshot taken while
/// other threads record may mix old and new values.
#[derive(Debug, Default)]
pub struct CacheStats {
    counters: [AtomicU64; EVENT_KINDS],
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    /// Promoting lookups that found their key
    pub hits: u64,
    /// Promoting lookups that missed
    pub misses: u64,
    /// Keys newly added to the cache
    pub inserts: u64,
    /// Keys removed explicitly by key
    pub removals: u64,
    /// Entries dropped through `remove_oldest`
    pub evictions: u64,
    /// `hits / (hits + misses)`, 0.0 before any lookup
    pub hit_ratio: f64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `event`
    pub fn record(&self, event: StatEvent) {
        self.counters[event as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for `event`
    pub fn count(&self, event: StatEvent) -> u64 {
        self.counters[event as usize].load(Ordering::Relaxed)
    }

    /// Copy every counter out at once
    pub fn snapshot(&self) -> StatsSnapshot {
        let hits = self.count(StatEvent::Hit);
        let misses = self.count(StatEvent::Miss);
        let lookups = hits + misses;

        StatsSnapshot {
            hits,
            misses,
            inserts: self.count(StatEvent::Insert),
            removals: self.count(StatEvent::Removal),
            evictions: self.count(StatEvent::Eviction),
            hit_ratio: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }

    /// Zero every counter
    pub fn reset(&self) {
        for counter in &self.counters {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
