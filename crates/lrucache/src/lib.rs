//! # lrucache
//!
//! Unbounded least-recently-used cache with O(1) operations.
//!
//! ## Architecture
//! - **Index**: AHash map from key to entry handle (O(1) lookup)
//! - **Ordered list**: arena-backed doubly linked list with head/tail
//!   sentinels (O(1) prepend, promote, detach)
//! - **SharedLru**: `RwLock` handle with hit/miss statistics for use across
//!   threads
//!
//! The cache applies no capacity bound. Callers decide when to call
//! [`LruCache::remove_oldest`].
//!
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new();
//! cache.add("a", 1);
//! cache.add("b", 2);
//! cache.get("a");
//!
//! assert_eq!(cache.remove_oldest(), Some(("b", 2)));
//! ```

#![warn(missing_docs)]

mod entry;
mod list;
mod lru;
mod shared;
mod stats;

pub use entry::EntryId;
pub use list::{Iter, List};
pub use lru::LruCache;
pub use shared::SharedLru;
pub use stats::{CacheStats, StatEvent, StatsSnapshot};
