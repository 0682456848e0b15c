//! Cache Module
//!
//! Provides capacity-bounded in-memory caching with TTL expiration, LRU
//! eviction and two interchangeable concurrency strategies.

mod base;
mod concurrent;
mod entry;
mod lru;
mod map;
mod store;
mod synchronized;


// Re-export public types
pub use base::{CacheCore, LruCache};
pub use concurrent::{ConcurrentLruCache, ConcurrentStore};
pub use entry::{CacheEntry, Retention, StrongEntry, StrongRetention, WeakEntry, WeakRetention};
pub use lru::LruTracker;
pub use map::CapacityLruMap;
pub use store::EntryStore;
pub use synchronized::SynchronizedLruCache;
