//! Concurrent Cache Module
//!
//! Fine-grained strategy backed by moka's concurrent bounded map. No
//! cache-wide lock is taken; each map operation is atomic on its own.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use tracing::debug;

use crate::cache::{CacheCore, EntryStore, LruCache, Retention, StrongRetention};
use crate::config::{Config, DEFAULT_INITIAL_CAPACITY};
use crate::error::{CacheError, Result};

// == Concurrent Store ==
/// Entry store over a moka cache where every entry weighs 1, so the
/// weighted capacity is the entry count bound.
pub struct ConcurrentStore<K, E> {
    map: Cache<K, Arc<E>>,
    capacity: usize,
}

impl<K, E> ConcurrentStore<K, E>
where
    K: Hash + Eq + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// # Errors
    /// `CacheError::InvalidArgument` if `capacity` is zero.
    pub fn new(capacity: usize, initial_capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::invalid("capacity must be positive"));
        }

        let map = Cache::builder()
            .max_capacity(capacity as u64)
            .initial_capacity(initial_capacity.min(capacity))
            .weigher(|_key: &K, _entry: &Arc<E>| -> u32 { 1 })
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Ok(Self { map, capacity })
    }
}

// Implemented on a shared reference: the map synchronizes internally, so the
// store never needs exclusive access.
impl<K, E> EntryStore<K, E> for &ConcurrentStore<K, E>
where
    K: Hash + Eq + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn get_entry(&mut self, key: &K) -> Option<Arc<E>> {
        self.map.get(key)
    }

    fn put_entry(&mut self, key: K, entry: Arc<E>) {
        self.map.insert(key, entry);
        // Apply the pending eviction now so the bound holds once put returns
        self.map.run_pending_tasks();
    }

    fn remove(&mut self, key: &K) {
        self.map.invalidate(key);
    }

    fn clear(&mut self) {
        self.map.invalidate_all();
        self.map.run_pending_tasks();
    }

    fn size(&self) -> usize {
        self.map.run_pending_tasks();
        self.map.entry_count() as usize
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

// == Concurrent LRU Cache ==
/// Cache for workloads with many threads.
///
/// Operations on different keys proceed independently. Operations on the
/// same key are only as ordered as the map makes them: concurrent puts are
/// last-write-wins, and a read racing a write sees the old or the new entry.
/// A stale entry discovered by `get` is removed unconditionally, so a value
/// written by another thread in between can be dropped with it.
pub struct ConcurrentLruCache<K, V, R = StrongRetention>
where
    R: Retention<V>,
{
    core: CacheCore<V, R>,
    store: ConcurrentStore<K, R::Entry>,
}

impl<K, V, R> ConcurrentLruCache<K, V, R>
where
    K: Hash + Eq + Send + Sync + 'static,
    R: Retention<V>,
{
    // == Constructors ==
    /// # Errors
    /// `CacheError::InvalidArgument` if `capacity` or `ttl` is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        Self::with_initial_capacity(capacity, ttl, DEFAULT_INITIAL_CAPACITY)
    }

    pub fn with_initial_capacity(
        capacity: usize,
        ttl: Duration,
        initial_capacity: usize,
    ) -> Result<Self> {
        let core = CacheCore::new(ttl)?;
        let store = ConcurrentStore::new(capacity, initial_capacity)?;
        debug!(capacity, ttl_ms = ttl.as_millis() as u64, "concurrent cache created");

        Ok(Self { core, store })
    }

    /// Creates a cache from configuration, ignoring its strategy and load
    /// factor fields.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_initial_capacity(
            config.capacity,
            config.default_ttl(),
            config.initial_capacity,
        )
    }
}

impl<K, V, R> LruCache<K, V> for ConcurrentLruCache<K, V, R>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone,
    R: Retention<V>,
{
    fn get(&self, key: &K) -> Option<V> {
        self.core.get(&mut &self.store, key)
    }

    fn put_with_ttl(&self, key: K, value: impl Into<Option<V>>, ttl: Duration) -> Result<()> {
        self.core.put(&mut &self.store, key, value.into(), ttl)
    }

    fn remove(&self, key: &K) {
        (&self.store).remove(key);
    }

    fn clear(&self) {
        (&self.store).clear();
    }

    fn size(&self) -> usize {
        (&self.store).size()
    }

    fn capacity(&self) -> usize {
        self.store.capacity
    }

    fn ttl(&self) -> Duration {
        self.core.default_ttl()
    }
}

impl<K, V, R: Retention<V>> fmt::Debug for ConcurrentLruCache<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentLruCache")
            .field("core", &self.core)
            .field("capacity", &self.store.capacity)
            .finish_non_exhaustive()
    }
}
