//! Synchronized Cache Module
//!
//! Coarse-grained strategy: a capacity-bounded LRU map behind one mutex.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheCore, CapacityLruMap, LruCache, Retention, StrongRetention};
use crate::config::{Config, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::error::Result;

// == Synchronized LRU Cache ==
/// Cache where every operation holds a single cache-wide lock for its full
/// duration.
///
/// Simple and strictly ordered, but all callers serialize on the lock. The
/// fallback of `get_or_compute` runs outside the lock, so it may call back
/// into the cache.
pub struct SynchronizedLruCache<K, V, R = StrongRetention>
where
    R: Retention<V>,
{
    core: CacheCore<V, R>,
    map: Mutex<CapacityLruMap<K, Arc<R::Entry>>>,
}

impl<K, V, R> SynchronizedLruCache<K, V, R>
where
    K: Hash + Eq + Clone,
    R: Retention<V>,
{
    // == Constructors ==
    /// Creates a cache with the default sizing hint and load factor.
    ///
    /// # Errors
    /// `CacheError::InvalidArgument` if `capacity` or `ttl` is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        Self::with_options(capacity, ttl, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    pub fn with_initial_capacity(
        capacity: usize,
        ttl: Duration,
        initial_capacity: usize,
    ) -> Result<Self> {
        Self::with_options(capacity, ttl, initial_capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a cache with an explicit sizing hint and load factor for the
    /// backing map.
    ///
    /// # Errors
    /// `CacheError::InvalidArgument` if `capacity` or `ttl` is zero, or if
    /// `load_factor` is not a positive finite number.
    pub fn with_options(
        capacity: usize,
        ttl: Duration,
        initial_capacity: usize,
        load_factor: f32,
    ) -> Result<Self> {
        let core = CacheCore::new(ttl)?;
        let map = CapacityLruMap::new(capacity, initial_capacity, load_factor)?;
        debug!(capacity, ttl_ms = ttl.as_millis() as u64, "synchronized cache created");

        Ok(Self {
            core,
            map: Mutex::new(map),
        })
    }

    /// Creates a cache from configuration, ignoring its strategy field.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_options(
            config.capacity,
            config.default_ttl(),
            config.initial_capacity,
            config.load_factor,
        )
    }
}

impl<K, V, R> LruCache<K, V> for SynchronizedLruCache<K, V, R>
where
    K: Hash + Eq + Clone,
    V: Clone,
    R: Retention<V>,
{
    fn get(&self, key: &K) -> Option<V> {
        let mut map = self.map.lock();
        self.core.get(&mut *map, key)
    }

    fn put_with_ttl(&self, key: K, value: impl Into<Option<V>>, ttl: Duration) -> Result<()> {
        let mut map = self.map.lock();
        self.core.put(&mut *map, key, value.into(), ttl)
    }

    fn remove(&self, key: &K) {
        self.map.lock().remove(key);
    }

    fn clear(&self) {
        self.map.lock().clear();
    }

    fn size(&self) -> usize {
        self.map.lock().len()
    }

    fn capacity(&self) -> usize {
        self.map.lock().capacity()
    }

    fn ttl(&self) -> Duration {
        self.core.default_ttl()
    }
}

impl<K, V, R: Retention<V>> fmt::Debug for SynchronizedLruCache<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynchronizedLruCache")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}
