//! Shared Cache Logic
//!
//! TTL defaulting, absent-value handling, lazy expiration and get-or-compute,
//! written once against [`EntryStore`] and reused by every strategy.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::cache::entry::validate_ttl;
use crate::cache::{CacheEntry, EntryStore, Retention, StrongRetention};
use crate::error::{CacheError, Result};

// == Cache Core ==
/// Store-independent cache operations.
///
/// Holds the default TTL and the retention strategy. Every method receives
/// the store it operates on, so a strategy decides how access is synchronized.
pub struct CacheCore<V, R = StrongRetention> {
    default_ttl: Duration,
    _retention: PhantomData<fn() -> (V, R)>,
}

impl<V, R: Retention<V>> CacheCore<V, R> {
    // == Constructor ==
    /// # Errors
    /// `CacheError::InvalidArgument` if `default_ttl` is zero.
    pub fn new(default_ttl: Duration) -> Result<Self> {
        validate_ttl(default_ttl)?;
        Ok(Self {
            default_ttl,
            _retention: PhantomData,
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get ==
    /// Reads the value under `key`.
    ///
    /// An entry that is expired or whose value has been reclaimed is removed
    /// from the store and reported as absent. No background sweeper exists,
    /// so this is the only path by which stale entries leave the store apart
    /// from eviction and explicit removal.
    pub fn get<K, S>(&self, store: &mut S, key: &K) -> Option<V>
    where
        S: EntryStore<K, R::Entry> + ?Sized,
    {
        let entry = store.get_entry(key)?;
        let value = entry.value();
        if value.is_none() {
            trace!("removing stale entry");
            store.remove(key);
        }
        value
    }

    // == Put ==
    /// Stores `value` under `key` for `ttl`. An absent value is a no-op.
    ///
    /// # Errors
    /// `CacheError::InvalidArgument` if `ttl` is zero, whether or not a value
    /// was supplied.
    pub fn put<K, S>(&self, store: &mut S, key: K, value: Option<V>, ttl: Duration) -> Result<()>
    where
        S: EntryStore<K, R::Entry> + ?Sized,
    {
        validate_ttl(ttl)?;
        let Some(value) = value else {
            return Ok(());
        };

        let entry = R::create_entry(value, ttl)?;
        store.put_entry(key, Arc::new(entry));
        Ok(())
    }
}

impl<V, R> fmt::Debug for CacheCore<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheCore")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

// == LRU Cache ==
/// Public contract shared by the synchronized and concurrent caches.
///
/// `get_or_compute` is not atomic: two callers missing on the same key at the
/// same time may both run their fallback, and the last write wins.
pub trait LruCache<K, V: Clone> {
    /// Returns the cached value, or `None` if absent, expired or reclaimed.
    fn get(&self, key: &K) -> Option<V>;

    /// Stores a value for an explicit TTL. `None` is silently ignored.
    fn put_with_ttl(&self, key: K, value: impl Into<Option<V>>, ttl: Duration) -> Result<()>;

    /// Removes the entry under `key`, if any.
    fn remove(&self, key: &K);

    fn clear(&self);

    /// Number of stored entries, including stale ones not yet removed.
    fn size(&self) -> usize;

    fn capacity(&self) -> usize;

    /// Default TTL applied when no TTL is given.
    fn ttl(&self) -> Duration;

    /// Stores a value under the default TTL. `None` is silently ignored.
    fn put(&self, key: K, value: impl Into<Option<V>>) -> Result<()> {
        self.put_with_ttl(key, value, self.ttl())
    }

    /// True if a valid value is cached under `key`.
    ///
    /// Goes through `get` rather than raw store membership, since a stored
    /// entry may already be stale.
    fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// True when no entries are stored. Stale entries count as stored.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // == Get Or Compute ==
    /// Returns the cached value or runs `compute` and caches its result under
    /// the default TTL.
    fn get_or_compute<F, E>(&self, key: K, compute: F) -> std::result::Result<V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
        E: From<CacheError>,
    {
        self.get_or_compute_with_ttl(key, compute, self.ttl())
    }

    /// Returns the cached value or runs `compute` and caches its result for
    /// `ttl`.
    ///
    /// A failure from `compute` is returned unchanged and nothing is cached.
    /// The fallback runs without any cache lock held.
    ///
    /// # Errors
    /// `CacheError::InvalidArgument` if `ttl` is zero. The check runs before
    /// the lookup, so a zero `ttl` fails even when `key` is already cached.
    fn get_or_compute_with_ttl<F, E>(
        &self,
        key: K,
        compute: F,
        ttl: Duration,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
        E: From<CacheError>,
    {
        validate_ttl(ttl)?;
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = compute()?;
        self.put_with_ttl(key, value.clone(), ttl)?;
        Ok(value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CapacityLruMap, StrongEntry, WeakEntry, WeakRetention};
    use std::thread::sleep;

    type Store = CapacityLruMap<&'static str, Arc<StrongEntry<String>>>;

    fn new_store(capacity: usize) -> Store {
        CapacityLruMap::new(capacity, 4, 0.75).unwrap()
    }

    fn new_core() -> CacheCore<String> {
        CacheCore::new(Duration::from_secs(3600)).unwrap()
    }

    #[test]
    fn test_core_zero_ttl_rejected() {
        let result = CacheCore::<String>::new(Duration::ZERO);
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }

    #[test]
    fn test_core_put_and_get() {
        let core = new_core();
        let mut store = new_store(4);

        core.put(&mut store, "k", Some("v".to_string()), core.default_ttl())
            .unwrap();

        assert_eq!(core.get(&mut store, &"k"), Some("v".to_string()));
        assert_eq!(core.get(&mut store, &"missing"), None);
    }

    #[test]
    fn test_core_put_absent_is_noop() {
        let core = new_core();
        let mut store = new_store(4);

        core.put(&mut store, "k", None, core.default_ttl()).unwrap();

        assert_eq!(store.len(), 0);
        assert_eq!(core.get(&mut store, &"k"), None);
    }

    #[test]
    fn test_core_put_zero_ttl_rejected() {
        let core = new_core();
        let mut store = new_store(4);

        let result = core.put(&mut store, "k", Some("v".to_string()), Duration::ZERO);
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));

        let result = core.put(&mut store, "k", None, Duration::ZERO);
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_core_get_removes_expired_entry() {
        let core = new_core();
        let mut store = new_store(4);

        core.put(&mut store, "k", Some("v".to_string()), Duration::from_millis(10))
            .unwrap();
        assert_eq!(store.len(), 1);

        sleep(Duration::from_millis(20));

        // Stale entry lingers until accessed
        assert_eq!(store.len(), 1);
        assert_eq!(core.get(&mut store, &"k"), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_core_get_removes_reclaimed_entry() {
        let core: CacheCore<Arc<String>, WeakRetention> =
            CacheCore::new(Duration::from_secs(60)).unwrap();
        let mut store: CapacityLruMap<&str, Arc<WeakEntry<String>>> =
            CapacityLruMap::new(4, 4, 0.75).unwrap();

        let value = Arc::new("v".to_string());
        core.put(&mut store, "k", Some(Arc::clone(&value)), core.default_ttl())
            .unwrap();
        assert_eq!(core.get(&mut store, &"k"), Some(Arc::clone(&value)));

        drop(value);

        assert_eq!(store.len(), 1);
        assert_eq!(core.get(&mut store, &"k"), None);
        assert_eq!(store.len(), 0);
    }
}
