//! Entry Store Module
//!
//! The storage capability both cache strategies provide to the shared core.

use std::hash::Hash;
use std::sync::Arc;

use crate::cache::CapacityLruMap;

// == Entry Store ==
/// Storage backing a cache: a bounded mapping from keys to shared entries.
///
/// Each call is one atomic step on the store. Anything spanning several calls
/// is only atomic if the implementor is used under an outer lock.
pub trait EntryStore<K, E> {
    /// Returns the entry stored under `key`, refreshing its recency.
    fn get_entry(&mut self, key: &K) -> Option<Arc<E>>;

    /// Inserts or replaces the entry under `key`, evicting if over capacity.
    fn put_entry(&mut self, key: K, entry: Arc<E>);

    fn remove(&mut self, key: &K);

    fn clear(&mut self);

    /// Number of stored entries, stale ones included.
    fn size(&self) -> usize;

    fn capacity(&self) -> usize;
}

impl<K: Hash + Eq + Clone, E> EntryStore<K, E> for CapacityLruMap<K, Arc<E>> {
    fn get_entry(&mut self, key: &K) -> Option<Arc<E>> {
        self.get(key).cloned()
    }

    fn put_entry(&mut self, key: K, entry: Arc<E>) {
        self.put(key, entry);
    }

    fn remove(&mut self, key: &K) {
        CapacityLruMap::remove(self, key);
    }

    fn clear(&mut self) {
        CapacityLruMap::clear(self);
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn capacity(&self) -> usize {
        CapacityLruMap::capacity(self)
    }
}
