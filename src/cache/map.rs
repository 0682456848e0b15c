//! Capacity-Bounded Map Module
//!
//! A hash map that remembers access order and drops its least recently used
//! mapping as soon as an insertion pushes it over capacity.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

use crate::cache::LruTracker;
use crate::error::{CacheError, Result};

// == Capacity LRU Map ==
/// Bounded map with access-order eviction.
///
/// Both reads (`get`) and writes (`put`) refresh a key's recency. Eviction
/// happens inside `put`, so no caller ever observes more than `capacity`
/// mappings.
#[derive(Debug)]
pub struct CapacityLruMap<K, V> {
    /// Key-value storage
    entries: HashMap<K, V>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Maximum number of mappings
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> CapacityLruMap<K, V> {
    // == Constructor ==
    /// Creates a new map.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of mappings, must be positive
    /// * `initial_capacity` - Expected number of mappings, used to pre-size storage
    /// * `load_factor` - Target fill ratio of the backing table, must be positive and finite
    pub fn new(capacity: usize, initial_capacity: usize, load_factor: f32) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::invalid("capacity must be positive"));
        }
        if !(load_factor.is_finite() && load_factor > 0.0) {
            return Err(CacheError::invalid(format!(
                "load factor must be positive, got {}",
                load_factor
            )));
        }

        // Never reserve past what the bound allows, plus the one transient overflow slot
        let hint = initial_capacity.min(capacity + 1);
        let reserved = ((hint as f64) / f64::from(load_factor.min(1.0))).ceil() as usize;

        Ok(Self {
            entries: HashMap::with_capacity(reserved),
            lru: LruTracker::with_capacity(reserved),
            capacity,
        })
    }

    // == Get ==
    /// Returns the value for `key`, marking it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.entries.contains_key(key) {
            self.lru.touch(key);
        }
        self.entries.get(key)
    }

    // == Put ==
    /// Inserts or replaces a mapping, marking it most recently used.
    ///
    /// Returns the previous value, if any. When the insertion raises the size
    /// above capacity, the least recently used mapping is evicted first.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.lru.touch(&key);
        let previous = self.entries.insert(key, value);

        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                trace!(capacity = self.capacity, "evicted least recently used mapping");
            }
        }

        previous
    }

    // == Remove ==
    /// Removes a mapping, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.lru.remove(key);
        }
        removed
    }

    /// Removes every mapping.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Contains Key ==
    /// Checks for a mapping without refreshing recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of mappings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 8] = ["aa", "bb", "cc", "dd", "ee", "ff", "gg", "hh"];
    const VALUES: [&str; 8] = ["aaa", "bbb", "ccc", "ddd", "eer", "fff", "ggg", "hhh"];

    fn new_map(capacity: usize) -> CapacityLruMap<&'static str, &'static str> {
        CapacityLruMap::new(capacity, 1, 0.75).unwrap()
    }

    #[test]
    fn test_map_zero_capacity_rejected() {
        let result = CapacityLruMap::<String, String>::new(0, 1, 0.75);
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }

    #[test]
    fn test_map_bad_load_factor_rejected() {
        for load_factor in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            let result = CapacityLruMap::<String, String>::new(4, 1, load_factor);
            assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_map_capacity() {
        let capacity = 5;
        let mut map = new_map(capacity);
        assert!(map.is_empty());

        for i in 0..capacity {
            map.put(KEYS[i], VALUES[i]);
        }
        assert_eq!(map.len(), capacity);

        for i in capacity..KEYS.len() {
            map.put(KEYS[i], VALUES[i]);
        }
        assert_eq!(map.len(), capacity);
        assert_eq!(map.capacity(), capacity);

        for key in &KEYS[..KEYS.len() - capacity] {
            assert!(!map.contains_key(key));
        }
        for key in &KEYS[KEYS.len() - capacity..] {
            assert!(map.contains_key(key));
        }
    }

    #[test]
    fn test_map_get_refreshes_recency() {
        let mut map = new_map(3);
        map.put("a", "1");
        map.put("b", "2");
        map.put("c", "3");

        assert_eq!(map.get(&"a"), Some(&"1"));
        map.put("d", "4");

        assert!(map.contains_key(&"a"));
        assert!(!map.contains_key(&"b"));
    }

    #[test]
    fn test_map_contains_key_keeps_recency() {
        let mut map = new_map(2);
        map.put("a", "1");
        map.put("b", "2");

        assert!(map.contains_key(&"a"));
        map.put("c", "3");

        assert!(!map.contains_key(&"a"));
        assert!(map.contains_key(&"b"));
    }

    #[test]
    fn test_map_overwrite_does_not_evict() {
        let mut map = new_map(2);
        map.put("a", "1");
        map.put("b", "2");

        assert_eq!(map.put("a", "10"), Some("1"));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"a"), Some(&"10"));
        assert_eq!(map.get(&"b"), Some(&"2"));
    }

    #[test]
    fn test_map_remove_and_clear() {
        let mut map = new_map(4);
        map.put("a", "1");
        map.put("b", "2");

        assert_eq!(map.remove(&"a"), Some("1"));
        assert_eq!(map.remove(&"a"), None);
        assert_eq!(map.len(), 1);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get(&"b"), None);
    }
}
