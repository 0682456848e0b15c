//! Cache Entry Module
//!
//! Defines individual cache entries with TTL support and the two value
//! retention strategies (strong and weak).

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crate::error::{CacheError, Result};

// == Cache Entry ==
/// A stored value plus its expiration instant.
///
/// Entries are immutable once created. Replacing a value means inserting a
/// new entry under the same key.
pub trait CacheEntry<V>: Send + Sync {
    /// Returns the value while the entry is valid, `None` once the TTL has
    /// elapsed or the value has been reclaimed.
    fn value(&self) -> Option<V>;

    /// Instant after which the entry is no longer valid.
    fn expires_at(&self) -> Instant;

    // == Is Expired ==
    /// Checks if the TTL has elapsed.
    ///
    /// Boundary condition: the entry is still valid at exactly `expires_at`
    /// and expired strictly after it.
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at()
    }
}

/// Rejects a zero TTL.
pub(crate) fn validate_ttl(ttl: Duration) -> Result<()> {
    if ttl.is_zero() {
        return Err(CacheError::invalid("ttl must be positive"));
    }
    Ok(())
}

/// Computes `now + ttl`, saturating for absurdly long TTLs.
fn expiration_from_now(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl)
        .unwrap_or_else(|| now + Duration::from_secs(u32::MAX as u64))
}

// == Strong Entry ==
/// Entry owning its value outright. Invalidity is driven purely by TTL.
#[derive(Debug, Clone)]
pub struct StrongEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> StrongEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    ///
    /// # Errors
    /// `CacheError::InvalidArgument` if `ttl` is zero.
    pub fn new(value: V, ttl: Duration) -> Result<Self> {
        validate_ttl(ttl)?;
        Ok(Self {
            value,
            expires_at: expiration_from_now(ttl),
        })
    }
}

impl<V: Clone + Send + Sync> CacheEntry<V> for StrongEntry<V> {
    fn value(&self) -> Option<V> {
        if self.is_expired() {
            None
        } else {
            Some(self.value.clone())
        }
    }

    fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

// == Weak Entry ==
/// Entry holding only a weak handle to a shared value.
///
/// The value is reclaimed as soon as the last `Arc` held outside the cache is
/// dropped, independently of the TTL. Reclamation reads exactly like expiry.
#[derive(Debug)]
pub struct WeakEntry<T> {
    value: Weak<T>,
    expires_at: Instant,
}

impl<T> WeakEntry<T> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now, downgrading `value`.
    pub fn new(value: &Arc<T>, ttl: Duration) -> Result<Self> {
        validate_ttl(ttl)?;
        Ok(Self {
            value: Arc::downgrade(value),
            expires_at: expiration_from_now(ttl),
        })
    }
}

impl<T: Send + Sync> CacheEntry<Arc<T>> for WeakEntry<T> {
    fn value(&self) -> Option<Arc<T>> {
        if self.is_expired() {
            None
        } else {
            self.value.upgrade()
        }
    }

    fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

// == Retention ==
/// Chooses how a cache retains its values by deciding which entry type is
/// created on `put`.
pub trait Retention<V>: 'static {
    type Entry: CacheEntry<V> + 'static;

    /// Creates the entry stored for `value`.
    fn create_entry(value: V, ttl: Duration) -> Result<Self::Entry>;
}

/// Values are held until removed, evicted or expired.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrongRetention;

impl<V: Clone + Send + Sync + 'static> Retention<V> for StrongRetention {
    type Entry = StrongEntry<V>;

    fn create_entry(value: V, ttl: Duration) -> Result<Self::Entry> {
        StrongEntry::new(value, ttl)
    }
}

/// Values (`Arc<T>`) live only as long as some caller keeps a handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeakRetention;

impl<T: Send + Sync + 'static> Retention<Arc<T>> for WeakRetention {
    type Entry = WeakEntry<T>;

    fn create_entry(value: Arc<T>, ttl: Duration) -> Result<Self::Entry> {
        WeakEntry::new(&value, ttl)
    }
}
