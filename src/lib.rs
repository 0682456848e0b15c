//! Simple LRU Cache - A capacity-bounded in-process TTL cache
//!
//! Provides memoization with lazy TTL expiration, LRU eviction, strong or
//! weak value retention, and a choice between a single-lock cache and a
//! concurrent one.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{ConcurrentLruCache, LruCache, StrongRetention, SynchronizedLruCache, WeakRetention};
pub use config::{Config, Strategy};
pub use error::{CacheError, Result};
