//! Configuration Module
//!
//! Cache construction parameters, loadable from environment variables or
//! deserialized from a host application's configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

// == Defaults ==
/// Default maximum number of entries
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default TTL applied when `put` is called without one
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default sizing hint for the backing map
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Default target fill ratio of the synchronized cache's backing map
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

// == Strategy ==
/// Which concurrency strategy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One exclusive lock around the whole cache
    #[default]
    Synchronized,
    /// Concurrent bounded map, no cache-wide lock
    Concurrent,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synchronized" => Ok(Strategy::Synchronized),
            "concurrent" => Ok(Strategy::Concurrent),
            other => Err(format!("unknown cache strategy: {}", other)),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Values are validated when a cache is built from them, not here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Default TTL in milliseconds
    pub default_ttl_ms: u64,
    /// Sizing hint for the backing map
    pub initial_capacity: usize,
    /// Load factor of the synchronized cache's backing map
    pub load_factor: f32,
    /// Concurrency strategy
    pub strategy: Strategy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `LRU_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `LRU_INITIAL_CAPACITY` - Backing map sizing hint (default: 16)
    /// - `LRU_LOAD_FACTOR` - Backing map load factor (default: 0.75)
    /// - `LRU_STRATEGY` - `synchronized` or `concurrent` (default: synchronized)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("LRU_CAPACITY", defaults.capacity),
            default_ttl_ms: env_or("LRU_DEFAULT_TTL_MS", defaults.default_ttl_ms),
            initial_capacity: env_or("LRU_INITIAL_CAPACITY", defaults.initial_capacity),
            load_factor: env_or("LRU_LOAD_FACTOR", defaults.load_factor),
            strategy: env_or("LRU_STRATEGY", defaults.strategy),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl_ms: DEFAULT_TTL.as_millis() as u64,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            strategy: Strategy::default(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.default_ttl(), Duration::from_secs(300));
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.load_factor, 0.75);
        assert_eq!(config.strategy, Strategy::Synchronized);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("LRU_CAPACITY");
        env::remove_var("LRU_DEFAULT_TTL_MS");
        env::remove_var("LRU_INITIAL_CAPACITY");
        env::remove_var("LRU_LOAD_FACTOR");
        env::remove_var("LRU_STRATEGY");

        let config = Config::from_env();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("synchronized".parse::<Strategy>(), Ok(Strategy::Synchronized));
        assert_eq!(" Concurrent ".parse::<Strategy>(), Ok(Strategy::Concurrent));
        assert!("sharded".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: Config =
            serde_json::from_str(r#"{"capacity": 64, "strategy": "concurrent"}"#).unwrap();

        assert_eq!(config.capacity, 64);
        assert_eq!(config.strategy, Strategy::Concurrent);
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.load_factor, DEFAULT_LOAD_FACTOR);
    }
}
