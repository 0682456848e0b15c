//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Failures raised by caller-supplied fallback computations are not wrapped
/// here: `get_or_compute` returns them unchanged in the caller's own error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Non-positive capacity, TTL or load factor
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CacheError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CacheError::InvalidArgument(msg.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = CacheError::invalid("ttl must be positive");
        assert_eq!(err.to_string(), "Invalid argument: ttl must be positive");
    }

    #[test]
    fn test_converts_into_anyhow() {
        let err: anyhow::Error = CacheError::invalid("capacity must be positive").into();
        assert!(err.downcast_ref::<CacheError>().is_some());
    }
}
