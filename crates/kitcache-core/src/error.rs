//! Error types for cache operations

use thiserror::Error;

/// Main error type for all cache operations
///
/// `NotFound` is an expected outcome rather than a failure: every engine
/// returns it, and only it, when a key is absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache
    #[error("key not-found")]
    NotFound,

    /// Invalid or incomplete engine configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Backend connection failed
    #[error("connection error: {0}")]
    Connection(String),

    /// Backend operation failed
    #[error("backend error: {0}")]
    Backend(String),

    /// Timeout
    #[error("operation timed out")]
    Timeout,
}

impl CacheError {
    /// Shorthand for building a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        CacheError::Config(message.into())
    }

    /// Whether this is the uniform absent-key sentinel
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound)
    }

    /// Whether the error was raised while building an engine
    pub fn is_config(&self) -> bool {
        matches!(self, CacheError::Config(_))
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
