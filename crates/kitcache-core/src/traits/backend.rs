//! Cache backend trait

use async_trait::async_trait;
use std::time::Duration;

use crate::CacheError;

/// Capability contract shared by every cache engine
///
/// All operations are safe to call concurrently on the same handle.
/// Cancellation and deadlines follow the usual async rules: dropping the
/// returned future (for example through `tokio::time::timeout`) abandons
/// the call.
///
/// `method` is a metrics label naming the caller-side operation. It never
/// influences routing or storage.
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Liveness check, side-effect free from the caller's perspective
    async fn ping(&self) -> Result<(), CacheError>;

    /// Read a key
    ///
    /// Returns [`CacheError::NotFound`] if the key is absent or expired.
    async fn get_key(&self, method: &str, key: &str) -> Result<String, CacheError>;

    /// Unconditionally store `value` under `key`
    ///
    /// Overwrites any prior value and resets its expiry. A zero `ttl`
    /// stores the entry without expiry.
    async fn set(&self, method: &str, key: &str, value: &str, ttl: Duration)
    -> Result<(), CacheError>;

    /// Remove a key
    ///
    /// Removing an absent key is not an error.
    async fn remove_key(&self, method: &str, key: &str) -> Result<(), CacheError>;
}
