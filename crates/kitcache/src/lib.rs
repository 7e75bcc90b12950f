//! kitcache: Pluggable key-value caching for Rust
//!
//! One capability contract, [`CacheBackend`], over two interchangeable
//! engines:
//!
//! - **In-memory** ([`MemoryBackend`]): concurrent table with TTL expiry and
//!   a background sweep task owned by the engine
//! - **Redis** ([`RedisBackend`]): a single endpoint or a sentinel-monitored
//!   failover group, with every call instrumented
//!
//! Absent keys surface uniformly as [`CacheError::NotFound`] on both.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kitcache::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let cache = MemoryBackend::new(Duration::from_secs(1), Vec::new())?;
//!
//!     cache.set("create", "key", "42", Duration::from_secs(60)).await?;
//!
//!     match cache.get_key("load", "key").await {
//!         Ok(value) => println!("Got: {value}"),
//!         Err(CacheError::NotFound) => println!("Cache miss"),
//!         Err(err) => return Err(err.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export core
pub use kitcache_core::*;

// Re-export storage
pub use kitcache_storage::{CacheOption, MetricSlot, with_metric};

#[cfg(feature = "memory")]
pub use kitcache_storage::{MemoryBackend, MemoryBuilder, MemoryConfig};

#[cfg(feature = "redis")]
pub use kitcache_storage::{
    RedisBackend, RedisBuilder, RedisConfig, Topology, with_addresses, with_connection_string,
    with_db_number, with_logger, with_max_retry, with_timeout,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        CacheBackend, CacheError, CacheOption, Logger, Metric, NoopLogger, NoopMetric, Result,
        with_metric,
    };

    #[cfg(feature = "memory")]
    pub use crate::{MemoryBackend, MemoryConfig};

    #[cfg(feature = "redis")]
    pub use crate::{
        RedisBackend, RedisConfig, Topology, with_addresses, with_connection_string,
        with_db_number, with_logger, with_max_retry, with_timeout,
    };
}
