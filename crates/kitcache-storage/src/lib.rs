//! kitcache-storage: Storage engines for kitcache
//!
//! Two interchangeable engines implement [`kitcache_core::CacheBackend`]:
//!
//! - [`MemoryBackend`]: an in-process table with TTL expiry and a background
//!   sweep task owned by the engine.
//! - [`RedisBackend`]: a Redis client for either a single endpoint or a
//!   sentinel-monitored failover group.
//!
//! Both are built from an ordered list of typed configuration options, see
//! [`CacheOption`].

mod options;

pub use options::{CacheOption, MetricSlot, with_metric};

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::{MemoryBackend, MemoryBuilder, MemoryConfig};

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "redis")]
pub use self::redis::{
    RedisBackend, RedisBuilder, RedisConfig, Topology, with_addresses, with_connection_string,
    with_db_number, with_logger, with_max_retry, with_timeout,
};
