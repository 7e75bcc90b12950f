//! Redis backend implementation

mod backend;
mod config;
mod connection;
mod options;

pub use backend::RedisBackend;
pub use config::{RedisConfig, Topology};
pub use options::{
    RedisBuilder, with_addresses, with_connection_string, with_db_number, with_logger,
    with_max_retry, with_timeout,
};

use kitcache_core::CacheError;
use redis::RedisError;

/// Translate a client error into the shared vocabulary, keeping its message
pub(crate) fn map_redis_error(err: &RedisError) -> CacheError {
    if err.is_timeout() {
        CacheError::Timeout
    } else if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
        CacheError::Connection(err.to_string())
    } else {
        CacheError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::ErrorKind;

    #[test]
    fn test_map_response_error() {
        let err = RedisError::from((ErrorKind::ResponseError, "WRONGTYPE", "bad".to_string()));
        match map_redis_error(&err) {
            CacheError::Backend(message) => assert!(message.contains("WRONGTYPE")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_map_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RedisError::from(io);
        assert!(matches!(map_redis_error(&err), CacheError::Connection(_)));
    }

    #[test]
    fn test_map_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        let err = RedisError::from(io);
        assert_eq!(map_redis_error(&err), CacheError::Timeout);
    }
}
