//! Builder and configuration options for the Redis engine

use std::sync::Arc;
use std::time::Duration;

use kitcache_core::{CacheError, Logger, Metric, NoopLogger, NoopMetric, Result};
use tracing::debug;

use super::backend::RedisBackend;
use super::config::{RedisConfig, Topology};
use crate::options::{CacheOption, MetricSlot, apply_all};

/// Builder the Redis engine's options operate on
///
/// Holds the not-yet-connected configuration plus the metric and logger
/// sinks. Nothing touches the network until [`RedisBuilder::connect`].
pub struct RedisBuilder {
    config: RedisConfig,
    metric: Arc<dyn Metric>,
    logger: Arc<dyn Logger>,
}

impl RedisBuilder {
    pub fn new() -> Self {
        Self::from_config(RedisConfig::default())
    }

    /// Seed the builder from a loaded configuration
    pub fn from_config(config: RedisConfig) -> Self {
        Self {
            config,
            metric: Arc::new(NoopMetric),
            logger: Arc::new(NoopLogger),
        }
    }

    /// Apply options in order
    pub fn apply(mut self, options: impl IntoIterator<Item = CacheOption<Self>>) -> Result<Self> {
        apply_all(&mut self, options)?;
        Ok(self)
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RedisConfig {
        &mut self.config
    }

    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger = logger;
    }

    /// Resolve the topology, connect and probe
    ///
    /// Fails without returning a handle if the configuration is incomplete or
    /// the server cannot be reached.
    pub async fn connect(self) -> Result<RedisBackend> {
        RedisBackend::connect(self.config, self.metric, self.logger).await
    }
}

impl Default for RedisBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSlot for RedisBuilder {
    fn set_metric(&mut self, metric: Arc<dyn Metric>) {
        self.metric = metric;
    }
}

/// Select the topology from a list of addresses
///
/// One address selects a single endpoint (the master name, if any, is
/// ignored). Several addresses select a sentinel group and require a master
/// name.
pub fn with_addresses<I, S>(master_name: Option<&str>, addresses: I) -> CacheOption<RedisBuilder>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let master_name = master_name.map(str::to_string);
    let mut addresses: Vec<String> = addresses.into_iter().map(Into::into).collect();

    Box::new(move |builder: &mut RedisBuilder| {
        let topology = match addresses.len() {
            0 => return Err(CacheError::config("with_addresses() needs at least one address")),
            1 => {
                if master_name.is_some() {
                    debug!("single redis address given, ignoring sentinel master name");
                }
                Topology::Single {
                    address: addresses.remove(0),
                }
            }
            n => match master_name.filter(|name| !name.is_empty()) {
                Some(master_name) => Topology::Sentinel {
                    master_name,
                    addresses,
                },
                None => {
                    return Err(CacheError::config(format!(
                        "{n} redis addresses given without a sentinel master name"
                    )));
                }
            },
        };

        builder.config.topology = Some(topology);
        Ok(())
    })
}

/// Select a database index
pub fn with_db_number(db: i64) -> CacheOption<RedisBuilder> {
    Box::new(move |builder: &mut RedisBuilder| {
        builder.config.db = db;
        Ok(())
    })
}

/// Set the transport-level retry count
pub fn with_max_retry(max_retries: usize) -> CacheOption<RedisBuilder> {
    Box::new(move |builder: &mut RedisBuilder| {
        builder.config.max_retries = Some(max_retries);
        Ok(())
    })
}

/// Set the dial timeout
pub fn with_timeout(timeout: Duration) -> CacheOption<RedisBuilder> {
    Box::new(move |builder: &mut RedisBuilder| {
        builder.config.dial_timeout = Some(timeout);
        Ok(())
    })
}

/// Configure a single endpoint from a connection string
///
/// Replaces the topology, credentials and database index. Tunables such as
/// the timeout and retry count are kept.
pub fn with_connection_string(connection_string: impl Into<String>) -> CacheOption<RedisBuilder> {
    let connection_string = connection_string.into();

    Box::new(move |builder: &mut RedisBuilder| {
        let parsed = RedisConfig::from_connection_string(&connection_string)?;
        builder.config.topology = parsed.topology;
        builder.config.db = parsed.db;
        builder.config.username = parsed.username;
        builder.config.password = parsed.password;
        Ok(())
    })
}

/// Replace the default no-op logger
pub fn with_logger(logger: Arc<dyn Logger>) -> CacheOption<RedisBuilder> {
    Box::new(move |builder: &mut RedisBuilder| {
        builder.set_logger(logger);
        Ok(())
    })
}
