//! Connection handling for both topologies

use std::io;
use std::time::Duration;

use parking_lot::RwLock;
use redis::aio::{ConnectionManager, ConnectionManagerConfig, MultiplexedConnection};
use redis::sentinel::{SentinelClient, SentinelNodeConnectionInfo, SentinelServerType};
use redis::{
    Client, Cmd, ConnectionAddr, ConnectionInfo, FromRedisValue, RedisConnectionInfo, RedisError,
    RedisResult,
};
use tokio::sync::Mutex;
use tokio::time;
use tracing::{debug, warn};

use kitcache_core::{CacheError, Result};

use super::config::{DEFAULT_PORT, ResolvedConfig, Topology};
use super::map_redis_error;

/// An open connection for the resolved topology
pub(crate) enum Connection {
    /// Auto-reconnecting multiplexed connection to one server
    Single(ConnectionManager),
    /// Connection to the master currently advertised by the sentinels
    Sentinel(SentinelConnection),
}

impl Connection {
    /// Dial the configured topology, bounded by the dial timeout
    pub(crate) async fn open(config: &ResolvedConfig) -> Result<Self> {
        match &config.topology {
            Topology::Single { address } => {
                let client = Client::open(connection_info(address, config)?)
                    .map_err(|e| CacheError::config(format!("invalid redis address {address}: {e}")))?;
                let manager_config =
                    ConnectionManagerConfig::new().set_number_of_retries(config.max_retries);

                let manager = time::timeout(
                    config.dial_timeout,
                    ConnectionManager::new_with_config(client, manager_config),
                )
                .await
                .map_err(|_| CacheError::Timeout)?
                .map_err(|e| map_redis_error(&e))?;

                debug!(%address, db = config.db, "connected to redis");
                Ok(Connection::Single(manager))
            }
            Topology::Sentinel {
                master_name,
                addresses,
            } => SentinelConnection::open(master_name, addresses, config)
                .await
                .map(Connection::Sentinel),
        }
    }

    /// Run one command on the current connection
    pub(crate) async fn query<T: FromRedisValue>(&self, cmd: &Cmd) -> RedisResult<T> {
        match self {
            Connection::Single(manager) => {
                let mut conn = manager.clone();
                cmd.query_async(&mut conn).await
            }
            Connection::Sentinel(sentinel) => sentinel.query(cmd).await,
        }
    }
}

/// Connection info for one server; credentials are passed through as given
fn connection_info(address: &str, config: &ResolvedConfig) -> Result<ConnectionInfo> {
    Ok(ConnectionInfo {
        addr: tcp_addr(address)?,
        redis: node_info(config),
    })
}

/// Database and credentials used on every data node
fn node_info(config: &ResolvedConfig) -> RedisConnectionInfo {
    RedisConnectionInfo {
        db: config.db,
        username: config.username.clone().filter(|u| !u.is_empty()),
        password: config.password.clone().filter(|p| !p.is_empty()),
        ..Default::default()
    }
}

/// Split `host[:port]` (IPv6 hosts in brackets), defaulting the port
fn tcp_addr(address: &str) -> Result<ConnectionAddr> {
    let invalid = || CacheError::config(format!("invalid redis address: {address}"));
    let address = address.trim();

    let (host, port) = match address.strip_prefix('[') {
        Some(rest) => {
            let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
            match tail {
                "" => (host, None),
                _ => (host, Some(tail.strip_prefix(':').ok_or_else(invalid)?)),
            }
        }
        None => match address.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (address, None),
        },
    };

    if host.is_empty() {
        return Err(invalid());
    }
    let port = match port {
        Some(port) => port.parse().map_err(|_| invalid())?,
        None => DEFAULT_PORT,
    };

    Ok(ConnectionAddr::Tcp(host.to_string(), port))
}

fn is_connection_error(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal()
}

/// Master connection that follows sentinel failovers
///
/// On a connection-class failure the master is looked up again through the
/// monitors and the command retried, at most `max_retries` times.
pub(crate) struct SentinelConnection {
    client: Mutex<SentinelClient>,
    current: RwLock<MultiplexedConnection>,
    master_name: String,
    dial_timeout: Duration,
    max_retries: usize,
}

impl SentinelConnection {
    async fn open(master_name: &str, addresses: &[String], config: &ResolvedConfig) -> Result<Self> {
        let sentinels = addresses
            .iter()
            .map(|address| {
                tcp_addr(address).map(|addr| ConnectionInfo {
                    addr,
                    redis: RedisConnectionInfo::default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let node = SentinelNodeConnectionInfo {
            tls_mode: None,
            redis_connection_info: Some(node_info(config)),
        };

        let mut client = SentinelClient::build(
            sentinels,
            master_name.to_string(),
            Some(node),
            SentinelServerType::Master,
        )
        .map_err(|e| CacheError::config(format!("invalid sentinel configuration: {e}")))?;

        let conn = dial(&mut client, config.dial_timeout)
            .await
            .map_err(|e| map_redis_error(&e))?;

        debug!(master = %master_name, sentinels = addresses.len(), db = config.db, "connected to sentinel master");

        Ok(Self {
            client: Mutex::new(client),
            current: RwLock::new(conn),
            master_name: master_name.to_string(),
            dial_timeout: config.dial_timeout,
            max_retries: config.max_retries,
        })
    }

    async fn query<T: FromRedisValue>(&self, cmd: &Cmd) -> RedisResult<T> {
        with_failover(
            &self.master_name,
            self.max_retries,
            || {
                let mut conn = self.current.read().clone();
                async move { cmd.query_async(&mut conn).await }
            },
            || self.refresh(),
        )
        .await
    }

    /// Ask the sentinels for the current master and reconnect
    async fn refresh(&self) -> RedisResult<()> {
        let mut client = self.client.lock().await;
        let conn = dial(&mut client, self.dial_timeout).await?;
        *self.current.write() = conn;
        Ok(())
    }
}

/// Run `call`, re-resolving through `refresh` after each connection-class
/// failure, for at most `max_retries` extra attempts
async fn with_failover<T, C, CF, R, RF>(
    master_name: &str,
    max_retries: usize,
    mut call: C,
    mut refresh: R,
) -> RedisResult<T>
where
    C: FnMut() -> CF,
    CF: Future<Output = RedisResult<T>>,
    R: FnMut() -> RF,
    RF: Future<Output = RedisResult<()>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Err(err) if attempt < max_retries && is_connection_error(&err) => {
                attempt += 1;
                warn!(
                    master = %master_name,
                    attempt,
                    error = %err,
                    "sentinel master unreachable, re-resolving"
                );
                refresh().await?;
            }
            result => return result,
        }
    }
}

async fn dial(client: &mut SentinelClient, timeout: Duration) -> RedisResult<MultiplexedConnection> {
    match time::timeout(timeout, client.get_async_connection()).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "sentinel dial timed out").into()),
    }
}
