//! In-memory cache backend using DashMap

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use kitcache_core::{CacheBackend, CacheError, Metric, NoopMetric, Result};

use super::sweeper::Sweeper;
use super::table::{Entry, Table};
use crate::options::{CacheOption, MetricSlot, apply_all};

const BACKEND: &str = "mem";

/// Configuration for the memory backend
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// How often the background task removes expired entries
    pub sweep_interval: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl MemoryConfig {
    /// Create config with a specific sweep interval
    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self { sweep_interval }
    }
}

/// Builder the memory engine's options operate on
pub struct MemoryBuilder {
    config: MemoryConfig,
    metric: Arc<dyn Metric>,
}

impl MemoryBuilder {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            metric: Arc::new(NoopMetric),
        }
    }

    /// Apply options in order
    pub fn apply(mut self, options: impl IntoIterator<Item = CacheOption<Self>>) -> Result<Self> {
        apply_all(&mut self, options)?;
        Ok(self)
    }

    /// Override the sweep interval
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    /// Validate the configuration and start the engine
    ///
    /// Must be called from within a Tokio runtime; the sweep task is spawned
    /// on it.
    pub fn build(self) -> Result<MemoryBackend> {
        if self.config.sweep_interval.is_zero() {
            return Err(CacheError::config("sweep interval must be greater than zero"));
        }

        let table = Arc::new(Table::new());
        let sweeper = Sweeper::spawn(table.clone(), self.config.sweep_interval)?;

        Ok(MemoryBackend {
            table,
            metric: self.metric,
            config: self.config,
            sweeper,
        })
    }
}

impl Default for MemoryBuilder {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

impl MetricSlot for MemoryBuilder {
    fn set_metric(&mut self, metric: Arc<dyn Metric>) {
        self.metric = metric;
    }
}

/// In-memory cache backend
///
/// Entries become unreadable as soon as their TTL elapses; the background
/// sweep task only reclaims their memory. The engine owns its table and its
/// sweep task: dropping the engine (or awaiting [`MemoryBackend::close`])
/// stops the task.
pub struct MemoryBackend {
    table: Arc<Table>,
    metric: Arc<dyn Metric>,
    config: MemoryConfig,
    sweeper: Sweeper,
}

impl MemoryBackend {
    /// Create an engine sweeping every `sweep_interval`, configured by `options`
    pub fn new(sweep_interval: Duration, options: Vec<CacheOption<MemoryBuilder>>) -> Result<Self> {
        MemoryBuilder::new(MemoryConfig::with_sweep_interval(sweep_interval))
            .apply(options)?
            .build()
    }

    /// Start building an engine from `config`
    pub fn builder(config: MemoryConfig) -> MemoryBuilder {
        MemoryBuilder::new(config)
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self> {
        MemoryBuilder::default().build()
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run one sweep pass now and return the number of entries removed
    pub fn sweep(&self) -> usize {
        self.table.sweep(Instant::now())
    }

    /// Stop the background sweep task and wait for it to exit
    pub async fn close(mut self) {
        self.sweeper.stop().await;
    }

    fn record(&self, op: &str, method: &str, started: std::time::Instant) {
        let labels = [BACKEND, op, method];
        self.metric.increment_total(&labels);
        self.metric.observe_response_time(started.elapsed(), &labels);
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get_key(&self, method: &str, key: &str) -> Result<String> {
        let started = std::time::Instant::now();
        let value = self.table.get(key, Instant::now());
        self.record("get", method, started);

        value.ok_or(CacheError::NotFound)
    }

    async fn set(&self, method: &str, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let started = std::time::Instant::now();
        self.table
            .insert(key, Entry::new(value.to_string(), ttl, Instant::now()));
        self.record("set", method, started);

        Ok(())
    }

    async fn remove_key(&self, method: &str, key: &str) -> Result<()> {
        let started = std::time::Instant::now();
        self.table.remove(key);
        self.record("del", method, started);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::with_metric;
    use parking_lot::Mutex;
    use tokio::time;

    #[derive(Default)]
    struct RecordingMetric {
        totals: Mutex<Vec<Vec<String>>>,
        latencies: Mutex<usize>,
    }

    impl Metric for RecordingMetric {
        fn increment_total(&self, labels: &[&str]) {
            self.totals
                .lock()
                .push(labels.iter().map(|l| l.to_string()).collect());
        }

        fn increment_error(&self, _labels: &[&str]) {}

        fn observe_response_time(&self, _duration: Duration, _labels: &[&str]) {
            *self.latencies.lock() += 1;
        }
    }

    #[tokio::test]
    async fn test_basic_get_set() {
        let backend = MemoryBackend::new(Duration::from_secs(1), Vec::new()).unwrap();

        backend
            .set("test", "key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();

        let value = backend.get_key("test", "key1").await.unwrap();
        assert_eq!(value, "value1");
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let backend = MemoryBackend::with_defaults().unwrap();
        let err = backend.get_key("test", "nonexistent").await.unwrap_err();
        assert_eq!(err, CacheError::NotFound);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let backend = MemoryBackend::with_defaults().unwrap();

        backend.remove_key("test", "missing").await.unwrap();

        backend
            .set("test", "key1", "value1", Duration::ZERO)
            .await
            .unwrap();
        backend.remove_key("test", "key1").await.unwrap();
        backend.remove_key("test", "key1").await.unwrap();

        assert!(backend.get_key("test", "key1").await.unwrap_err().is_not_found());
        assert!(backend.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_write_wins() {
        let backend = MemoryBackend::new(Duration::from_secs(1), Vec::new()).unwrap();

        backend
            .set("test", "k", "v1", Duration::from_secs(60))
            .await
            .unwrap();
        backend
            .set("test", "k", "v2", Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(backend.get_key("test", "k").await.unwrap(), "v2");

        // Expiry comes from the second write only
        time::sleep(Duration::from_secs(3)).await;
        assert!(backend.get_key("test", "k").await.unwrap_err().is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_scenario() {
        let backend = MemoryBackend::new(Duration::from_secs(1), Vec::new()).unwrap();

        backend
            .set("nop", "a", "x", Duration::from_secs(3))
            .await
            .unwrap();
        backend
            .set("nop", "b", "y", Duration::from_secs(1))
            .await
            .unwrap();

        time::sleep(Duration::from_secs(2)).await;

        assert_eq!(
            backend.get_key("nop", "b").await.unwrap_err(),
            CacheError::NotFound
        );
        assert_eq!(backend.get_key("nop", "a").await.unwrap(), "x");
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweep_reclaims_entries() {
        let backend = MemoryBackend::new(Duration::from_secs(1), Vec::new()).unwrap();

        backend
            .set("test", "k", "v", Duration::from_millis(200))
            .await
            .unwrap();
        assert_eq!(backend.len(), 1);

        time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(backend.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_sweep() {
        let backend = MemoryBackend::new(Duration::from_secs(3600), Vec::new()).unwrap();

        backend
            .set("test", "short", "v", Duration::from_secs(1))
            .await
            .unwrap();
        backend
            .set("test", "long", "v", Duration::from_secs(60))
            .await
            .unwrap();

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(backend.sweep(), 1);
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let err = MemoryBackend::new(Duration::ZERO, Vec::new()).err().unwrap();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_metric_option_records_calls() {
        let metric = Arc::new(RecordingMetric::default());
        let backend = MemoryBackend::new(
            Duration::from_secs(1),
            vec![with_metric(metric.clone())],
        )
        .unwrap();

        backend
            .set("create_user", "k", "v", Duration::from_secs(5))
            .await
            .unwrap();
        backend.get_key("load_user", "k").await.unwrap();
        let _ = backend.get_key("load_user", "missing").await;
        backend.remove_key("drop_user", "k").await.unwrap();

        let totals = metric.totals.lock();
        assert_eq!(totals.len(), 4);
        assert_eq!(totals[0], vec!["mem", "set", "create_user"]);
        assert_eq!(totals[1], vec!["mem", "get", "load_user"]);
        assert_eq!(totals[3], vec!["mem", "del", "drop_user"]);
        assert_eq!(*metric.latencies.lock(), 4);
    }

    #[tokio::test]
    async fn test_builder() {
        let backend = MemoryBackend::builder(MemoryConfig::default())
            .sweep_interval(Duration::from_millis(250))
            .build()
            .unwrap();

        assert_eq!(backend.config().sweep_interval, Duration::from_millis(250));
        backend.ping().await.unwrap();
        backend.close().await;
    }

    #[tokio::test]
    async fn test_independent_instances() {
        let first = MemoryBackend::with_defaults().unwrap();
        let second = MemoryBackend::with_defaults().unwrap();

        first
            .set("test", "shared", "one", Duration::ZERO)
            .await
            .unwrap();

        assert!(second.get_key("test", "shared").await.unwrap_err().is_not_found());
        assert_eq!(first.get_key("test", "shared").await.unwrap(), "one");
    }
}
