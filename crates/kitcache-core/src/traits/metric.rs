//! Metric capability consumed by the cache engines

use std::time::Duration;

/// Trait for cache metrics/observability
///
/// Label values are positional. Both engines report `[backend, op, method]`
/// for totals and latency, and append the error message for errors.
///
/// Implement this to integrate with your metrics system (Prometheus, StatsD, etc.)
pub trait Metric: Send + Sync + 'static {
    /// Count one call
    fn increment_total(&self, labels: &[&str]);

    /// Count one failed call
    fn increment_error(&self, labels: &[&str]);

    /// Record how long a call took
    fn observe_response_time(&self, duration: Duration, labels: &[&str]);
}

/// No-op metrics implementation (default)
///
/// Zero overhead when metrics are not needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetric;

impl Metric for NoopMetric {
    #[inline]
    fn increment_total(&self, _labels: &[&str]) {}

    #[inline]
    fn increment_error(&self, _labels: &[&str]) {}

    #[inline]
    fn observe_response_time(&self, _duration: Duration, _labels: &[&str]) {}
}

/// Metric adapter using the `metrics` crate
///
/// Emits `<prefix>_total` and `<prefix>_error` counters and a
/// `<prefix>_response_time` histogram (seconds). Positional label values are
/// paired with the configured label names; values past the end of the name
/// list are named `label_<index>`.
///
/// # Example
/// ```ignore
/// use kitcache_core::MetricsCrateMetric;
///
/// // Set up a metrics recorder (e.g., prometheus exporter)
/// // metrics::set_global_recorder(recorder);
///
/// let metric = MetricsCrateMetric::new("catalog_cache");
/// // Emits: catalog_cache_total{backend,operation,method}, ...
/// ```
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsCrateMetric {
    prefix: String,
    labels: Vec<String>,
    error_labels: Vec<String>,
}

#[cfg(feature = "metrics")]
impl MetricsCrateMetric {
    /// Create a new adapter with the given metric name prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            labels: vec!["backend".into(), "operation".into(), "method".into()],
            error_labels: vec![
                "backend".into(),
                "operation".into(),
                "method".into(),
                "error".into(),
            ],
        }
    }

    /// Replace the label names used for totals and latency
    ///
    /// Error label names follow unless set explicitly afterwards.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self.error_labels = self.labels.clone();
        self
    }

    /// Replace the label names used for error counts
    pub fn with_error_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    fn metric_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }

    fn pair(names: &[String], values: &[&str]) -> Vec<(String, String)> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let name = names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("label_{i}"));
                (name, (*value).to_string())
            })
            .collect()
    }

    fn label_set(names: &[String], values: &[&str]) -> Vec<metrics::Label> {
        Self::pair(names, values)
            .into_iter()
            .map(|(name, value)| metrics::Label::new(name, value))
            .collect()
    }
}

#[cfg(feature = "metrics")]
impl Metric for MetricsCrateMetric {
    fn increment_total(&self, labels: &[&str]) {
        let labels = Self::label_set(&self.labels, labels);
        metrics::counter!(self.metric_name("total"), labels).increment(1);
    }

    fn increment_error(&self, labels: &[&str]) {
        let labels = Self::label_set(&self.error_labels, labels);
        metrics::counter!(self.metric_name("error"), labels).increment(1);
    }

    fn observe_response_time(&self, duration: Duration, labels: &[&str]) {
        let labels = Self::label_set(&self.labels, labels);
        metrics::histogram!(self.metric_name("response_time"), labels)
            .record(duration.as_secs_f64());
    }
}
