//! Adapters that report through `tracing`

use std::fmt;
use std::time::Duration;

use tracing::{debug, error, info, trace, warn};

use crate::{Field, LogLevel, Logger, Metric};

/// Renders structured fields as `key=value` pairs
struct Fields<'a, 'b>(&'a [Field<'b>]);

impl fmt::Display for Fields<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Logger adapter that emits `tracing` events under the `kitcache` target
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    /// Service name/prefix (optional)
    service_name: Option<String>,
}

impl TracingLogger {
    /// Create new tracing logger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with service name prefix
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, fields: &[Field<'_>]) {
        let fields = Fields(fields);
        match level {
            LogLevel::Debug => {
                debug!(target: "kitcache", service = ?self.service_name, fields = %fields, "{message}")
            }
            LogLevel::Info => {
                info!(target: "kitcache", service = ?self.service_name, fields = %fields, "{message}")
            }
            LogLevel::Warn => {
                warn!(target: "kitcache", service = ?self.service_name, fields = %fields, "{message}")
            }
            LogLevel::Error => {
                error!(target: "kitcache", service = ?self.service_name, fields = %fields, "{message}")
            }
        }
    }
}

/// Metrics adapter that logs events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetric {
    /// Service name/prefix (optional)
    service_name: Option<String>,
}

impl TracingMetric {
    /// Create new tracing metrics adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with service name prefix
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl Metric for TracingMetric {
    fn increment_total(&self, labels: &[&str]) {
        trace!(
            target: "kitcache",
            event = "call",
            labels = ?labels,
            service = ?self.service_name,
            "Cache Call"
        );
    }

    fn increment_error(&self, labels: &[&str]) {
        debug!(
            target: "kitcache",
            event = "error",
            labels = ?labels,
            service = ?self.service_name,
            "Cache Error"
        );
    }

    fn observe_response_time(&self, duration: Duration, labels: &[&str]) {
        trace!(
            target: "kitcache",
            event = "latency",
            labels = ?labels,
            duration_us = duration.as_micros() as u64,
            service = ?self.service_name,
            "Cache Operation Latency"
        );
    }
}
