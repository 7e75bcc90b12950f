//! Core traits for cache operations

mod backend;
mod logger;
mod metric;

pub use backend::CacheBackend;
pub use logger::{Field, LogLevel, Logger, NoopLogger};
pub use metric::{Metric, NoopMetric};

#[cfg(feature = "metrics")]
pub use metric::MetricsCrateMetric;
