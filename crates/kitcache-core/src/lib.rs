//! kitcache-core: Core traits and types for the kitcache library
//!
//! This crate provides the capability contract every cache engine implements,
//! the error vocabulary shared by all engines, and the metric and logger
//! capabilities the engines report through.

mod error;
mod traits;

#[cfg(feature = "tracing")]
mod tracing;

pub use error::{CacheError, Result};
pub use traits::*;

#[cfg(feature = "tracing")]
pub use crate::tracing::{TracingLogger, TracingMetric};
