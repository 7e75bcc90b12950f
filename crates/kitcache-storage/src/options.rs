//! Typed configuration options

use std::sync::Arc;

use kitcache_core::{Metric, Result};

/// A configuration mutator for the builder `B`
///
/// Engines take an ordered list of options and apply them one after the
/// other to a builder of their own concrete type. An option written for a
/// different engine's builder is a type error rather than a silent no-op.
pub type CacheOption<B> = Box<dyn FnOnce(&mut B) -> Result<()> + Send>;

/// Builders that accept a metric sink
pub trait MetricSlot {
    fn set_metric(&mut self, metric: Arc<dyn Metric>);
}

/// Replace the default no-op metric sink
///
/// Accepted by every engine builder.
pub fn with_metric<B: MetricSlot + 'static>(metric: Arc<dyn Metric>) -> CacheOption<B> {
    Box::new(move |builder: &mut B| {
        builder.set_metric(metric);
        Ok(())
    })
}

/// Apply `options` to `builder` in order, stopping at the first failure
pub(crate) fn apply_all<B>(
    builder: &mut B,
    options: impl IntoIterator<Item = CacheOption<B>>,
) -> Result<()> {
    for option in options {
        option(builder)?;
    }
    Ok(())
}
