//! Background task that reclaims expired entries

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use kitcache_core::{CacheError, Result};

use super::table::Table;

/// Handle to one engine's sweep task
///
/// The task stops when [`Sweeper::stop`] is awaited or when the handle is
/// dropped, whichever comes first.
#[derive(Debug)]
pub(crate) struct Sweeper {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawn the sweep task on the current Tokio runtime
    pub(crate) fn spawn(table: Arc<Table>, interval: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| {
            CacheError::config("in-memory cache must be created inside a Tokio runtime")
        })?;

        let (shutdown, signal) = oneshot::channel();
        let task = runtime.spawn(run(table, interval, signal));

        Ok(Self {
            shutdown: Some(shutdown),
            task: Some(task),
        })
    }

    /// Signal the task and wait for it to finish
    pub(crate) async fn stop(&mut self) {
        self.signal();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    fn signal(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.signal();
    }
}

async fn run(table: Arc<Table>, interval: Duration, mut signal: oneshot::Receiver<()>) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!(interval_ms = interval.as_millis() as u64, "memory sweeper started");

    loop {
        tokio::select! {
            // Resolves on an explicit signal or when the sender is dropped
            _ = &mut signal => break,
            _ = ticker.tick() => {
                let removed = table.sweep(Instant::now());
                if removed > 0 {
                    trace!(removed, remaining = table.len(), "swept expired entries");
                }
            }
        }
    }

    debug!("memory sweeper stopped");
}
