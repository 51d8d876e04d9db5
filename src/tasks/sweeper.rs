//! Memo Sweeper Task
//!
//! Background task that periodically reclaims expired memo entries that are
//! never looked up again.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::memo::{MemoRegistry, SweepPolicy};

/// Shortest accepted sweep interval; smaller values are raised to it.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

// == Sweeper Handle ==
/// Handle to the running sweeper.
///
/// Dropping the handle closes the shutdown channel, which also stops the task.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
    interval: Duration,
}

impl SweeperHandle {
    /// Signals the task to stop and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            if !e.is_cancelled() {
                warn!(error = %e, "Memo sweeper exited abnormally");
            }
        }
    }

    /// Stops the task without waiting.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Interval the task actually sleeps between sweeps.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Spawns a task that sweeps every store in `registry` each `interval`.
///
/// The first sweep runs one full interval after spawning. A store that fails
/// to sweep is logged and skipped; the schedule is unaffected. Intervals
/// below [`MIN_SWEEP_INTERVAL`] are raised to it.
///
/// # Example
/// ```ignore
/// let registry = MemoRegistry::new();
/// let sweeper = spawn_sweeper(registry.clone(), Duration::from_secs(300), SweepPolicy::EntryTtl);
/// // Later, during shutdown:
/// sweeper.shutdown().await;
/// ```
pub fn spawn_sweeper(
    registry: MemoRegistry,
    interval: Duration,
    policy: SweepPolicy,
) -> SweeperHandle {
    if interval < MIN_SWEEP_INTERVAL {
        warn!(
            requested_ms = interval.as_millis() as u64,
            "Sweep interval too short, using {:?}",
            MIN_SWEEP_INTERVAL
        );
    }
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs_f64(),
            ?policy,
            "Starting memo sweeper"
        );

        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Memo sweeper shutting down");
                        return;
                    }
                    continue;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            let report = registry.sweep_all(policy);

            if report.failures > 0 {
                warn!(
                    stores = report.stores,
                    removed = report.removed,
                    failures = report.failures,
                    "Memo sweep finished with failures"
                );
            } else if report.removed > 0 {
                info!("Memo sweep: removed {} expired entries", report.removed);
            } else {
                debug!("Memo sweep: no expired entries found");
            }
        }
    });

    SweeperHandle {
        shutdown_tx,
        handle,
        interval,
    }
}
