//! Interval-driven background loops for the periodic sweeps.
//!
//! One task per concern: budget auto-renewal, recurring-transaction
//! processing, and daily snapshots. Each loop runs its sweep to completion
//! and checks the shutdown signal between iterations; per-row atomic units
//! inside the sweeps are the cancellation-safe checkpoints, so stopping the
//! loops never leaves a row half-updated. Sweeps filter on persisted
//! status/due-date fields, which makes a restarted sweep skip rows already
//! advanced past the due threshold.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::core::services::{ProcessingService, RenewalService, SnapshotService};
use crate::core::Clock;
use crate::store::MemoryStore;

/// Wake intervals for the three background loops.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub renewal_interval: Duration,
    pub processing_interval: Duration,
    pub snapshot_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            renewal_interval: Duration::from_secs(24 * 60 * 60),
            processing_interval: Duration::from_secs(60 * 60),
            snapshot_interval: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Handle over the spawned background loops.
pub struct Scheduler {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawns the three loops on the current tokio runtime.
    pub fn start(
        store: Arc<MemoryStore>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Scheduler {
        let (shutdown, _) = watch::channel(false);

        let renewal = {
            let store = Arc::clone(&store);
            let clock = Arc::clone(&clock);
            spawn_loop(
                "budget-renewal",
                config.renewal_interval,
                shutdown.subscribe(),
                move || {
                    RenewalService::run_sweep(&store, clock.as_ref());
                },
            )
        };
        let processing = {
            let store = Arc::clone(&store);
            let clock = Arc::clone(&clock);
            spawn_loop(
                "recurring-processing",
                config.processing_interval,
                shutdown.subscribe(),
                move || {
                    ProcessingService::run_sweep(&store, clock.as_ref());
                },
            )
        };
        let snapshots = spawn_loop(
            "daily-snapshots",
            config.snapshot_interval,
            shutdown.subscribe(),
            move || {
                SnapshotService::record_daily(&store, clock.as_ref());
            },
        );

        Scheduler {
            shutdown,
            handles: vec![renewal, processing, snapshots],
        }
    }

    /// Signals every loop to stop after its current iteration and waits for
    /// them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
        info!("scheduler stopped");
    }
}

fn spawn_loop(
    name: &'static str,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    job: impl Fn() + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(loop_name = name, ?period, "background loop started");
        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately; run the sweep once on startup.
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(&job));
                    if result.is_err() {
                        error!(loop_name = name, "background sweep panicked");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(loop_name = name, "background loop stopping");
                        break;
                    }
                }
            }
        }
    })
}
