//! Recurring driver for the finalization batch. An owned component with
//! an explicit start/stop lifecycle rather than a side effect of module
//! load, so `main` decides when it runs and tests can drive it directly.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use super::orchestrator::FinalizeEngine;

pub struct FinalizeScheduler {
    engine: Arc<FinalizeEngine>,
    every: Duration,
}

impl FinalizeScheduler {
    pub fn new(engine: Arc<FinalizeEngine>, every_minutes: u64) -> Self {
        Self {
            engine,
            every: Duration::from_secs(every_minutes.max(1) * 60),
        }
    }

    /// Spawns the recurring loop. The first pass runs immediately, then
    /// one per interval; a slow pass delays the next tick instead of
    /// bursting to catch up.
    pub fn start(self) -> SchedulerHandle {
        let every = self.every;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_secs = every.as_secs(), "finalization scheduler started");
            loop {
                ticker.tick().await;
                match self.engine.finalize_day_today().await {
                    Ok(outcome) => info!(?outcome, "scheduled finalization pass done"),
                    Err(e) => error!(error = %e, "scheduled finalization pass failed"),
                }
            }
        });
        SchedulerHandle { task }
    }
}

/// Aborts the loop on `stop` (or on drop, via the handle owner).
pub struct SchedulerHandle {
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn stop(self) {
        self.task.abort();
    }
}
