//! Purge Scheduler - Recurring trigger for the quote purge
//!
//! Runs the purge on a fixed interval in the background, records every
//! outcome in the run log, and never lets a run failure escape the loop.

use crate::application::purge::QuotePurgeService;
use crate::port::{RunLog, RunRecord, TimeProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{error, info};

pub struct PurgeScheduler {
    purge: Arc<QuotePurgeService>,
    run_log: Arc<dyn RunLog>,
    time: Arc<dyn TimeProvider>,
    interval_hours: u64,
}

impl PurgeScheduler {
    pub fn new(
        purge: Arc<QuotePurgeService>,
        run_log: Arc<dyn RunLog>,
        time: Arc<dyn TimeProvider>,
        interval_hours: u64,
    ) -> Self {
        Self {
            purge,
            run_log,
            time,
            interval_hours,
        }
    }

    /// Run the schedule loop (background task)
    ///
    /// The first run happens immediately on start; afterwards one run per
    /// interval until the shutdown signal fires. Should be spawned in
    /// tokio::spawn.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_hours = self.interval_hours,
            "Purge scheduler started"
        );

        let mut tick = interval(Duration::from_secs(self.interval_hours * 3600));

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.run_once().await;
                }
                _ = shutdown.changed() => {
                    info!("Purge scheduler stopping");
                    break;
                }
            }
        }
    }

    /// Run the purge once and record the outcome
    ///
    /// Failures (including the disabled check) are absorbed here: they are
    /// logged and recorded but never propagated to the schedule loop.
    pub async fn run_once(&self) -> RunRecord {
        let started_at = self.time.now_millis();
        let started = Instant::now();

        let record = match self.purge.execute(false).await {
            Ok(deleted) => {
                let elapsed = started.elapsed().as_secs_f64();
                let message = format!("Deleted {} quote(s) in {:.5} seconds.", deleted, elapsed);
                info!(deleted, elapsed_seconds = elapsed, "{}", message);
                RunRecord {
                    started_at,
                    elapsed_seconds: elapsed,
                    deleted: deleted as i64,
                    success: true,
                    message,
                }
            }
            Err(e) => {
                let elapsed = started.elapsed().as_secs_f64();
                let message = format!("Error during quote maintenance: {}", e);
                error!(error = ?e, "Scheduled quote maintenance failed");
                RunRecord {
                    started_at,
                    elapsed_seconds: elapsed,
                    deleted: 0,
                    success: false,
                    message,
                }
            }
        };

        if let Err(e) = self.run_log.record(&record).await {
            error!(error = ?e, "Failed to record purge run");
        }

        record
    }
}
