// Purge Observer Port
// Keeps the engine free of direct I/O: run progress is reported through
// callbacks, and the production observer writes them to the application log.

use crate::domain::QuoteId;
use crate::port::quote_repository::DeleteOutcome;
use chrono::{TimeZone, Utc};
use tracing::{error, info, warn};

/// Observer for purge-run progress
pub trait PurgeObserver: Send + Sync {
    /// A run started; the cutoff is fixed for the whole run
    fn on_run_started(&self, max_age_days: i64, cutoff_ms: i64);

    /// One page was processed; `total_pages` is the total observed at fetch time
    fn on_page_processed(&self, page: i64, total_pages: i64, deleted: u64);

    /// A record in the page was not deleted
    fn on_delete_skipped(&self, id: &QuoteId, outcome: &DeleteOutcome);

    /// The run finished normally
    fn on_run_completed(&self, total_deleted: u64);
}

/// Production observer emitting `tracing` log entries
pub struct LogPurgeObserver;

impl PurgeObserver for LogPurgeObserver {
    fn on_run_started(&self, max_age_days: i64, cutoff_ms: i64) {
        info!(
            max_age_days,
            cutoff = %format_instant(cutoff_ms),
            "Starting quote maintenance: deleting quotes not updated since cutoff"
        );
    }

    fn on_page_processed(&self, page: i64, total_pages: i64, deleted: u64) {
        info!(page, total_pages, deleted, "Quote maintenance batch processed");
    }

    fn on_delete_skipped(&self, id: &QuoteId, outcome: &DeleteOutcome) {
        match outcome {
            DeleteOutcome::NotFound => {
                warn!(quote_id = %id, "Quote not found during deletion");
            }
            DeleteOutcome::Failed(reason) => {
                error!(quote_id = %id, reason = %reason, "Error deleting quote");
            }
            DeleteOutcome::Deleted => {}
        }
    }

    fn on_run_completed(&self, total_deleted: u64) {
        info!(total_deleted, "Quote maintenance completed");
    }
}

fn format_instant(epoch_ms: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(instant) => instant.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => epoch_ms.to_string(),
    }
}
