// Quote Purge Engine
// Batched deletion of quotes not updated within the retention window.

use crate::domain::Quote;
use crate::error::{AppError, Result};
use crate::port::{
    DeleteOutcome, MaintenanceConfig, PurgeObserver, QuoteRepository, TimeProvider,
};
use std::sync::Arc;


pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

const DISABLED_MESSAGE: &str = "Quote maintenance is disabled. \
Enable the quote_maintenance/enabled setting or run with --force to override.";

/// Batched stale-quote deletion service
///
/// Resolves the maintenance settings once per run, computes a fixed cutoff,
/// then pages through the matching set deleting record by record. Record-level
/// failures are contained; only the disabled check and infrastructure errors
/// from the settings store or pagination escape.
pub struct QuotePurgeService {
    config: MaintenanceConfig,
    quotes: Arc<dyn QuoteRepository>,
    time: Arc<dyn TimeProvider>,
    observer: Arc<dyn PurgeObserver>,
    store_id: Option<String>,
}

impl QuotePurgeService {
    pub fn new(
        config: MaintenanceConfig,
        quotes: Arc<dyn QuoteRepository>,
        time: Arc<dyn TimeProvider>,
        observer: Arc<dyn PurgeObserver>,
    ) -> Self {
        Self {
            config,
            quotes,
            time,
            observer,
            store_id: None,
        }
    }

    /// Resolve settings in the given storefront scope instead of the global one
    pub fn with_scope(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    /// Execute quote deletion
    ///
    /// # Arguments
    /// * `force` - Run even if maintenance is disabled in configuration
    ///
    /// # Returns
    /// Total number of quotes deleted
    pub async fn execute(&self, force: bool) -> Result<u64> {
        let scope = self.store_id.as_deref();

        if !force && !self.config.is_enabled(scope).await? {
            return Err(AppError::MaintenanceDisabled(DISABLED_MESSAGE.to_string()));
        }

        let settings = self.config.resolve(scope).await?;

        // Captured once: pages fetched later must not see a moving cutoff.
        let now = self.time.now_millis();
        let cutoff = now - settings.max_age_days * MILLIS_PER_DAY;

        self.observer.on_run_started(settings.max_age_days, cutoff);

        let mut total_deleted: u64 = 0;
        let mut page: i64 = 1;

        loop {
            let batch = self
                .quotes
                .find_stale_page(cutoff, settings.batch_size, page)
                .await?;

            // Totals shrink as deletions land; running past the observed
            // total is the normal termination condition.
            if page > batch.total_pages {
                break;
            }

            let deleted = self.delete_page(&batch.quotes).await;
            total_deleted += deleted;

            self.observer
                .on_page_processed(page, batch.total_pages, deleted);

            page += 1;
        }

        self.observer.on_run_completed(total_deleted);

        Ok(total_deleted)
    }

    /// Delete every quote in one page, isolating per-record failures
    async fn delete_page(&self, quotes: &[Quote]) -> u64 {
        let mut deleted: u64 = 0;

        for quote in quotes {
            let outcome = match self.quotes.delete_by_id(&quote.id).await {
                Ok(()) => DeleteOutcome::Deleted,
                Err(AppError::NotFound(_)) => DeleteOutcome::NotFound,
                Err(e) => DeleteOutcome::Failed(e.to_string()),
            };

            match outcome {
                DeleteOutcome::Deleted => deleted += 1,
                skipped => self.observer.on_delete_skipped(&quote.id, &skipped),
            }
        }

        deleted
    }
}
