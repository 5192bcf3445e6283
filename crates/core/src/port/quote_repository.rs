// Quote Repository Port (Interface)

use crate::domain::{Quote, QuoteId};
use crate::error::Result;
use async_trait::async_trait;

/// One page of the stale-quote set, as observed at fetch time
///
/// `total_pages` is recomputed from the current store state on every fetch,
/// so it shrinks as deletions land. The purge loop terminates once the
/// requested page number exceeds it.
#[derive(Debug, Clone)]
pub struct StaleQuotePage {
    pub quotes: Vec<Quote>,
    pub total_pages: i64,
}

/// Outcome of a single deletion attempt, as classified by the purge engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Failed(String),
}

/// Repository interface for Quote persistence
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Insert a new quote
    async fn insert(&self, quote: &Quote) -> Result<()>;

    /// Find quote by ID
    async fn find_by_id(&self, id: &QuoteId) -> Result<Option<Quote>>;

    /// Fetch one page of quotes with `updated_at <= cutoff_ms`
    ///
    /// Pages are 1-based. A request past the last page returns an empty page
    /// together with the currently observed total.
    async fn find_stale_page(
        &self,
        cutoff_ms: i64,
        page_size: i64,
        page: i64,
    ) -> Result<StaleQuotePage>;

    /// Delete a quote by ID
    ///
    /// Returns `AppError::NotFound` when the quote no longer exists (already
    /// removed by a concurrent actor or a prior partial run).
    async fn delete_by_id(&self, id: &QuoteId) -> Result<()>;
}
