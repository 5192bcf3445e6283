// Run Log Port (scheduled-run history)

use crate::error::Result;
use async_trait::async_trait;

/// Outcome of one scheduled purge run
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub started_at: i64, // epoch ms
    pub elapsed_seconds: f64,
    pub deleted: i64,
    pub success: bool,
    pub message: String,
}

/// Persistence for scheduled-run outcomes
#[async_trait]
pub trait RunLog: Send + Sync {
    /// Append one run record
    async fn record(&self, entry: &RunRecord) -> Result<()>;

    /// Most recent runs, newest first
    async fn recent(&self, limit: i64) -> Result<Vec<RunRecord>>;
}
