// SQLite RunLog Implementation

use crate::map_sqlx_error;
use async_trait::async_trait;
use quotesweep_core::error::Result;
use quotesweep_core::port::{RunLog, RunRecord};
use sqlx::SqlitePool;

pub struct SqliteRunLog {
    pool: SqlitePool,
}

impl SqliteRunLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RunLog for SqliteRunLog {
    async fn record(&self, entry: &RunRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO purge_runs (started_at, elapsed_seconds, deleted, success, message)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.started_at)
        .bind(entry.elapsed_seconds)
        .bind(entry.deleted)
        .bind(if entry.success { 1 } else { 0 })
        .bind(&entry.message)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<RunRecord>> {
        let rows: Vec<RunRow> = sqlx::query_as(
            r#"
            SELECT started_at, elapsed_seconds, deleted, success, message
            FROM purge_runs
            ORDER BY started_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(RunRow::into_record).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RunRow {
    started_at: i64,
    elapsed_seconds: f64,
    deleted: i64,
    success: i64,
    message: String,
}

impl RunRow {
    fn into_record(self) -> RunRecord {
        RunRecord {
            started_at: self.started_at,
            elapsed_seconds: self.elapsed_seconds,
            deleted: self.deleted,
            success: self.success != 0,
            message: self.message,
        }
    }
}
