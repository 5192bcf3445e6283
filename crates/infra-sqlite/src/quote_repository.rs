// SQLite QuoteRepository Implementation

use crate::map_sqlx_error;
use async_trait::async_trait;
use quotesweep_core::domain::{Quote, QuoteId, QuotePayload};
use quotesweep_core::error::{AppError, Result};
use quotesweep_core::port::{QuoteRepository, StaleQuotePage};
use sqlx::SqlitePool;

pub struct SqliteQuoteRepository {
    pool: SqlitePool,
}

impl SqliteQuoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRepository for SqliteQuoteRepository {
    async fn insert(&self, quote: &Quote) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quotes (id, store_id, created_at, updated_at, payload)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&quote.id)
        .bind(&quote.store_id)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .bind(quote.payload.as_value().to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &QuoteId) -> Result<Option<Quote>> {
        let row = sqlx::query_as::<_, QuoteRow>("SELECT * FROM quotes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(QuoteRow::into_quote))
    }

    async fn find_stale_page(
        &self,
        cutoff_ms: i64,
        page_size: i64,
        page: i64,
    ) -> Result<StaleQuotePage> {
        let matching: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes WHERE updated_at <= ?")
            .bind(cutoff_ms)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let total_pages = if matching == 0 {
            0
        } else {
            (matching + page_size - 1) / page_size
        };

        if page > total_pages {
            return Ok(StaleQuotePage {
                quotes: Vec::new(),
                total_pages,
            });
        }

        let offset = (page - 1) * page_size;
        let rows: Vec<QuoteRow> = sqlx::query_as(
            r#"
            SELECT * FROM quotes
            WHERE updated_at <= ?
            ORDER BY updated_at ASC, id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(cutoff_ms)
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(StaleQuotePage {
            quotes: rows.into_iter().map(QuoteRow::into_quote).collect(),
            total_pages,
        })
    }

    async fn delete_by_id(&self, id: &QuoteId) -> Result<()> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Quote {} not found", id)));
        }

        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: String,
    store_id: Option<String>,
    created_at: i64,
    updated_at: i64,
    payload: String,
}

impl QuoteRow {
    fn into_quote(self) -> Quote {
        let payload: serde_json::Value =
            serde_json::from_str(&self.payload).unwrap_or(serde_json::json!({}));

        Quote {
            id: self.id,
            store_id: self.store_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            payload: QuotePayload::new(payload),
        }
    }
}
