// SQLite SettingsStore Implementation
// Scoped key/value rows; scope '' holds the global value.

use crate::map_sqlx_error;
use async_trait::async_trait;
use quotesweep_core::error::Result;
use quotesweep_core::port::SettingsStore;
use sqlx::SqlitePool;

pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Scoped lookup preferring the store-specific row over the global one
    async fn lookup(&self, key: &str, store_id: Option<&str>) -> Result<Option<String>> {
        let scope = store_id.unwrap_or("");

        let value: Option<String> = sqlx::query_scalar(
            r#"
            SELECT value FROM settings
            WHERE key = ? AND scope IN ('', ?)
            ORDER BY (scope = ?) DESC
            LIMIT 1
            "#,
        )
        .bind(key)
        .bind(scope)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(value)
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn get_flag(&self, key: &str, store_id: Option<&str>) -> Result<bool> {
        let value = self.lookup(key, store_id).await?;
        Ok(matches!(
            value.as_deref(),
            Some("1") | Some("true") | Some("yes")
        ))
    }

    async fn get_int(&self, key: &str, store_id: Option<&str>) -> Result<Option<i64>> {
        let value = self.lookup(key, store_id).await?;
        Ok(value.and_then(|v| v.trim().parse().ok()))
    }

    async fn set(&self, key: &str, store_id: Option<&str>, value: &str) -> Result<()> {
        let scope = store_id.unwrap_or("");

        sqlx::query(
            r#"
            INSERT INTO settings (key, scope, value)
            VALUES (?, ?, ?)
            ON CONFLICT(key, scope) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(scope)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
