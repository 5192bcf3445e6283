// Quotesweep Infrastructure - SQLite Adapter
// Implements: QuoteRepository, SettingsStore, RunLog

mod connection;
mod migration;
mod quote_repository;
mod run_log;
mod settings_store;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use quote_repository::SqliteQuoteRepository;
pub use run_log::SqliteRunLog;
pub use settings_store::SqliteSettingsStore;

use quotesweep_core::error::AppError;

// Shared sqlx::Error conversion (orphan rules prevent a From impl in core)
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code.as_ref() {
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    code => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        _ => AppError::Database(err.to_string()),
    }
}
