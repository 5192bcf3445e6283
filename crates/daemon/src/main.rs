//! Quotesweep Daemon - Scheduled quote maintenance
//!
//! Composition root: wires the SQLite adapters into the core purge engine
//! and runs the purge scheduler until Ctrl+C.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quotesweep_core::application::{PurgeScheduler, QuotePurgeService};
use quotesweep_core::port::{
    LogPurgeObserver, MaintenanceConfig, RunLog, SettingsStore, SystemTimeProvider, TimeProvider,
};
use quotesweep_infra_sqlite::{
    create_pool, run_migrations, SqliteQuoteRepository, SqliteRunLog, SqliteSettingsStore,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.quotesweep/quotes.db";
const DEFAULT_INTERVAL_HOURS: u64 = 24;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (pretty for development, JSON for production)
    let _log_guard = init_logging()?;

    info!("Quotesweep daemon v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("QUOTESWEEP_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    let interval_hours: u64 = std::env::var("QUOTESWEEP_INTERVAL_HOURS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_HOURS);

    ensure_parent_dir(&db_path)?;

    info!(db_path = %db_path, "Initializing database...");

    // 3. Initialize database
    let pool = create_pool(&db_path)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let settings_store: Arc<dyn SettingsStore> = Arc::new(SqliteSettingsStore::new(pool.clone()));
    let run_log: Arc<dyn RunLog> = Arc::new(SqliteRunLog::new(pool.clone()));

    let purge = Arc::new(QuotePurgeService::new(
        MaintenanceConfig::new(settings_store),
        Arc::new(SqliteQuoteRepository::new(pool.clone())),
        time_provider.clone(),
        Arc::new(LogPurgeObserver),
    ));

    // 5. Start the purge scheduler
    info!(interval_hours, "Starting purge scheduler...");
    let scheduler = PurgeScheduler::new(purge, run_log, time_provider, interval_hours);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(shutdown_rx).await;
    });

    info!("Quotesweep ready. Press Ctrl+C to shut down");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    let _ = shutdown_tx.send(true);
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), scheduler_handle).await;

    info!("Shutdown complete.");

    Ok(())
}

/// Initialize the tracing subscriber
///
/// `QUOTESWEEP_LOG_FORMAT=json` switches console output to JSON;
/// `QUOTESWEEP_LOG_DIR` additionally mirrors entries into a daily-rolling
/// file (the returned guard must stay alive for the file writer to flush).
fn init_logging() -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let log_format = std::env::var("QUOTESWEEP_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if let Ok(log_dir) = std::env::var("QUOTESWEEP_LOG_DIR") {
        let appender = tracing_appender::rolling::daily(log_dir, "quotesweep.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        match log_format.as_str() {
            "json" => registry
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_ansi(false).with_writer(writer))
                .init(),
            _ => registry
                .with(fmt::layer().pretty())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init(),
        }

        Ok(Some(guard))
    } else {
        match log_format.as_str() {
            "json" => registry.with(fmt::layer().json()).init(),
            _ => registry.with(fmt::layer().pretty()).init(),
        }

        Ok(None)
    }
}

fn ensure_parent_dir(db_path: &str) -> Result<()> {
    if db_path.starts_with(":memory:") || db_path.contains("mode=memory") {
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
