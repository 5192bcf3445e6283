//! Quotesweep CLI - Operator front end for quote maintenance
//!
//! Purges stale quotes on demand, manages the maintenance settings, and
//! shows the scheduled-run history.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tabled::{Table, Tabled};

use quotesweep_core::application::QuotePurgeService;
use quotesweep_core::error::AppError;
use quotesweep_core::port::settings_store::keys;
use quotesweep_core::port::{
    LogPurgeObserver, MaintenanceConfig, RunLog, RunRecord, SettingsStore, SystemTimeProvider,
};
use quotesweep_infra_sqlite::{
    create_pool, run_migrations, SqliteQuoteRepository, SqliteRunLog, SqliteSettingsStore,
};

const DEFAULT_DB_PATH: &str = "~/.quotesweep/quotes.db";

#[derive(Parser)]
#[command(name = "quotesweep")]
#[command(about = "Delete quotes that haven't been updated in the configured number of days", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database path
    #[arg(long, env = "QUOTESWEEP_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete stale quotes now
    Purge {
        /// Force execution even if disabled in configuration
        #[arg(short, long)]
        force: bool,

        /// Storefront scope for settings resolution
        #[arg(long)]
        store: Option<String>,
    },

    /// Inspect or change maintenance settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Show recent scheduled purge runs
    History {
        /// Number of runs to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: i64,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the resolved settings (defaults applied)
    Show {
        /// Storefront scope to resolve
        #[arg(long)]
        store: Option<String>,
    },

    /// Set a maintenance setting
    Set {
        key: SettingKey,
        value: String,

        /// Storefront scope to write into
        #[arg(long)]
        store: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SettingKey {
    Enabled,
    MaxAgeDays,
    BatchSize,
}

impl SettingKey {
    fn as_config_key(self) -> &'static str {
        match self {
            SettingKey::Enabled => keys::ENABLED,
            SettingKey::MaxAgeDays => keys::MAX_AGE_DAYS,
            SettingKey::BatchSize => keys::BATCH_SIZE,
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    started: String,
    deleted: i64,
    seconds: String,
    status: String,
    message: String,
}

impl HistoryRow {
    fn from_record(record: &RunRecord) -> Self {
        let started = match Utc.timestamp_millis_opt(record.started_at).single() {
            Some(instant) => instant.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => record.started_at.to_string(),
        };

        Self {
            started,
            deleted: record.deleted,
            seconds: format!("{:.5}", record.elapsed_seconds),
            status: if record.success { "ok" } else { "failed" }.to_string(),
            message: record.message.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", format!("An error occurred: {:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let db_path = shellexpand::tilde(&cli.db).into_owned();
    ensure_parent_dir(&db_path)?;

    let pool = create_pool(&db_path)
        .await
        .context("Failed to open database")?;
    run_migrations(&pool).await.context("Migration failed")?;

    let settings_store: Arc<dyn SettingsStore> = Arc::new(SqliteSettingsStore::new(pool.clone()));
    let config = MaintenanceConfig::new(settings_store.clone());

    match cli.command {
        Commands::Purge { force, store } => {
            let mut service = QuotePurgeService::new(
                config,
                Arc::new(SqliteQuoteRepository::new(pool.clone())),
                Arc::new(SystemTimeProvider),
                Arc::new(LogPurgeObserver),
            );
            if let Some(store) = store {
                service = service.with_scope(store);
            }

            let started = Instant::now();
            match service.execute(force).await {
                Ok(deleted) => {
                    let elapsed = started.elapsed().as_secs_f64();
                    println!(
                        "{}",
                        format!(
                            "Successfully deleted {} quote(s) in {:.5} seconds.",
                            deleted, elapsed
                        )
                        .green()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(AppError::MaintenanceDisabled(message)) => {
                    eprintln!("{}", message.red());
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => {
                    eprintln!("{}", format!("An error occurred: {}", e).red());
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Settings { command } => match command {
            SettingsCommands::Show { store } => {
                let scope = store.as_deref();
                let enabled = config.is_enabled(scope).await?;
                let max_age_days = config.max_age_days(scope).await?;
                let batch_size = config.batch_size(scope).await?;

                println!("{}", "Quote maintenance settings".cyan().bold());
                println!();
                println!("  {} {}", "scope:".bold(), scope.unwrap_or("(global)"));
                println!(
                    "  {} {}",
                    "enabled:".bold(),
                    if enabled {
                        "yes".green().to_string()
                    } else {
                        "no".yellow().to_string()
                    }
                );
                println!("  {} {} days", "max age:".bold(), max_age_days);
                println!("  {} {} quotes", "batch size:".bold(), batch_size);

                Ok(ExitCode::SUCCESS)
            }

            SettingsCommands::Set { key, value, store } => {
                settings_store
                    .set(key.as_config_key(), store.as_deref(), &value)
                    .await?;

                println!(
                    "{}",
                    format!("✓ {} set to {}", key.as_config_key(), value)
                        .green()
                        .bold()
                );
                Ok(ExitCode::SUCCESS)
            }
        },

        Commands::History { limit } => {
            let run_log = SqliteRunLog::new(pool.clone());
            let runs = run_log.recent(limit).await?;

            if runs.is_empty() {
                println!("{}", "No purge runs recorded yet".yellow());
            } else {
                let rows: Vec<HistoryRow> = runs.iter().map(HistoryRow::from_record).collect();
                println!("{}", Table::new(rows));
            }
            Ok(ExitCode::SUCCESS)
        }
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
