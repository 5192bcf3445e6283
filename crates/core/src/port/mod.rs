// Port Layer - Interfaces for external dependencies

pub mod purge_observer;
pub mod quote_repository;
pub mod run_log;
pub mod settings_store;
pub mod time_provider;

// Re-exports
pub use purge_observer::{LogPurgeObserver, PurgeObserver};
pub use quote_repository::{DeleteOutcome, QuoteRepository, StaleQuotePage};
pub use run_log::{RunLog, RunRecord};
pub use settings_store::{
    MaintenanceConfig, PurgeSettings, SettingsStore, DEFAULT_BATCH_SIZE, DEFAULT_MAX_AGE_DAYS,
};
pub use time_provider::{FixedTimeProvider, SystemTimeProvider, TimeProvider};
