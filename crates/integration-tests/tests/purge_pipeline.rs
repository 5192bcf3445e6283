//! End-to-end purge pipeline tests over in-memory SQLite

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use quotesweep_core::application::QuotePurgeService;
use quotesweep_core::domain::{Quote, QuotePayload};
use quotesweep_core::error::AppError;
use quotesweep_core::port::settings_store::keys;
use quotesweep_core::port::{
    FixedTimeProvider, LogPurgeObserver, MaintenanceConfig, QuoteRepository, SettingsStore,
};
use quotesweep_infra_sqlite::{
    create_pool, run_migrations, SqliteQuoteRepository, SqliteSettingsStore,
};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

struct Harness {
    repo: Arc<SqliteQuoteRepository>,
    settings: Arc<SqliteSettingsStore>,
    service: QuotePurgeService,
}

async fn setup(now_ms: i64) -> Harness {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let repo = Arc::new(SqliteQuoteRepository::new(pool.clone()));
    let settings = Arc::new(SqliteSettingsStore::new(pool.clone()));

    let service = QuotePurgeService::new(
        MaintenanceConfig::new(settings.clone()),
        repo.clone(),
        Arc::new(FixedTimeProvider::new(now_ms)),
        Arc::new(LogPurgeObserver),
    );

    Harness {
        repo,
        settings,
        service,
    }
}

fn date_ms(year: i32, month: u32, day: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .unwrap()
        .timestamp_millis()
}

async fn seed_quote(repo: &SqliteQuoteRepository, updated_at: i64) -> Quote {
    let quote = Quote::new(
        Uuid::new_v4().to_string(),
        None,
        updated_at,
        updated_at,
        QuotePayload::new(serde_json::json!({"items": 1})),
    );
    repo.insert(&quote).await.unwrap();
    quote
}

#[tokio::test]
async fn test_purge_deletes_only_stale_quotes() {
    let now = date_ms(2024, 6, 1);
    let harness = setup(now).await;
    harness
        .settings
        .set(keys::ENABLED, None, "1")
        .await
        .unwrap();
    harness
        .settings
        .set(keys::MAX_AGE_DAYS, None, "30")
        .await
        .unwrap();

    let mut stale = Vec::new();
    for days_old in [31, 60, 365, 31, 400] {
        stale.push(seed_quote(&harness.repo, now - days_old * MILLIS_PER_DAY).await);
    }
    let fresh_a = seed_quote(&harness.repo, now - 29 * MILLIS_PER_DAY).await;
    let fresh_b = seed_quote(&harness.repo, now).await;

    let deleted = harness.service.execute(false).await.unwrap();
    assert_eq!(deleted, 5);

    for quote in &stale {
        assert!(harness.repo.find_by_id(&quote.id).await.unwrap().is_none());
    }
    assert!(harness.repo.find_by_id(&fresh_a.id).await.unwrap().is_some());
    assert!(harness.repo.find_by_id(&fresh_b.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_cutoff_boundary_scenario() {
    // Cutoff lands exactly on 2023-01-01: quotes last updated at or before
    // that instant qualify, later ones do not.
    let now = date_ms(2023, 1, 31);
    let harness = setup(now).await;
    harness
        .settings
        .set(keys::ENABLED, None, "1")
        .await
        .unwrap();
    harness
        .settings
        .set(keys::MAX_AGE_DAYS, None, "30")
        .await
        .unwrap();

    let old_a = seed_quote(&harness.repo, date_ms(2022, 1, 1)).await;
    let recent = seed_quote(&harness.repo, date_ms(2023, 6, 1)).await;
    let old_b = seed_quote(&harness.repo, date_ms(2020, 1, 1)).await;

    let deleted = harness.service.execute(false).await.unwrap();
    assert_eq!(deleted, 2);

    assert!(harness.repo.find_by_id(&old_a.id).await.unwrap().is_none());
    assert!(harness.repo.find_by_id(&old_b.id).await.unwrap().is_none());
    assert!(harness.repo.find_by_id(&recent.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_disabled_blocks_and_force_overrides() {
    let now = date_ms(2024, 6, 1);
    let harness = setup(now).await;

    let stale = seed_quote(&harness.repo, now - 800 * MILLIS_PER_DAY).await;

    match harness.service.execute(false).await {
        Err(AppError::MaintenanceDisabled(_)) => {}
        other => panic!("Expected MaintenanceDisabled, got {:?}", other),
    }
    assert!(
        harness.repo.find_by_id(&stale.id).await.unwrap().is_some(),
        "disabled run must not delete anything"
    );

    // Default retention window (730 days) applies; the quote is 800 days old
    let deleted = harness.service.execute(true).await.unwrap();
    assert_eq!(deleted, 1);
}

#[tokio::test]
async fn test_multi_page_backlog_drains_across_runs() {
    let now = date_ms(2024, 6, 1);
    let harness = setup(now).await;
    harness
        .settings
        .set(keys::ENABLED, None, "1")
        .await
        .unwrap();
    harness
        .settings
        .set(keys::MAX_AGE_DAYS, None, "30")
        .await
        .unwrap();
    harness
        .settings
        .set(keys::BATCH_SIZE, None, "5")
        .await
        .unwrap();

    for i in 0..12 {
        seed_quote(&harness.repo, now - (31 + i) * MILLIS_PER_DAY).await;
    }

    // The observed page total shrinks while the page number advances, so a
    // single run stops early; the scheduled cadence drains the rest.
    assert_eq!(harness.service.execute(false).await.unwrap(), 7);
    assert_eq!(harness.service.execute(false).await.unwrap(), 5);
    assert_eq!(harness.service.execute(false).await.unwrap(), 0);
}

#[tokio::test]
async fn test_store_scoped_settings_apply_to_scoped_runs_only() {
    let now = date_ms(2024, 6, 1);
    let harness = setup(now).await;
    harness
        .settings
        .set(keys::ENABLED, None, "1")
        .await
        .unwrap();
    // Global retention keeps 365 days; store-7 keeps only 30
    harness
        .settings
        .set(keys::MAX_AGE_DAYS, None, "365")
        .await
        .unwrap();
    harness
        .settings
        .set(keys::MAX_AGE_DAYS, Some("store-7"), "30")
        .await
        .unwrap();

    let aging = seed_quote(&harness.repo, now - 60 * MILLIS_PER_DAY).await;

    // Global scope: 60 days old is within the 365-day window
    assert_eq!(harness.service.execute(false).await.unwrap(), 0);
    assert!(harness.repo.find_by_id(&aging.id).await.unwrap().is_some());

    // store-7 scope: the 30-day window catches it
    let scoped_service = setup_scoped(&harness, "store-7");
    assert_eq!(scoped_service.execute(false).await.unwrap(), 1);
    assert!(harness.repo.find_by_id(&aging.id).await.unwrap().is_none());
}

fn setup_scoped(harness: &Harness, store_id: &str) -> QuotePurgeService {
    QuotePurgeService::new(
        MaintenanceConfig::new(harness.settings.clone()),
        harness.repo.clone(),
        Arc::new(FixedTimeProvider::new(date_ms(2024, 6, 1))),
        Arc::new(LogPurgeObserver),
    )
    .with_scope(store_id)
}
