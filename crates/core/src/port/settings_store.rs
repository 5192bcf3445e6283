// Settings Store Port + typed maintenance configuration reader

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Default retention window when the configured value is unset or non-positive
pub const DEFAULT_MAX_AGE_DAYS: i64 = 730;

/// Default page size when the configured value is unset or non-positive
pub const DEFAULT_BATCH_SIZE: i64 = 1000;

/// Configuration keys for quote maintenance
pub mod keys {
    pub const ENABLED: &str = "quote_maintenance/enabled";
    pub const MAX_AGE_DAYS: &str = "quote_maintenance/max_age_days";
    pub const BATCH_SIZE: &str = "quote_maintenance/batch_size";
}

/// Raw scoped key/value configuration provider
///
/// `store_id` selects a storefront scope; `None` is the global scope. A scoped
/// lookup falls back to the global value when no scoped row exists.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a boolean flag; unset resolves to false
    async fn get_flag(&self, key: &str, store_id: Option<&str>) -> Result<bool>;

    /// Read an integer value; unset or unparseable resolves to None
    async fn get_int(&self, key: &str, store_id: Option<&str>) -> Result<Option<i64>>;

    /// Write a value into the given scope
    async fn set(&self, key: &str, store_id: Option<&str>, value: &str) -> Result<()>;
}

/// Flat per-run settings snapshot
///
/// Resolved once at run start and passed by value through the engine, so pages
/// fetched later in a run never see a different configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeSettings {
    pub max_age_days: i64,
    pub batch_size: i64,
}

/// Typed reader over the raw settings store
///
/// Applies the documented defaults for unset or non-positive values.
#[derive(Clone)]
pub struct MaintenanceConfig {
    store: Arc<dyn SettingsStore>,
}

impl MaintenanceConfig {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Check if quote maintenance is enabled for the given scope
    pub async fn is_enabled(&self, store_id: Option<&str>) -> Result<bool> {
        self.store.get_flag(keys::ENABLED, store_id).await
    }

    /// Maximum age in days for quotes to be deleted
    pub async fn max_age_days(&self, store_id: Option<&str>) -> Result<i64> {
        let value = self.store.get_int(keys::MAX_AGE_DAYS, store_id).await?;
        Ok(positive_or(value, DEFAULT_MAX_AGE_DAYS))
    }

    /// Page size for processing quotes
    pub async fn batch_size(&self, store_id: Option<&str>) -> Result<i64> {
        let value = self.store.get_int(keys::BATCH_SIZE, store_id).await?;
        Ok(positive_or(value, DEFAULT_BATCH_SIZE))
    }

    /// Resolve the per-run settings snapshot
    pub async fn resolve(&self, store_id: Option<&str>) -> Result<PurgeSettings> {
        Ok(PurgeSettings {
            max_age_days: self.max_age_days(store_id).await?,
            batch_size: self.batch_size(store_id).await?,
        })
    }
}

fn positive_or(value: Option<i64>, default: i64) -> i64 {
    match value {
        Some(v) if v > 0 => v,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        values: Mutex<HashMap<String, String>>,
    }

    impl MapStore {
        fn with(entries: &[(&str, &str)]) -> Arc<Self> {
            let store = Self::default();
            {
                let mut values = store.values.lock().unwrap();
                for (key, value) in entries {
                    values.insert((*key).to_string(), (*value).to_string());
                }
            }
            Arc::new(store)
        }
    }

    #[async_trait]
    impl SettingsStore for MapStore {
        async fn get_flag(&self, key: &str, _store_id: Option<&str>) -> Result<bool> {
            let values = self.values.lock().unwrap();
            Ok(matches!(
                values.get(key).map(String::as_str),
                Some("1") | Some("true") | Some("yes")
            ))
        }

        async fn get_int(&self, key: &str, _store_id: Option<&str>) -> Result<Option<i64>> {
            let values = self.values.lock().unwrap();
            Ok(values.get(key).and_then(|v| v.parse().ok()))
        }

        async fn set(&self, key: &str, _store_id: Option<&str>, value: &str) -> Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_unset_values_resolve_to_defaults() {
        let config = MaintenanceConfig::new(MapStore::with(&[]));

        assert!(!config.is_enabled(None).await.unwrap());
        assert_eq!(config.max_age_days(None).await.unwrap(), DEFAULT_MAX_AGE_DAYS);
        assert_eq!(config.batch_size(None).await.unwrap(), DEFAULT_BATCH_SIZE);
    }

    #[tokio::test]
    async fn test_non_positive_values_resolve_to_defaults() {
        let config = MaintenanceConfig::new(MapStore::with(&[
            (keys::MAX_AGE_DAYS, "0"),
            (keys::BATCH_SIZE, "-25"),
        ]));

        assert_eq!(config.max_age_days(None).await.unwrap(), DEFAULT_MAX_AGE_DAYS);
        assert_eq!(config.batch_size(None).await.unwrap(), DEFAULT_BATCH_SIZE);
    }

    #[tokio::test]
    async fn test_unparseable_values_resolve_to_defaults() {
        let config = MaintenanceConfig::new(MapStore::with(&[
            (keys::MAX_AGE_DAYS, "soon"),
            (keys::BATCH_SIZE, ""),
        ]));

        assert_eq!(config.max_age_days(None).await.unwrap(), DEFAULT_MAX_AGE_DAYS);
        assert_eq!(config.batch_size(None).await.unwrap(), DEFAULT_BATCH_SIZE);
    }

    #[tokio::test]
    async fn test_positive_values_pass_through() {
        let config = MaintenanceConfig::new(MapStore::with(&[
            (keys::ENABLED, "1"),
            (keys::MAX_AGE_DAYS, "90"),
            (keys::BATCH_SIZE, "250"),
        ]));

        assert!(config.is_enabled(None).await.unwrap());

        let settings = config.resolve(None).await.unwrap();
        assert_eq!(settings.max_age_days, 90);
        assert_eq!(settings.batch_size, 250);
    }
}
