// Quote Domain Model

use serde::{Deserialize, Serialize};

/// Quote ID (opaque unique identifier assigned by the commerce system)
pub type QuoteId = String;

/// Storefront identifier (settings scope)
pub type StoreId = String;

/// Quote payload (JSON serializable cart contents)
///
/// Opaque to the maintenance pipeline: the purge only reads identity and
/// `updated_at` and never inspects or mutates the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotePayload(serde_json::Value);

impl QuotePayload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn empty() -> Self {
        Self(serde_json::json!({}))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Saved shopping-cart record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub store_id: Option<StoreId>,

    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms

    pub payload: QuotePayload,
}

impl Quote {
    /// Create a new quote
    ///
    /// # Arguments
    ///
    /// * `id` - Unique quote ID (injected, not generated)
    /// * `store_id` - Owning storefront, if any
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `updated_at` - Last-update timestamp in epoch ms
    /// * `payload` - Cart contents
    pub fn new(
        id: impl Into<String>,
        store_id: Option<StoreId>,
        created_at: i64,
        updated_at: i64,
        payload: QuotePayload,
    ) -> Self {
        Self {
            id: id.into(),
            store_id,
            created_at,
            updated_at,
            payload,
        }
    }

    /// Create a test quote with a deterministic ID (quote-1, quote-2, ...)
    ///
    /// **Note**: This method should only be used in tests. Production quotes
    /// enter the store with IDs assigned by the commerce system.
    pub fn new_test(updated_at: i64) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);

        Self::new(
            format!("quote-{}", counter),
            None,
            updated_at,
            updated_at,
            QuotePayload::empty(),
        )
    }
}
