// Time Provider Port (for testability)

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Fixed time provider returning a constant instant
///
/// Lets tests pin the purge cutoff to a known date.
pub struct FixedTimeProvider {
    now_ms: i64,
}

impl FixedTimeProvider {
    pub fn new(now_ms: i64) -> Self {
        Self { now_ms }
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.now_ms
    }
}
