use dashmap::DashMap;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::time::Instant;

/// Per-key token bucket for rate limiting.
#[derive(Clone)]
pub struct RateLimitBucket {
    pub remaining: u32,
    pub last_refill: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Public origin for verification URLs baked into certificates.
    pub public_url: String,
    pub test_mode: bool,
    pub rate_limits: Arc<DashMap<String, RateLimitBucket>>,
}
