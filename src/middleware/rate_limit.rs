use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use tokio::time::Instant;

use crate::error::AppError;
use crate::state::{AppState, RateLimitBucket};

/// Bucket capacity — requests allowed per window, plus a small burst.
const CAPACITY: u32 = 40;
/// Window duration in seconds; a bucket refills fully over one window.
const WINDOW_SECS: u64 = 60;

/// Derive the limiter key. The intake endpoint is unauthenticated, so the
/// client IP (as reported by the reverse proxy) comes first; admin traffic
/// is keyed by a hash of its Authorization header.
fn limiter_key(req: &Request) -> String {
    if let Some(ip) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return format!("ip:{ip}");
    }

    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(|auth| {
            let mut hasher = Sha256::new();
            hasher.update(auth.as_bytes());
            format!("auth:{:x}", hasher.finalize())
        })
        .unwrap_or_else(|| "anon".to_string())
}

/// Token-bucket rate limiter over the API routes.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let key = limiter_key(&req);
    let now = Instant::now();

    let (remaining, retry_after) = {
        let mut entry = state
            .rate_limits
            .entry(key)
            .or_insert_with(|| RateLimitBucket {
                remaining: CAPACITY,
                last_refill: now,
            });

        let bucket = entry.value_mut();

        let elapsed = now.duration_since(bucket.last_refill).as_secs();
        if elapsed >= WINDOW_SECS {
            bucket.remaining = CAPACITY;
            bucket.last_refill = now;
        } else if elapsed > 0 {
            let refill = ((elapsed as f64 / WINDOW_SECS as f64) * CAPACITY as f64) as u32;
            // Advance the refill clock only when tokens were granted, or an
            // exhausted client polling faster than the refill granularity
            // would never accrue any.
            if refill > 0 {
                bucket.remaining = (bucket.remaining + refill).min(CAPACITY);
                bucket.last_refill = now;
            }
        }

        if bucket.remaining == 0 {
            let secs_until_refill =
                WINDOW_SECS.saturating_sub(now.duration_since(bucket.last_refill).as_secs());
            (0u32, Some(secs_until_refill.max(1)))
        } else {
            bucket.remaining -= 1;
            (bucket.remaining, None)
        }
    };

    if let Some(retry_after) = retry_after {
        return AppError::RateLimited { retry_after }.into_response();
    }

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", CAPACITY.to_string().parse().unwrap());
    headers.insert(
        "X-RateLimit-Remaining",
        remaining.to_string().parse().unwrap(),
    );
    response
}
