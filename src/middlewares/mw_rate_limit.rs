use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use moka::future::Cache;

use crate::{error::Error, middlewares::mw_auth::CtxResult, AppState};

const MAX_REQUESTS_PER_MINUTE: u32 = 150;
const MAX_REQUESTS_PER_10SEC: u32 = 30;

/// Fixed-window counters per user or IP. Entries expire with their window.
#[derive(Clone)]
pub struct RateLimiter {
    minute: Cache<String, Arc<AtomicU32>>,
    burst: Cache<String, Arc<AtomicU32>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_windows(Duration::from_secs(60), Duration::from_secs(10))
    }

    fn with_windows(minute: Duration, burst: Duration) -> Self {
        Self {
            minute: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(minute)
                .build(),
            burst: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(burst)
                .build(),
        }
    }

    async fn hit(cache: &Cache<String, Arc<AtomicU32>>, identifier: &str) -> u32 {
        let counter = cache
            .get_with(identifier.to_string(), async { Arc::new(AtomicU32::new(0)) })
            .await;
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records a request and tells whether it is still within both limits.
    pub async fn allow(&self, identifier: &str) -> bool {
        let per_minute = Self::hit(&self.minute, identifier).await;
        if per_minute > MAX_REQUESTS_PER_MINUTE {
            return false;
        }
        Self::hit(&self.burst, identifier).await <= MAX_REQUESTS_PER_10SEC
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Global rate limiting that only blocks heavy spammers.
pub async fn rate_limit_middleware(
    State(app_state): State<AppState>,
    ConnectInfo(ip): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let identifier = match req.extensions().get::<CtxResult>() {
        Some(Ok(ctx)) => format!("user:{}", ctx.user_id),
        _ => format!("ip:{}", ip.ip()),
    };

    if !app_state.rate_limiter.allow(&identifier).await {
        tracing::warn!(%identifier, "rate limit exceeded");
        return Err(Error::RateLimited);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_burst_limit_per_identifier() {
        let limiter = RateLimiter::new();

        for _ in 0..MAX_REQUESTS_PER_10SEC {
            assert!(limiter.allow("ip:10.0.0.1").await);
        }
        assert!(!limiter.allow("ip:10.0.0.1").await);
        assert!(limiter.allow("ip:10.0.0.2").await);
    }

    #[tokio::test]
    async fn test_window_resets_after_expiry() {
        let limiter =
            RateLimiter::with_windows(Duration::from_millis(200), Duration::from_millis(200));

        for _ in 0..MAX_REQUESTS_PER_10SEC {
            limiter.allow("user:u1").await;
        }
        assert!(!limiter.allow("user:u1").await);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(limiter.allow("user:u1").await);
    }
}
