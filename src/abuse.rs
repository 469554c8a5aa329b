//! Anti-abuse middleware for the word list REST surface
//!
//! Rate limits per caller and path so a misbehaving client cannot flood
//! the list endpoints. Game traffic runs over the websocket and is not
//! touched by this layer.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, Response, StatusCode},
    middleware::Next,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

/// Rate limiter state
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Map of caller key to (request count, window start)
    requests: Arc<RwLock<HashMap<String, (u32, Instant)>>>,
    /// Maximum requests per window
    max_requests: u32,
    /// Time window duration
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(10)) // 100 requests per 10 seconds
    }
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Check if a request should be allowed
    /// Returns true if allowed, false if rate limited
    pub async fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        match requests.get_mut(key) {
            Some((count, window_start)) => {
                // Check if we're in a new window
                if now.duration_since(*window_start) >= self.window {
                    *count = 1;
                    *window_start = now;
                    true
                } else if *count >= self.max_requests {
                    false
                } else {
                    *count += 1;
                    true
                }
            }
            None => {
                requests.insert(key.to_string(), (1, now));
                true
            }
        }
    }

    /// Clean up old entries (call periodically)
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut requests = self.requests.write().await;
        requests.retain(|_, (_, window_start)| now.duration_since(*window_start) < self.window * 2);
    }
}

/// Anti-abuse configuration
#[derive(Debug, Clone)]
pub struct AbuseConfig {
    /// Rate limiter (None = disabled)
    pub rate_limiter: Option<RateLimiter>,
}

impl Default for AbuseConfig {
    fn default() -> Self {
        Self {
            rate_limiter: Some(RateLimiter::default()),
        }
    }
}

impl AbuseConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let rate_limit_enabled = std::env::var("ABUSE_RATE_LIMIT")
            .map(|v| v != "0" && v.to_lowercase() != "false")
            .unwrap_or(true);

        let rate_limiter = if rate_limit_enabled {
            let max_requests = std::env::var("ABUSE_RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100);

            let window_secs = std::env::var("ABUSE_RATE_LIMIT_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10);

            Some(RateLimiter::new(
                max_requests,
                Duration::from_secs(window_secs),
            ))
        } else {
            None
        };

        tracing::info!(rate_limit_enabled, "Anti-abuse config loaded");

        Self { rate_limiter }
    }
}

/// Key requests by forwarded-for (first hop) or peer address, plus path,
/// so a burst against one endpoint does not lock a caller out of the rest
fn rate_limit_key(request: &Request<Body>, addr: &SocketAddr) -> String {
    let ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| addr.ip().to_string());
    format!("{}:{}", ip, request.uri().path())
}

/// Build a 429 Too Many Requests response
fn rate_limited() -> Response<Body> {
    Response::builder()
        .status(StatusCode::TOO_MANY_REQUESTS)
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::RETRY_AFTER, "10")
        .body(Body::from("Rate limit exceeded. Please slow down."))
        .unwrap()
}

/// Middleware enforcing the rate limit on HTTP routes
pub async fn rate_limit_middleware(
    State(config): State<Arc<AbuseConfig>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    if let Some(ref rate_limiter) = config.rate_limiter {
        let key = rate_limit_key(&request, &addr);
        if !rate_limiter.check(&key).await {
            tracing::warn!(key = %key, "Rate limited");
            return rate_limited();
        }
    }

    next.run(request).await
}

/// Periodically drop stale limiter windows
pub fn spawn_cleanup(config: Arc<AbuseConfig>) {
    if config.rate_limiter.is_none() {
        return;
    }
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            if let Some(ref limiter) = config.rate_limiter {
                limiter.cleanup().await;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_allows_normal_traffic() {
        let limiter = RateLimiter::new(5, Duration::from_secs(1));

        // First 5 requests should pass
        for _ in 0..5 {
            assert!(limiter.check("test-key").await);
        }

        // 6th should be blocked
        assert!(!limiter.check("test-key").await);
    }

    #[tokio::test]
    async fn test_rate_limiter_different_keys() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));

        // Different keys have separate limits
        assert!(limiter.check("key1").await);
        assert!(limiter.check("key1").await);
        assert!(!limiter.check("key1").await);

        assert!(limiter.check("key2").await);
        assert!(limiter.check("key2").await);
        assert!(!limiter.check("key2").await);
    }

    #[tokio::test]
    async fn test_rate_limiter_window_reset() {
        let limiter = RateLimiter::new(2, Duration::from_millis(50));

        assert!(limiter.check("key").await);
        assert!(limiter.check("key").await);
        assert!(!limiter.check("key").await);

        // Wait for window to reset
        tokio::time::sleep(Duration::from_millis(60)).await;

        // Should be allowed again
        assert!(limiter.check("key").await);
    }

    #[tokio::test]
    async fn test_rate_limiter_cleanup_drops_stale_windows() {
        let limiter = RateLimiter::new(2, Duration::from_millis(20));
        assert!(limiter.check("key").await);

        tokio::time::sleep(Duration::from_millis(60)).await;
        limiter.cleanup().await;
        assert!(limiter.requests.read().await.is_empty());
    }

    #[test]
    fn test_rate_limit_key_prefers_forwarded_for() {
        let addr: SocketAddr = "9.9.9.9:1234".parse().unwrap();
        let request = Request::builder()
            .uri("/wordlists")
            .header("x-forwarded-for", "1.2.3.4, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(rate_limit_key(&request, &addr), "1.2.3.4:/wordlists");

        let bare = Request::builder()
            .uri("/wordlists/default/items")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            rate_limit_key(&bare, &addr),
            "9.9.9.9:/wordlists/default/items"
        );
    }

    #[test]
    fn test_abuse_config_default() {
        let config = AbuseConfig::default();
        assert!(config.rate_limiter.is_some());
    }
}
