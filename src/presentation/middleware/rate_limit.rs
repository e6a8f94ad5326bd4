use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{client_ip::client_ip, error::ApiError};

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum number of requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
    /// Whether to trust X-Forwarded-For / X-Real-IP for IP extraction
    pub trust_forwarded_headers: bool,
    /// Emit x-ratelimit-* headers
    pub include_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_duration: Duration::from_secs(15 * 60),
            trust_forwarded_headers: false,
            include_headers: true,
        }
    }
}

/// In-memory fixed-window rate limiter keyed by client IP
#[derive(Debug, Clone)]
pub struct FixedWindowRateLimiter {
    config: RateLimitConfig,
    state: Arc<RwLock<LimiterState>>,
}

#[derive(Debug)]
struct LimiterState {
    windows: HashMap<IpAddr, Window>,
    last_sweep: Instant,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

impl FixedWindowRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let state = LimiterState { windows: HashMap::new(), last_sweep: Instant::now() };
        Self { config, state: Arc::new(RwLock::new(state)) }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count a request from `ip` against its current window.
    ///
    /// Returns the limit state after counting, or the rejection details when
    /// the window is already full.
    pub async fn check_rate_limit(&self, ip: IpAddr) -> Result<RateLimitInfo, RateLimitInfo> {
        let now = Instant::now();
        let window_duration = self.config.window_duration;
        let mut state = self.state.write().await;

        if now.duration_since(state.last_sweep) > SWEEP_INTERVAL {
            state.last_sweep = now;
            state.windows.retain(|_, w| now.duration_since(w.started_at) < window_duration);
        }

        let window = state.windows.entry(ip).or_insert(Window { started_at: now, count: 0 });

        if now.duration_since(window.started_at) >= window_duration {
            *window = Window { started_at: now, count: 0 };
        }

        let reset_after = window_duration.saturating_sub(now.duration_since(window.started_at));

        if window.count >= self.config.max_requests {
            return Err(RateLimitInfo {
                limit: self.config.max_requests,
                remaining: 0,
                reset_after,
                retry_after: Some(reset_after),
            });
        }

        window.count += 1;

        Ok(RateLimitInfo {
            limit: self.config.max_requests,
            remaining: self.config.max_requests - window.count,
            reset_after,
            retry_after: None,
        })
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.state.read().await.windows.len()
    }
}

/// Rate limit information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
    pub retry_after: Option<Duration>,
}

impl RateLimitInfo {
    pub fn add_headers(&self, headers: &mut HeaderMap) {
        headers.insert("x-ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(self.remaining));
        headers.insert("x-ratelimit-reset", HeaderValue::from(self.reset_after.as_secs()));

        if let Some(retry_after) = self.retry_after {
            // Round up so clients never retry inside the window
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            headers.insert("retry-after", HeaderValue::from(secs));
        }
    }
}

/// Fixed-window rate limiting middleware
pub fn rate_limit_middleware(
    limiter: FixedWindowRateLimiter,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    move |request: Request, next: Next| {
        let limiter = limiter.clone();
        Box::pin(async move {
            let ip = client_ip(
                request.headers(),
                request.extensions().get::<ConnectInfo<SocketAddr>>(),
                limiter.config.trust_forwarded_headers,
            );

            debug!("Rate limit check for IP: {}", ip);

            match limiter.check_rate_limit(ip).await {
                Ok(info) => {
                    let mut response = next.run(request).await;
                    if limiter.config.include_headers {
                        info.add_headers(response.headers_mut());
                    }
                    response
                }
                Err(info) => {
                    warn!(client_ip = %ip, limit = info.limit, "Rate limit exceeded");
                    let mut response =
                        ApiError::too_many_requests("Too many requests, please try again later.")
                            .into_response();
                    if limiter.config.include_headers {
                        info.add_headers(response.headers_mut());
                    }
                    response
                }
            }
        })
    }
}
