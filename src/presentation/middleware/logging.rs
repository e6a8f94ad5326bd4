use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, time::Instant};
use tracing::{info, warn};

use super::client_ip::client_ip;

/// Logging configuration for request/response middleware
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log request headers (sensitive ones are always filtered out)
    pub log_request_headers: bool,
    /// Headers to exclude from logging
    pub excluded_headers: Vec<String>,
    /// Log slow requests separately
    pub log_timing: bool,
    /// Minimum duration to log slow requests (in milliseconds)
    pub slow_request_threshold_ms: u64,
    /// Whether proxy headers may be used to resolve the client address
    pub trust_forwarded_headers: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_request_headers: false,
            excluded_headers: vec![
                "authorization".to_string(),
                "cookie".to_string(),
                "set-cookie".to_string(),
                "x-api-key".to_string(),
            ],
            log_timing: true,
            slow_request_threshold_ms: 1000,
            trust_forwarded_headers: false,
        }
    }
}

impl LoggingConfig {
    /// Verbose config for local development
    pub fn development() -> Self {
        Self { log_request_headers: true, slow_request_threshold_ms: 500, ..Self::default() }
    }

    /// Production config: no headers, relaxed slow-request threshold
    pub fn production() -> Self {
        Self { log_request_headers: false, slow_request_threshold_ms: 2000, ..Self::default() }
    }

    fn should_log_header(&self, header_name: &str) -> bool {
        !self.excluded_headers.iter().any(|excluded| header_name.eq_ignore_ascii_case(excluded))
    }

    fn filter_headers(&self, headers: &HeaderMap) -> Value {
        let filtered = headers
            .iter()
            .filter(|(name, _)| self.should_log_header(name.as_str()))
            .map(|(name, value)| {
                (name.as_str().to_string(), json!(value.to_str().unwrap_or("<binary>")))
            })
            .collect::<serde_json::Map<_, _>>();

        Value::Object(filtered)
    }
}

/// Request/response logging middleware
pub fn logging_middleware(
    config: LoggingConfig,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    move |request: Request, next: Next| {
        let config = config.clone();
        Box::pin(async move {
            let start_time = Instant::now();

            let method = request.method().clone();
            let uri = request.uri().clone();
            let ip = client_ip(
                request.headers(),
                request.extensions().get::<ConnectInfo<SocketAddr>>(),
                config.trust_forwarded_headers,
            );
            let user_agent = request
                .headers()
                .get("user-agent")
                .and_then(|ua| ua.to_str().ok())
                .map(String::from);
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|id| id.to_str().ok())
                .map(String::from);

            if config.log_request_headers {
                info!(
                    target: "http_requests",
                    method = %method,
                    uri = %uri,
                    headers = %config.filter_headers(request.headers()),
                    "Incoming request"
                );
            }

            let response = next.run(request).await;

            let status = response.status();
            let duration_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);
            let request_id = request_id.as_deref().unwrap_or("unknown");
            let user_agent = user_agent.as_deref().unwrap_or("-");

            if status.is_server_error() {
                tracing::error!(
                    target: "http_responses",
                    method = %method, uri = %uri, status = status.as_u16(),
                    duration_ms, client_ip = %ip, user_agent, request_id,
                    "Request failed"
                );
            } else if status.is_client_error() {
                warn!(
                    target: "http_responses",
                    method = %method, uri = %uri, status = status.as_u16(),
                    duration_ms, client_ip = %ip, user_agent, request_id,
                    "Request rejected"
                );
            } else {
                info!(
                    target: "http_responses",
                    method = %method, uri = %uri, status = status.as_u16(),
                    duration_ms, client_ip = %ip, user_agent, request_id,
                    "Request completed"
                );
            }

            if config.log_timing && duration_ms > config.slow_request_threshold_ms {
                warn!(
                    target: "slow_requests",
                    method = %method,
                    uri = %uri,
                    status = status.as_u16(),
                    duration_ms,
                    request_id,
                    "Slow request detected"
                );
            }

            response
        })
    }
}
