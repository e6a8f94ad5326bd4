use axum::{
    error_handling::HandleErrorLayer,
    extract::State,
    http::{header, Method, StatusCode},
    middleware::from_fn,
    response::Json,
    Router,
};
use chrono::SecondsFormat;
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::infrastructure::{
    clash_royale::{ClashRoyaleClient, UpstreamError},
    config::AppConfig,
};
use crate::presentation::{
    handlers::AppState,
    middleware::{
        auth::JwtService,
        error::{handle_timeout_error, not_found_handler},
        logging::{logging_middleware, LoggingConfig as RequestLoggingConfig},
        rate_limit::{FixedWindowRateLimiter, RateLimitConfig},
        security::{
            development_security_config, production_security_config, security_headers_middleware,
        },
    },
    routes,
};

const SERVICE_NAME: &str = "Clash Royale API Proxy";
const MIN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const UPSTREAM_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Inbound request budget; always outlasts the upstream client timeout
fn inbound_timeout(config: &AppConfig) -> Duration {
    config.upstream.timeout().saturating_add(UPSTREAM_TIMEOUT_MARGIN).max(MIN_REQUEST_TIMEOUT)
}

/// Create the main application router
pub fn create_app(app_state: AppState) -> Router {
    let config = Arc::clone(&app_state.config);

    let security_config = if config.is_production() {
        production_security_config()
    } else {
        development_security_config()
    };

    let logging_preset = if config.is_production() {
        RequestLoggingConfig::production()
    } else {
        RequestLoggingConfig::development()
    };
    let request_logging = RequestLoggingConfig {
        trust_forwarded_headers: config.rate_limit.trust_forwarded_headers,
        ..logging_preset
    };

    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CompressionLayer::new())
        .layer(HandleErrorLayer::new(handle_timeout_error))
        .layer(TimeoutLayer::new(inbound_timeout(&config)))
        .layer(create_cors_layer())
        .layer(from_fn(security_headers_middleware(security_config)))
        .layer(from_fn(logging_middleware(request_logging)));

    routes::create_routes(app_state)
        .fallback(not_found_handler)
        .method_not_allowed_fallback(not_found_handler)
        .layer(middleware_stack)
}

/// Build the shared handler state from configuration
///
/// # Errors
/// Returns an error if the upstream HTTP client cannot be constructed
pub fn build_state(config: AppConfig) -> Result<AppState, UpstreamError> {
    let players = Arc::new(ClashRoyaleClient::new(&config.upstream)?);

    let jwt = config.auth.jwt_secret.as_deref().map(JwtService::new);
    if jwt.is_none() {
        warn!("JWT_SECRET is not set; authenticated routes will answer 500");
    }

    let rate_limiter = FixedWindowRateLimiter::new(RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window_duration: config.rate_limit.window(),
        trust_forwarded_headers: config.rate_limit.trust_forwarded_headers,
        ..Default::default()
    });

    Ok(AppState { config: Arc::new(config), players, jwt, rate_limiter })
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Liveness endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": iso_timestamp(),
        "environment": state.config.environment.to_string()
    }))
}

/// Readiness endpoint: reports whether the Clash Royale API can be reached
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let timestamp = iso_timestamp();

    match state.players.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "timestamp": timestamp,
                "checks": { "upstream": "ok" }
            })),
        ),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "timestamp": timestamp,
                    "checks": { "upstream": "unreachable" },
                    "error": e.to_string()
                })),
            )
        }
    }
}

/// Service description and endpoint index
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "ready": "/ready",
            "playerInfo": "/api/players/:playerTag",
            "battlelog": "/api/players/:playerTag/battlelog"
        }
    }))
}

/// Create CORS layer with appropriate settings
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Start the HTTP server
///
/// # Errors
/// Returns an error if the server fails to start
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.server.socket_addr()?;
    let environment = config.environment;

    let app = create_app(build_state(config)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(environment = %environment, "{} started", SERVICE_NAME);
    info!("Server running on {}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::config::{
            AuthConfig, Environment, LogFormat, LoggingConfig, RateLimitSettings, ServerConfig,
            UpstreamConfig,
        },
        test_utils::mocks::InMemoryPlayerRepository,
    };
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn create_test_config(environment: Environment) -> AppConfig {
        AppConfig {
            environment,
            server: ServerConfig { host: "127.0.0.1".to_string(), port: 0 },
            upstream: UpstreamConfig {
                api_key: "test-key".to_string(),
                base_url: "http://localhost:1/v1".to_string(),
                timeout_ms: 1000,
            },
            auth: AuthConfig { jwt_secret: Some("secret".to_string()) },
            rate_limit: RateLimitSettings {
                max_requests: 5,
                window_seconds: 60,
                trust_forwarded_headers: false,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Json },
        }
    }

    fn create_test_app(environment: Environment) -> Router {
        let mut state = build_state(create_test_config(environment)).unwrap();
        state.players = Arc::new(InMemoryPlayerRepository::new());
        create_app(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_build_state() {
        let state = build_state(create_test_config(Environment::Development)).unwrap();
        assert!(state.jwt.is_some());
        assert_eq!(state.rate_limiter.config().max_requests, 5);
        assert_eq!(state.rate_limiter.config().window_duration, Duration::from_secs(60));

        let mut config = create_test_config(Environment::Development);
        config.auth.jwt_secret = None;
        assert!(build_state(config).unwrap().jwt.is_none());
    }

    #[tokio::test]
    async fn test_health_check_endpoint() {
        let app = create_test_app(Environment::Production);

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-request-id").is_some());
        assert!(response.headers().get(header::STRICT_TRANSPORT_SECURITY).is_some());

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Server is running");
        assert_eq!(body["environment"], "production");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_readiness_check_ok() {
        let app = create_test_app(Environment::Test);

        let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["checks"]["upstream"], "ok");
    }

    #[tokio::test]
    async fn test_service_info() {
        let app = create_test_app(Environment::Development);

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::STRICT_TRANSPORT_SECURITY).is_none());
        let body = body_json(response).await;
        assert_eq!(body["message"], SERVICE_NAME);
        assert_eq!(body["endpoints"]["battlelog"], "/api/players/:playerTag/battlelog");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_error_envelope() {
        let app = create_test_app(Environment::Development);

        let request = Request::builder().uri("/non-existent-route").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["statusCode"], 404);
        assert_eq!(body["error"]["message"], "Route not found: GET /non-existent-route");
    }

    #[tokio::test]
    async fn test_wrong_method_uses_error_envelope() {
        let token = JwtService::new("secret").create_token("svc", Duration::from_secs(60)).unwrap();

        for uri in ["/health", "/api/players/2ABC", "/api/players/2ABC/battlelog"] {
            let app = create_test_app(Environment::Development);

            let request = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let body = body_json(response).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"]["message"], format!("Route not found: POST {uri}"));
        }
    }

    #[test]
    fn test_inbound_timeout_outlasts_upstream_timeout() {
        let mut config = create_test_config(Environment::Development);
        assert_eq!(inbound_timeout(&config), Duration::from_secs(30));

        config.upstream.timeout_ms = 40_000;
        assert_eq!(inbound_timeout(&config), Duration::from_secs(45));
        assert!(inbound_timeout(&config) > config.upstream.timeout());
    }

    #[tokio::test]
    async fn test_inbound_timeout_uses_error_envelope() {
        let app = Router::new()
            .route(
                "/slow",
                axum::routing::get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_timeout_error))
                    .layer(TimeoutLayer::new(Duration::from_millis(20))),
            );

        let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["statusCode"], 408);
        assert_eq!(body["error"]["message"], "Request timed out");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = create_test_app(Environment::Development);

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/players/2ABC")
            .header(header::ORIGIN, "https://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }
}
