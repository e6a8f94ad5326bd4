use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};

use crate::{
    infrastructure::http::{health_check, readiness_check, service_info},
    presentation::{
        handlers::{players, AppState},
        middleware::{auth::auth_middleware, rate_limit::rate_limit_middleware},
    },
};

/// Create all application routes with application state
pub fn create_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api/players", player_routes(&app_state))
        .with_state(app_state)
}

/// Player lookups: authentication first, then the per-client rate limit
fn player_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/{tag}", get(players::get_player_info))
        .route("/{tag}/battlelog", get(players::get_player_battlelog))
        .route_layer(from_fn(rate_limit_middleware(app_state.rate_limiter.clone())))
        .route_layer(from_fn_with_state(app_state.jwt.clone(), auth_middleware))
}
