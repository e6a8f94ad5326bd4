use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{
    application::{
        dto::{ApiResponse, BattlelogMeta, PlayerMeta},
        use_cases::{GetBattlelogUseCase, GetPlayerUseCase},
    },
    domain::repositories::PlayerRepository,
    infrastructure::{clash_royale::UpstreamError, config::AppConfig},
    presentation::middleware::{
        auth::{JwtService, UserContext},
        error::ApiError,
        rate_limit::FixedWindowRateLimiter,
    },
};

/// Type alias for the player source shared by handlers
pub type SharedPlayerRepository = Arc<dyn PlayerRepository<Error = UpstreamError>>;

/// Shared state for all request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub players: SharedPlayerRepository,
    /// `None` when no JWT secret is configured
    pub jwt: Option<JwtService>,
    pub rate_limiter: FixedWindowRateLimiter,
}

/// Get a player profile
///
/// # Errors
/// Returns 400 for malformed tags and the mapped upstream error otherwise
pub async fn get_player_info(
    State(state): State<AppState>,
    user: UserContext,
    tag: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Value, PlayerMeta>>, ApiError> {
    let Path(tag) = tag?;
    debug!(subject = %user.subject, tag = %tag, "Player info requested");

    let use_case = GetPlayerUseCase::new(Arc::clone(&state.players));
    Ok(Json(use_case.execute(&tag).await?))
}

/// Get the recent battles of a player
///
/// # Errors
/// Returns 400 for malformed tags and the mapped upstream error otherwise
pub async fn get_player_battlelog(
    State(state): State<AppState>,
    user: UserContext,
    tag: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Value, BattlelogMeta>>, ApiError> {
    let Path(tag) = tag?;
    debug!(subject = %user.subject, tag = %tag, "Battle log requested");

    let use_case = GetBattlelogUseCase::new(Arc::clone(&state.players));
    Ok(Json(use_case.execute(&tag).await?))
}
