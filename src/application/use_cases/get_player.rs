use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    application::dto::{ApiResponse, PlayerMeta},
    domain::{repositories::PlayerRepository, value_objects::PlayerTag},
    presentation::middleware::error::ApiError,
};

/// Use case for retrieving a player profile by tag
pub struct GetPlayerUseCase<R>
where
    R: PlayerRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> GetPlayerUseCase<R>
where
    R: PlayerRepository + ?Sized,
    ApiError: From<R::Error>,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate the raw tag and fetch the player it names
    pub async fn execute(&self, raw_tag: &str) -> Result<ApiResponse<Value, PlayerMeta>, ApiError> {
        let tag = PlayerTag::parse(raw_tag)?;
        tracing::info!("Fetching player info for tag: {}", tag);

        let player = self.repository.find_player(&tag).await?;

        Ok(ApiResponse::ok(
            player,
            PlayerMeta { requested_tag: tag.into_string(), timestamp: Utc::now() },
        ))
    }
}
