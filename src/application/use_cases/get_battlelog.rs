use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    application::dto::{ApiResponse, BattlelogMeta},
    domain::{repositories::PlayerRepository, value_objects::PlayerTag},
    presentation::middleware::error::ApiError,
};

/// Use case for retrieving a player's recent battles
pub struct GetBattlelogUseCase<R>
where
    R: PlayerRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> GetBattlelogUseCase<R>
where
    R: PlayerRepository + ?Sized,
    ApiError: From<R::Error>,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate the raw tag and fetch the battle log; `battleCount` is 0 unless the body is an array
    pub async fn execute(
        &self,
        raw_tag: &str,
    ) -> Result<ApiResponse<Value, BattlelogMeta>, ApiError> {
        let tag = PlayerTag::parse(raw_tag)?;
        tracing::info!("Fetching battle log for tag: {}", tag);

        let battlelog = self.repository.find_battlelog(&tag).await?;
        let battle_count = battlelog.as_array().map_or(0, Vec::len);

        Ok(ApiResponse::ok(
            battlelog,
            BattlelogMeta { requested_tag: tag.into_string(), battle_count, timestamp: Utc::now() },
        ))
    }
}
