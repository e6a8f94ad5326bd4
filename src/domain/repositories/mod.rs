use crate::domain::value_objects::PlayerTag;
use async_trait::async_trait;
use serde_json::Value;

/// Read-only source of player statistics
///
/// Payloads are passed through untouched, so they are kept as raw JSON.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the player profile for a tag
    async fn find_player(&self, tag: &PlayerTag) -> Result<Value, Self::Error>;

    /// Fetch the most recent battles of a player
    async fn find_battlelog(&self, tag: &PlayerTag) -> Result<Value, Self::Error>;

    /// Check whether the backing source is reachable
    async fn health_check(&self) -> Result<(), Self::Error>;
}
