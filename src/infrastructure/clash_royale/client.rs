use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client as HttpClient,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::{error::UpstreamError, models::UpstreamErrorBody};
use crate::{
    domain::{repositories::PlayerRepository, value_objects::PlayerTag},
    infrastructure::config::UpstreamConfig,
};

/// HTTP client for the Clash Royale public API
#[derive(Debug, Clone)]
pub struct ClashRoyaleClient {
    base_url: String,
    http_client: HttpClient,
}

impl ClashRoyaleClient {
    /// Build a client that attaches the API key to every request
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| UpstreamError::Configuration("API key contains invalid characters".into()))?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| UpstreamError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { base_url: config.base_url.trim_end_matches('/').to_string(), http_client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` and decode the body as JSON
    async fn get_json(&self, path: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Clash Royale API request");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Clash Royale API unreachable");
            UpstreamError::unreachable(&e)
        })?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Clash Royale API response");

        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let body = UpstreamErrorBody::from_bytes(&bytes);
            if status.is_server_error() {
                error!(status = status.as_u16(), url = %url, body = ?body, "Clash Royale API error");
            } else {
                warn!(status = status.as_u16(), url = %url, body = ?body, "Clash Royale API error");
            }
            return Err(UpstreamError::status(status.as_u16(), body));
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(url = %url, error = %e, "Clash Royale API response body could not be read");
            UpstreamError::unreachable(&e)
        })?;

        serde_json::from_slice::<Value>(&bytes).map_err(|e| {
            error!(url = %url, error = %e, "Failed to decode Clash Royale API response");
            UpstreamError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait]
impl PlayerRepository for ClashRoyaleClient {
    type Error = UpstreamError;

    async fn find_player(&self, tag: &PlayerTag) -> Result<Value, Self::Error> {
        self.get_json(&format!("/players/{}", tag.encoded())).await
    }

    async fn find_battlelog(&self, tag: &PlayerTag) -> Result<Value, Self::Error> {
        self.get_json(&format!("/players/{}/battlelog", tag.encoded())).await
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        let url = format!("{}/", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::unreachable(&e))?;

        let status = response.status();
        if status.is_server_error() {
            let bytes = response.bytes().await.unwrap_or_default();
            return Err(UpstreamError::status(status.as_u16(), UpstreamErrorBody::from_bytes(&bytes)));
        }

        Ok(())
    }
}
