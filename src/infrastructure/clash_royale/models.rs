use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error payload returned by the Clash Royale API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
}

impl UpstreamErrorBody {
    /// Parse an error body, tolerating empty or non-JSON payloads
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Client-facing message: `message`, else `reason`, else a generic fallback
    pub fn display_message(&self) -> String {
        self.message
            .as_deref()
            .or(self.reason.as_deref())
            .unwrap_or("An error occurred")
            .to_string()
    }

    /// `{reason, type, detail}` with absent fields left out; `None` when all are absent
    pub fn details(&self) -> Option<Value> {
        let mut details = Map::new();
        if let Some(reason) = &self.reason {
            details.insert("reason".to_string(), Value::String(reason.clone()));
        }
        if let Some(error_type) = &self.error_type {
            details.insert("type".to_string(), Value::String(error_type.clone()));
        }
        if let Some(detail) = &self.detail {
            details.insert("detail".to_string(), detail.clone());
        }

        (!details.is_empty()).then_some(Value::Object(details))
    }
}
