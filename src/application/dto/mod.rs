use chrono::{DateTime, Utc};
use serde::Serialize;

/// Success envelope for proxied resources
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T, M> {
    pub success: bool,
    pub data: T,
    pub meta: M,
}

impl<T, M> ApiResponse<T, M> {
    pub fn ok(data: T, meta: M) -> Self {
        Self { success: true, data, meta }
    }
}

/// Metadata attached to a player profile response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMeta {
    pub requested_tag: String,
    pub timestamp: DateTime<Utc>,
}

/// Metadata attached to a battle log response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattlelogMeta {
    pub requested_tag: String,
    pub battle_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_serialization() {
        let timestamp = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let response = ApiResponse::ok(
            json!({ "tag": "#2ABC" }),
            BattlelogMeta { requested_tag: "#2ABC".to_string(), battle_count: 3, timestamp },
        );

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "data": { "tag": "#2ABC" },
                "meta": {
                    "requestedTag": "#2ABC",
                    "battleCount": 3,
                    "timestamp": "2024-01-01T00:00:00Z"
                }
            })
        );
    }
}
