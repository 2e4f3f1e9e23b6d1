use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::room::RoomId;

const DISPLAY_VALUE_POINTER: &str = "/data/data/data/0/room_view_stats/display_value";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no room id in current url")]
    NoRoomId,

    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// Viewer count as formatted by the counting service (e.g. `1.2万`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayValue {
    Text(String),
    /// The response did not carry a display value.
    Unknown,
}

/// Client for the counting service's `get_live_room_num` endpoint.
#[derive(Debug, Clone)]
pub struct ViewerCountClient {
    client: Client,
    config: ServiceConfig,
}

impl ViewerCountClient {
    pub fn new(config: ServiceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Fetches the current viewer count of a room.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::RequestFailed` when the request fails, times out, or
    /// the body is not JSON. A JSON body without the display value is not an
    /// error and yields `DisplayValue::Unknown`.
    pub async fn fetch_count(&self, room_id: &RoomId) -> Result<DisplayValue, FetchError> {
        let url = format!("{}/get_live_room_num", self.config.base_url.trim_end_matches('/'));

        let mut query = vec![("webcast_id", room_id.as_str())];
        if let Some(version) = &self.config.version {
            query.push(("version", version.as_str()));
        }
        if let Some(platform) = &self.config.platform {
            query.push(("platform", platform.as_str()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let raw_body = response
            .text()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let body: Value = serde_json::from_str(&raw_body)
            .map_err(|e| FetchError::RequestFailed(format!("invalid JSON body: {}", e)))?;

        Ok(extract_display_value(&body))
    }
}

/// Reads `data.data.data[0].room_view_stats.display_value`.
///
/// Empty strings and a numeric zero count as absent.
pub fn extract_display_value(body: &Value) -> DisplayValue {
    match body.pointer(DISPLAY_VALUE_POINTER) {
        Some(Value::String(value)) if !value.is_empty() => DisplayValue::Text(value.clone()),
        Some(Value::Number(value)) if value.as_f64() != Some(0.0) => DisplayValue::Text(value.to_string()),
        _ => DisplayValue::Unknown,
    }
}
