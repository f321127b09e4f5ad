//! Negotiation backend HTTP client
//!
//! Thin transport over the backend's REST API. Result payloads are returned
//! as raw JSON for the normalizer; nothing here interprets them. No retries.

use crate::config::NegoConfig;
use crate::error::{NegoError, Result};
use crate::types::{Satellite, Task};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub mod endpoints {
    pub const CREATE_SATELLITES: &str = "/create-satellites";
    pub const CREATE_TASKS: &str = "/create-tasks";
    pub const START_NEGOTIATION: &str = "/start-negotiation";
    pub const NEGOTIATION_RESULTS: &str = "/negotiation-results";
    pub const SAVE_DATA: &str = "/save-data";
    pub const LOAD_DATA: &str = "/load-data";
}

/// Who initiates the coalition negotiations of a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Initiator {
    /// Every satellite takes a turn; the run comes back multi-initiator
    #[default]
    All,
    Satellite(String),
}

impl Initiator {
    /// `None`, empty and `all` mean every satellite
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(str::trim) {
            None | Some("") => Initiator::All,
            Some(name) if name.eq_ignore_ascii_case("all") => Initiator::All,
            Some(name) => Initiator::Satellite(name.to_string()),
        }
    }

    /// Backend encoding: empty string for all satellites
    pub fn as_wire(&self) -> &str {
        match self {
            Initiator::All => "",
            Initiator::Satellite(name) => name,
        }
    }
}

impl Serialize for Initiator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

/// Body shared by the create endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeRequest {
    pub num_satellites: u32,
    pub num_tasks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegotiationRequest {
    pub num_satellites: u32,
    pub num_tasks: u32,
    pub negotiator_version: String,
    pub initiator: Initiator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilenameRequest {
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SatelliteResponse {
    satellites: Vec<Satellite>,
}

#[derive(Debug, Clone, Deserialize)]
struct TaskResponse {
    tasks: Vec<Task>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

/// Configuration returned by `/load-data`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoadedData {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub satellites: Vec<Satellite>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Negotiation backend client
pub struct BackendClient {
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("negoctl/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                NegoError::BackendUnavailable(format!("HTTP client setup failed: {}", e))
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            http,
        })
    }

    pub fn from_config(config: &NegoConfig) -> Result<Self> {
        Self::new(
            config.backend.url.clone(),
            Duration::from_secs(config.backend.effective_timeout_secs()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn create_satellites(&self, num_satellites: u32) -> Result<Vec<Satellite>> {
        let body = SizeRequest { num_satellites, num_tasks: 0 };
        let response: SatelliteResponse =
            decode(self.post(endpoints::CREATE_SATELLITES, &body).await?)?;
        Ok(response.satellites)
    }

    pub async fn create_tasks(&self, num_tasks: u32) -> Result<Vec<Task>> {
        let body = SizeRequest { num_satellites: 0, num_tasks };
        let response: TaskResponse = decode(self.post(endpoints::CREATE_TASKS, &body).await?)?;
        Ok(response.tasks)
    }

    /// Run a negotiation; the response is the raw result payload.
    pub async fn start_negotiation(&self, request: &NegotiationRequest) -> Result<Value> {
        self.post(endpoints::START_NEGOTIATION, request).await
    }

    /// Latest result set held by the backend
    pub async fn negotiation_results(&self) -> Result<Value> {
        self.get(endpoints::NEGOTIATION_RESULTS).await
    }

    pub async fn save_data(&self, filename: &str) -> Result<String> {
        let body = FilenameRequest { filename: filename.to_string() };
        let response: MessageResponse = decode(self.post(endpoints::SAVE_DATA, &body).await?)?;
        Ok(response.message)
    }

    pub async fn load_data(&self, filename: &str) -> Result<LoadedData> {
        let body = FilenameRequest { filename: filename.to_string() };
        decode(self.post(endpoints::LOAD_DATA, &body).await?)
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        read_json(&url, response).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        read_json(&url, response).await
    }
}

async fn read_json(url: &str, response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(url, e))?;

    if !status.is_success() {
        let detail = error_detail(&body);
        warn!(%url, status = status.as_u16(), %detail, "backend returned error");
        return Err(NegoError::Backend {
            status: status.as_u16(),
            detail,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

fn transport_error(url: &str, error: reqwest::Error) -> NegoError {
    let reason = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection refused".to_string()
    } else {
        error.to_string()
    };
    NegoError::BackendUnavailable(format!("{} ({})", url, reason))
}

/// Human-readable message from an error body.
///
/// Prefers a `{"detail": ...}` field, falls back to the raw text.
pub fn error_detail(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        match map.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(other) if !other.is_null() => return other.to_string(),
            _ => {}
        }
    }
    if trimmed.is_empty() {
        "no detail".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initiator_from_arg() {
        assert_eq!(Initiator::from_arg(None), Initiator::All);
        assert_eq!(Initiator::from_arg(Some("")), Initiator::All);
        assert_eq!(Initiator::from_arg(Some("ALL")), Initiator::All);
        assert_eq!(
            Initiator::from_arg(Some(" sat2 ")),
            Initiator::Satellite("sat2".to_string())
        );
    }

    #[test]
    fn test_negotiation_request_body() {
        let request = NegotiationRequest {
            num_satellites: 3,
            num_tasks: 5,
            negotiator_version: "v031".to_string(),
            initiator: Initiator::All,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"num_satellites": 3, "num_tasks": 5, "negotiator_version": "v031", "initiator": ""})
        );

        let request = NegotiationRequest {
            initiator: Initiator::Satellite("sat1".to_string()),
            ..request
        };
        assert_eq!(serde_json::to_value(&request).unwrap()["initiator"], "sat1");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = BackendClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.endpoint(endpoints::NEGOTIATION_RESULTS),
            "http://localhost:8000/negotiation-results"
        );
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(r#"{"detail": "No negotiation results found"}"#),
            "No negotiation results found"
        );
        assert_eq!(error_detail("Internal Server Error"), "Internal Server Error");
        assert_eq!(error_detail("   "), "no detail");
        assert_eq!(
            error_detail(r#"{"detail": [{"msg": "field required"}]}"#),
            r#"[{"msg":"field required"}]"#
        );
    }

    #[test]
    fn test_loaded_data_decodes_backend_shape() {
        let loaded: LoadedData = decode(json!({
            "message": "Data loaded successfully",
            "satellites": [{
                "name": "sat1",
                "memory_capacity": 100,
                "coalition_table": {"satellite": "sat1", "preferences": [
                    {"task_id": 1, "preferred_satellites": ["sat2"], "priority": 1}
                ]}
            }],
            "tasks": [{"id": 1, "location": "Adelaide", "reward_points": 50}]
        }))
        .unwrap();
        assert_eq!(loaded.satellites[0].available_memory, None);
        let table = loaded.satellites[0].coalition_table.as_ref().unwrap();
        assert_eq!(
            table.preferences[0].preferred_satellites,
            vec!["sat2"]
        );
        assert_eq!(loaded.tasks[0].location_index, None);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        // Port 9 (discard) is closed on test hosts
        let client = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.negotiation_results().await.unwrap_err();
        assert!(matches!(err, NegoError::BackendUnavailable(_)));
    }
}
