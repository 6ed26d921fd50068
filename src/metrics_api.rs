use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use ureq::Agent;

use crate::models::{CallRecord, Credential, Summary};

const SUMMARY_PATH: &str = "/metrics/summary";
const CALLS_PATH: &str = "/metrics/calls";
const API_KEY_HEADER: &str = "X-API-Key";
const USER_AGENT: &str = concat!("tokescope-dashboard/", env!("CARGO_PKG_VERSION"));

/// Number of recent calls requested per load
pub const RECENT_CALLS_LIMIT: usize = 100;

/// Failure of a single metrics request. `Display` is the banner text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request never produced an HTTP response
    #[error("{0}")]
    Transport(String),
    /// Non-2xx response; `message` prefers the service's `detail` field
    #[error("{message}")]
    Status { status: u16, message: String },
    /// 2xx response whose body is not the expected shape
    #[error("Unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Read side of the metrics service.
///
/// Both operations issue exactly one request and never retry.
pub trait MetricsSource: Send + Sync {
    fn fetch_summary(&self, credential: &Credential) -> Result<Summary, RequestError>;

    fn fetch_recent_calls(
        &self,
        credential: &Credential,
        limit: usize,
    ) -> Result<Vec<CallRecord>, RequestError>;
}

/// Blocking HTTP client backed by a shared `ureq` agent
#[derive(Clone)]
pub struct MetricsClient {
    agent: Agent,
    base_url: String,
}

impl MetricsClient {
    pub fn new(base_url: &str) -> Self {
        // Error statuses come back as responses so the `detail` body can be read
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        MetricsClient {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: &Credential,
        query: &[(&str, String)],
    ) -> Result<T, RequestError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .agent
            .get(url.as_str())
            .header(API_KEY_HEADER, credential.as_str())
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");
        for (key, value) in query {
            request = request.query(*key, value);
        }

        log::debug!("GET {url}");
        let mut response = request
            .call()
            .map_err(|e| RequestError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RequestError::Transport(e.to_string()))?;
        log::debug!("GET {url} -> {} ({} bytes)", status.as_u16(), body.len());

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| RequestError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

impl MetricsSource for MetricsClient {
    fn fetch_summary(&self, credential: &Credential) -> Result<Summary, RequestError> {
        self.get_json(SUMMARY_PATH, credential, &[])
    }

    fn fetch_recent_calls(
        &self,
        credential: &Credential,
        limit: usize,
    ) -> Result<Vec<CallRecord>, RequestError> {
        self.get_json(CALLS_PATH, credential, &[("limit", limit.to_string())])
    }
}

/// Build the error for a non-2xx response.
///
/// FastAPI-style bodies carry `{"detail": ...}`; a string detail is used
/// verbatim, any other JSON detail is shown compactly.
pub fn status_error(status: u16, body: &str) -> RequestError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .and_then(|d| match d {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });
    RequestError::Status {
        status,
        message: detail.unwrap_or_else(|| format!("Request failed with status code {status}")),
    }
}
