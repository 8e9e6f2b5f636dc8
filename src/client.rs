//! HTTP adapter for the portal API.
//!
//! One thin client over reqwest: builds `<base>/api/<path>` URLs, serializes
//! JSON bodies, injects the auth header in the configured style, and returns
//! the status code plus a best-effort decoded body. Transport failures are a
//! distinct error from HTTP error statuses, and there is no retry: a failed
//! call is a single recorded failure.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{HarnessConfig, HeaderStyle};
use crate::error::StepError;

pub use reqwest::Method;

/// Response body after best-effort JSON decoding. Non-2xx bodies are not
/// guaranteed to be JSON, so raw text is kept as a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{}", value),
            ResponseBody::Text(text) => write!(f, "{}", text),
            ResponseBody::Empty => write!(f, "<empty>"),
        }
    }
}

/// Status code plus decoded body of one API call
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

/// HTTP client bound to one backend for the duration of a run
pub struct ApiClient {
    base_url: String,
    header_style: HeaderStyle,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &HarnessConfig) -> Result<Self, StepError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StepError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            header_style: config.header_style,
            client,
        })
    }

    /// Full URL for an API path, e.g. `auth/login` ->
    /// `http://host/api/auth/login`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue one request. `token` is attached using the configured header
    /// style when present. Network failures surface as
    /// `StepError::Transport`; every HTTP status is returned as a response.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<ApiResponse, StepError> {
        let url = self.url(path);
        log::debug!("{} {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = match self.header_style {
                HeaderStyle::Bearer => req.header("Authorization", format!("Bearer {}", token)),
                HeaderStyle::XAuthToken => req.header("x-auth-token", token),
            };
        }

        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().await?;
        let status = res.status().as_u16();
        let text = res.text().await?;

        let body = if text.is_empty() {
            ResponseBody::Empty
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => ResponseBody::Json(value),
                Err(_) => ResponseBody::Text(text),
            }
        };
        log::debug!("-> {} {}", status, body);

        Ok(ApiResponse { status, body })
    }
}
