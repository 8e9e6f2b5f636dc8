use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable consulted when --base-url is not given.
pub const BASE_URL_ENV: &str = "PORTAL_BASE_URL";

/// How the auth token is carried on authenticated requests. Observed
/// backends differ, so this is configuration, not a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderStyle {
    /// `Authorization: Bearer <token>`
    Bearer,
    /// `x-auth-token: <token>`
    XAuthToken,
}

/// Harness configuration for one run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Target backend, without the `/api` prefix. Trailing slash trimmed.
    pub base_url: String,

    /// Auth header convention of the target backend
    pub header_style: HeaderStyle,

    /// Per-request timeout (seconds). Timeout counts as a transport error.
    pub timeout_secs: u64,

    /// Run the chat steps (start/send/get/get-all)
    pub chat_enabled: bool,

    /// Run the text-suggestions step (advisory; external dependency)
    pub suggestions_enabled: bool,

    /// Chat participant override. When unset the registered user's own id
    /// is used so the flow is self-contained.
    pub participant_id: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            header_style: HeaderStyle::Bearer,
            timeout_secs: 10,
            chat_enabled: true,
            suggestions_enabled: true,
            participant_id: None,
        }
    }
}

impl HarnessConfig {
    /// Resolve the base URL: explicit flag > environment > error.
    pub fn resolve_base_url(explicit: Option<String>) -> Result<String, ConfigError> {
        let raw = match explicit {
            Some(url) => url,
            None => std::env::var(BASE_URL_ENV).map_err(|_| ConfigError::MissingBaseUrl)?,
        };
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins_and_is_trimmed() {
        let url =
            HarnessConfig::resolve_base_url(Some("http://localhost:8001/".to_string())).unwrap();
        assert_eq!(url, "http://localhost:8001");
    }

    #[test]
    fn empty_explicit_url_is_an_error() {
        let err = HarnessConfig::resolve_base_url(Some("   ".to_string()));
        assert!(matches!(err, Err(ConfigError::MissingBaseUrl)));
    }
}
