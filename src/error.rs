use thiserror::Error;

/// Why a step failed. Every variant is caught at the step boundary and
/// converted into a failed `StepResult`; nothing here crashes a run.
#[derive(Debug, Error)]
pub enum StepError {
    /// Connection refused, timeout, DNS failure. Never conflated with an
    /// HTTP error status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call completed but the status code did not match the step's
    /// contract. The body is kept for diagnosis.
    #[error("expected status {expected}, got {actual}")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        body: crate::client::ResponseBody,
    },

    /// The response decoded fine but lacks a field a later step depends on
    /// (e.g. no token on login). Step success means "HTTP contract met AND
    /// required output extracted", so this fails the step.
    #[error("response is missing required field '{field}'")]
    MissingField { field: &'static str },
}

impl From<reqwest::Error> for StepError {
    fn from(err: reqwest::Error) -> Self {
        StepError::Transport(err.to_string())
    }
}

/// Unrecoverable configuration problem detected before any step executes.
/// Reported distinctly from step failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no base URL: pass --base-url or set PORTAL_BASE_URL")]
    MissingBaseUrl,
}
