//! Error types for language-model calls.

use thiserror::Error;

/// Errors that can occur while talking to a language model.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Model API returned an error response (4xx, 5xx).
    #[error("Model API error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Response doesn't match the expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Agent configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AgentError {
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            AgentError::Timeout(timeout_ms)
        } else {
            AgentError::Network(e.to_string())
        }
    }
}
