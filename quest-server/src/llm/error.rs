//! LLM client error types.

use std::time::Duration;

/// Errors from the language-model API.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No API key configured; AI features are off
    #[error("language model not configured")]
    NotConfigured,

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by language model API")]
    RateLimited,

    /// The call did not finish within its deadline
    #[error("language model timed out after {0:?}")]
    Timeout(Duration),

    /// The reply had no text (blocked or empty candidate list)
    #[error("language model returned no text")]
    EmptyResponse,

    /// Reply text was not the JSON we asked for
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}

impl LlmError {
    /// Whether repeating the request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RateLimited => true,
            LlmError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
