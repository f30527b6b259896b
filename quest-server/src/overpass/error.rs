//! Overpass client error types.

/// Errors from the Overpass API.
#[derive(Debug, thiserror::Error)]
pub enum OverpassError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the Overpass server
    #[error("rate limited by Overpass API")]
    RateLimited,
}

impl OverpassError {
    /// Whether repeating the request could succeed.
    ///
    /// Overpass answers 504 when the server is overloaded, which is worth
    /// retrying like any other server error.
    pub fn is_transient(&self) -> bool {
        match self {
            OverpassError::RateLimited => true,
            OverpassError::Api { status, .. } => *status >= 500,
            OverpassError::Http(e) => e.is_timeout() || e.is_connect(),
            OverpassError::Json { .. } => false,
        }
    }
}
