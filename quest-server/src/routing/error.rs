//! Routing client error types.

/// Errors from the road-routing service.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Service returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the routing service
    #[error("rate limited by routing service")]
    RateLimited,

    /// The service answered but found no route between the points
    #[error("no route found")]
    NoRoute,

    /// Route geometry contained unusable coordinates
    #[error("invalid route geometry: {0}")]
    InvalidGeometry(String),

    /// Fewer than two waypoints, or more than the service accepts
    #[error("route needs between 2 and {max} waypoints, got {got}")]
    WaypointCount { got: usize, max: usize },
}

impl RoutingError {
    /// Whether repeating the request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RoutingError::RateLimited => true,
            RoutingError::Api { status, .. } => *status >= 500,
            RoutingError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
