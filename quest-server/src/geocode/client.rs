//! Nominatim HTTP client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::domain::{GeoPoint, Waypoint};

use super::error::GeocodeError;
use super::types::{Place, short_name};

/// Default public Nominatim server.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Base URL of the Nominatim server
    pub base_url: String,
    /// User-Agent sent with every request; Nominatim rejects anonymous clients
    pub user_agent: String,
    /// Most results per search
    pub limit: u8,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("quest-server/", env!("CARGO_PKG_VERSION")).to_string(),
            limit: 5,
            timeout_secs: 10,
        }
    }
}

impl GeocodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }
}

/// Place-name search and reverse lookup.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
    limit: u8,
}

impl GeocodeClient {
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let mut headers = HeaderMap::new();
        let ua = HeaderValue::from_str(&config.user_agent).map_err(|_| GeocodeError::Api {
            status: 0,
            message: "Invalid User-Agent".to_string(),
        })?;
        headers.insert(USER_AGENT, ua);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            limit: config.limit,
        })
    }

    /// Places matching `query`, best match first.
    pub async fn search(&self, query: &str) -> Result<Vec<Waypoint>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let url = format!("{}/search", self.base_url);
        let limit = self.limit.to_string();
        let places: Vec<Place> = self
            .get_json(
                &url,
                &[
                    ("q", query),
                    ("format", "json"),
                    ("limit", limit.as_str()),
                    ("addressdetails", "0"),
                ],
            )
            .await?;

        let waypoints: Vec<Waypoint> = places.iter().filter_map(Place::to_waypoint).collect();
        debug!(query, results = waypoints.len(), "geocoded");
        Ok(waypoints)
    }

    /// Short name for a point, or its formatted coordinates when the
    /// service has nothing.
    pub async fn reverse(&self, point: GeoPoint) -> String {
        let url = format!("{}/reverse", self.base_url);
        let lat = point.lat().to_string();
        let lng = point.lng().to_string();
        let place: Result<Place, _> = self
            .get_json(&url, &[("lat", lat.as_str()), ("lon", lng.as_str()), ("format", "json")])
            .await;

        place
            .ok()
            .map(|p| short_name(&p.display_name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| point.to_string())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GeocodeError> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_agent_names_the_server() {
        assert!(GeocodeConfig::default().user_agent.starts_with("quest-server/"));
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let client = GeocodeClient::new(GeocodeConfig::default()).unwrap();
        let err = client.search("   ").await.unwrap_err();
        assert!(matches!(err, GeocodeError::EmptyQuery));
    }
}
