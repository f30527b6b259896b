//! OSRM HTTP client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::GeoPoint;
use crate::retry::{RetryPolicy, retry_with_backoff};

use super::error::RoutingError;
use super::types::{Route, RouteResponse};

/// Default base URL for the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Most points a single route request may pass through.
pub const MAX_ROUTE_POINTS: usize = 27;

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Base URL of the OSRM server
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retry behaviour for transient failures
    pub retry: RetryPolicy,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }
}

impl RoutingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing or a self-hosted server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Driving-route client for an OSRM server.
///
/// Uses a semaphore to limit concurrent requests to the shared public
/// server.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    semaphore: Arc<Semaphore>,
}

impl RoutingClient {
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            retry: config.retry,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Route from `origin` to `destination`.
    pub async fn get_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Route, RoutingError> {
        self.get_route_via(&[origin, destination]).await
    }

    /// Route through `points` in order.
    pub async fn get_route_via(&self, points: &[GeoPoint]) -> Result<Route, RoutingError> {
        if points.len() < 2 || points.len() > MAX_ROUTE_POINTS {
            return Err(RoutingError::WaypointCount {
                got: points.len(),
                max: MAX_ROUTE_POINTS,
            });
        }

        let url = route_url(&self.base_url, points);

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RoutingError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let route = retry_with_backoff(self.retry, RoutingError::is_transient, || {
            self.fetch(&url)
        })
        .await
        .map_err(|e| e.into_inner())?;

        debug!(
            points = points.len(),
            vertices = route.geometry.len(),
            distance_km = route.distance_km(),
            "fetched route"
        );
        Ok(route)
    }

    async fn fetch(&self, url: &str) -> Result<Route, RoutingError> {
        let response = self
            .http
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimited);
        }

        let body = response.text().await?;

        if status.is_server_error() {
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        // OSRM reports "NoRoute" with a 400 status, so client errors are
        // decoded before being judged.
        let parsed = serde_json::from_str::<RouteResponse>(&body);
        if !status.is_success() {
            return match parsed {
                Ok(resp) if resp.code != "Ok" => Route::try_from(resp),
                _ => Err(RoutingError::Api {
                    status: status.as_u16(),
                    message: body.chars().take(500).collect(),
                }),
            };
        }

        let resp = parsed.map_err(|e| RoutingError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;
        Route::try_from(resp)
    }
}

/// `{base}/route/v1/driving/{lng},{lat};{lng},{lat}...`
fn route_url(base_url: &str, points: &[GeoPoint]) -> String {
    let coords = points
        .iter()
        .map(|p| format!("{},{}", p.lng(), p.lat()))
        .collect::<Vec<_>>()
        .join(";");
    format!("{base_url}/route/v1/driving/{coords}")
}

impl super::RouteProvider for RoutingClient {
    async fn route(&self, origin: GeoPoint, destination: GeoPoint) -> Result<Route, RoutingError> {
        self.get_route(origin, destination).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use axum::Router;
    use axum::http::{StatusCode, Uri};

    use super::*;

    /// A local server answering every request with the same status and body.
    struct CannedServer {
        base_url: String,
        hits: Arc<AtomicU32>,
        last_uri: Arc<Mutex<Option<String>>>,
    }

    impl CannedServer {
        async fn start(status: StatusCode, body: &'static str) -> Self {
            let hits = Arc::new(AtomicU32::new(0));
            let last_uri = Arc::new(Mutex::new(None));

            let handler = {
                let hits = hits.clone();
                let last_uri = last_uri.clone();
                move |uri: Uri| {
                    let hits = hits.clone();
                    let last_uri = last_uri.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        *last_uri.lock().unwrap() = Some(uri.to_string());
                        (status, body)
                    }
                }
            };
            let app = Router::new().fallback(handler);

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                base_url: format!("http://{addr}"),
                hits,
                last_uri,
            }
        }

        fn client(&self) -> RoutingClient {
            let config = RoutingConfig::new()
                .with_base_url(&self.base_url)
                .with_retry(RetryPolicy::new(2, Duration::from_millis(1)));
            RoutingClient::new(config).unwrap()
        }

        fn hits(&self) -> u32 {
            self.hits.load(Ordering::SeqCst)
        }
    }

    fn munich_berlin() -> (GeoPoint, GeoPoint) {
        (
            GeoPoint::new(48.1374, 11.5755).unwrap(),
            GeoPoint::new(52.52, 13.405).unwrap(),
        )
    }

    #[tokio::test]
    async fn success_is_decoded_with_swapped_coordinates() {
        let server = CannedServer::start(
            StatusCode::OK,
            r#"{"code":"Ok","routes":[{"geometry":{"type":"LineString",
                "coordinates":[[11.5755,48.1374],[12.1,50.0],[13.405,52.52]]},
                "distance":584000.0,"duration":19800.0}]}"#,
        )
        .await;
        let (from, to) = munich_berlin();

        let route = server.client().get_route(from, to).await.unwrap();
        assert_eq!(route.geometry.len(), 3);
        assert_eq!(route.geometry[1].lat(), 50.0);
        assert_eq!(route.geometry[1].lng(), 12.1);
        assert_eq!(route.distance_km(), 584.0);
        assert_eq!(server.hits(), 1);

        let uri = server.last_uri.lock().unwrap().clone().unwrap();
        assert!(uri.starts_with("/route/v1/driving/11.5755,48.1374;13.405,52.52?"));
        assert!(uri.contains("overview=full"));
        assert!(uri.contains("geometries=geojson"));
    }

    #[tokio::test]
    async fn rate_limiting_is_retried_then_reported() {
        let server = CannedServer::start(StatusCode::TOO_MANY_REQUESTS, "slow down").await;
        let (from, to) = munich_berlin();

        let err = server.client().get_route(from, to).await.unwrap_err();
        assert!(matches!(err, RoutingError::RateLimited));
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_reported() {
        let server = CannedServer::start(StatusCode::SERVICE_UNAVAILABLE, "maintenance").await;
        let (from, to) = munich_berlin();

        let err = server.client().get_route(from, to).await.unwrap_err();
        match err {
            RoutingError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn no_route_on_client_error_is_not_retried() {
        let server = CannedServer::start(
            StatusCode::BAD_REQUEST,
            r#"{"code":"NoRoute","message":"Impossible route between points","routes":[]}"#,
        )
        .await;
        let (from, to) = munich_berlin();

        let err = server.client().get_route(from, to).await.unwrap_err();
        assert!(matches!(err, RoutingError::NoRoute));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn undecodable_client_error_keeps_status() {
        let server = CannedServer::start(StatusCode::BAD_REQUEST, "bad coordinates").await;
        let (from, to) = munich_berlin();

        let err = server.client().get_route(from, to).await.unwrap_err();
        assert!(matches!(err, RoutingError::Api { status: 400, .. }));
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn url_uses_lng_lat_order() {
        let points = [
            GeoPoint::new(48.1374, 11.5755).unwrap(),
            GeoPoint::new(52.52, 13.405).unwrap(),
        ];
        assert_eq!(
            route_url("https://osrm.test", &points),
            "https://osrm.test/route/v1/driving/11.5755,48.1374;13.405,52.52"
        );
    }

    #[test]
    fn config_builder() {
        let config = RoutingConfig::new()
            .with_base_url("http://localhost:5000/")
            .with_max_concurrent(2)
            .with_timeout(5);
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 5);
    }

    #[tokio::test]
    async fn rejects_bad_waypoint_counts() {
        let client = RoutingClient::new(RoutingConfig::default()).unwrap();
        let one = [GeoPoint::new(48.0, 11.0).unwrap()];
        let err = client.get_route_via(&one).await.unwrap_err();
        assert!(matches!(err, RoutingError::WaypointCount { got: 1, .. }));

        let many = vec![GeoPoint::new(48.0, 11.0).unwrap(); MAX_ROUTE_POINTS + 1];
        let err = client.get_route_via(&many).await.unwrap_err();
        assert!(matches!(err, RoutingError::WaypointCount { .. }));
    }
}
