//! Overpass HTTP client.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::GeoPoint;
use crate::retry::{RetryPolicy, retry_with_backoff};

use super::error::OverpassError;
use super::types::{OverpassResponse, RawHotel, RawPoi};

/// Default public Overpass endpoint.
const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Feature filters for quest-worthy POIs, one per broad theme.
const POI_FILTERS: [&str; 5] = [
    r#"["tourism"~"viewpoint|museum|castle|artwork|attraction"]"#,
    r#"["amenity"~"restaurant|cafe|pub"]["cuisine"]"#,
    r#"["natural"~"peak|waterfall|spring|cave_entrance|beach"]"#,
    r#"["historic"~"castle|monument|memorial|ruins|archaeological_site"]"#,
    r#"["amenity"~"theatre|arts_centre|library"]["name"]"#,
];

/// Configuration for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sample points queried concurrently when scanning a route
    pub batch_size: usize,
    /// Pause between batches when scanning a route
    pub batch_pause: Duration,
    /// Most POIs returned per point query
    pub poi_limit: usize,
    /// Most hotels returned per point query
    pub hotel_limit: usize,
    /// Retry behaviour for transient failures
    pub retry: RetryPolicy,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            batch_size: 5,
            batch_pause: Duration::from_millis(500),
            poi_limit: 30,
            hotel_limit: 15,
            retry: RetryPolicy::default(),
        }
    }
}

impl OverpassConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom interpreter URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_batching(mut self, batch_size: usize, pause: Duration) -> Self {
        self.batch_size = batch_size.max(1);
        self.batch_pause = pause;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Overpass API client for POI and accommodation discovery.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    config: OverpassConfig,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, OverpassError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Named POIs within `radius_m` metres of a point.
    pub async fn find_pois_near(
        &self,
        point: GeoPoint,
        radius_m: u32,
    ) -> Result<Vec<RawPoi>, OverpassError> {
        let query = poi_query(point, radius_m, self.config.poi_limit);
        let response = self.run(&query).await?;
        Ok(response
            .elements
            .into_iter()
            .filter_map(RawPoi::from_element)
            .collect())
    }

    /// POIs near any of `points`, deduplicated by OSM id.
    ///
    /// Points are queried in concurrent batches with a pause in between to
    /// stay polite to the public server. A failing point is logged and
    /// skipped; the result keeps first-seen order.
    pub async fn find_pois_along_route(&self, points: &[GeoPoint], radius_m: u32) -> Vec<RawPoi> {
        scan_points(
            points,
            self.config.batch_size,
            self.config.batch_pause,
            |p| self.find_pois_near(p, radius_m),
        )
        .await
    }

    /// Named hotels, hostels and guest houses within `radius_m` metres.
    pub async fn find_hotels_near(
        &self,
        point: GeoPoint,
        radius_m: u32,
    ) -> Result<Vec<RawHotel>, OverpassError> {
        let query = hotel_query(point, radius_m, self.config.hotel_limit);
        let response = self.run(&query).await?;
        Ok(response
            .elements
            .iter()
            .filter_map(RawHotel::from_element)
            .collect())
    }

    async fn run(&self, query: &str) -> Result<OverpassResponse, OverpassError> {
        retry_with_backoff(self.config.retry, OverpassError::is_transient, || {
            self.post(query)
        })
        .await
        .map_err(|e| e.into_inner())
    }

    async fn post(&self, query: &str) -> Result<OverpassResponse, OverpassError> {
        let response = self
            .http
            .post(&self.config.base_url)
            .form(&[("data", query)])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OverpassError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OverpassError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| OverpassError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

/// Run `lookup` over `points` in batches of `batch_size`, merging results.
async fn scan_points<F, Fut>(
    points: &[GeoPoint],
    batch_size: usize,
    pause: Duration,
    lookup: F,
) -> Vec<RawPoi>
where
    F: Fn(GeoPoint) -> Fut,
    Fut: Future<Output = Result<Vec<RawPoi>, OverpassError>>,
{
    let mut seen = HashSet::new();
    let mut pois = Vec::new();
    let batch_size = batch_size.max(1);
    let batch_count = points.len().div_ceil(batch_size);

    for (batch_idx, batch) in points.chunks(batch_size).enumerate() {
        let results = join_all(batch.iter().map(|p| lookup(*p))).await;

        for (point, result) in batch.iter().zip(results) {
            match result {
                Ok(found) => {
                    for poi in found {
                        if seen.insert(poi.id) {
                            pois.push(poi);
                        }
                    }
                }
                Err(e) => warn!(%point, error = %e, "POI lookup failed, skipping point"),
            }
        }

        if batch_idx + 1 < batch_count {
            tokio::time::sleep(pause).await;
        }
    }

    debug!(points = points.len(), pois = pois.len(), "scanned route for POIs");
    pois
}

fn around(point: GeoPoint, radius_m: u32) -> String {
    format!("(around:{radius_m},{},{})", point.lat(), point.lng())
}

/// Overpass QL for quest-worthy POIs around a point.
pub fn poi_query(point: GeoPoint, radius_m: u32, limit: usize) -> String {
    let around = around(point, radius_m);
    let clauses: String = POI_FILTERS
        .iter()
        .map(|filter| format!("nwr{filter}{around};"))
        .collect();
    format!("[out:json][timeout:25];({clauses});out center {limit};")
}

/// Overpass QL for accommodation around a point.
pub fn hotel_query(point: GeoPoint, radius_m: u32, limit: usize) -> String {
    let around = around(point, radius_m);
    format!(
        r#"[out:json][timeout:10];(nwr["tourism"~"hotel|hostel|guest_house"]{around};);out center {limit};"#
    )
}
