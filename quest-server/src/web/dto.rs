//! Data transfer objects for web requests and responses.
//!
//! Requests carry raw numbers and strings; handlers validate them into
//! domain types with the helpers at the bottom of this module.

use serde::{Deserialize, Serialize};

use crate::catalog::ExplorationProgress;
use crate::cost::TransportOptions;
use crate::domain::{FuelType, GeoPoint, MatchedQuest, QuestCategory, TransportMode, Waypoint};
use crate::routing::Route;
use crate::suggest::{TripIdea, TripSuggestion};

/// Longest accepted place name or search string.
pub const MAX_LOCATION_LEN: usize = 200;

/// Most intermediate waypoints accepted by `/api/route`.
pub const MAX_WAYPOINTS: usize = 25;

/// A coordinate as sent by clients.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Request to route through a list of points.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub origin: LatLng,
    pub destination: LatLng,

    /// Intermediate stops, in order
    #[serde(default)]
    pub waypoints: Vec<LatLng>,
}

/// A routed path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub geometry: Vec<GeoPoint>,

    /// Metres
    pub distance: f64,

    /// Seconds
    pub duration: f64,
}

impl RouteResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            geometry: route.geometry.clone(),
            distance: route.distance_m,
            duration: route.duration_s,
        }
    }
}

/// Request for quests between two points.
///
/// Shared by the catalog and AI quest endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSearchRequest {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub origin_name: Option<String>,
    pub dest_lat: f64,
    pub dest_lng: f64,
    pub dest_name: Option<String>,

    /// Category names; unknown names are ignored
    #[serde(default)]
    pub interests: Vec<String>,

    /// Detour budget, clamped to 1..=120 (default 30)
    pub max_detour_minutes: Option<f64>,
}

/// Catalog quests along a route, with the route itself.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSearchResponse {
    pub quests: Vec<MatchedQuest>,
    pub route_geometry: Vec<GeoPoint>,

    /// Metres
    pub distance: f64,

    /// Seconds
    pub duration: f64,
}

/// AI-generated quests.
#[derive(Debug, Serialize)]
pub struct AiQuestResponse {
    pub quests: Vec<MatchedQuest>,
}

/// Request for a full multi-day itinerary.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRequest {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub origin_name: Option<String>,
    pub dest_lat: f64,
    pub dest_lng: f64,
    pub dest_name: Option<String>,

    /// Trip length, clamped to 1..=14 (default 3)
    pub days: Option<f64>,

    #[serde(default)]
    pub interests: Vec<String>,

    /// `car` or `train`
    pub transport_mode: Option<String>,

    /// `petrol`, `diesel` or `electric`
    pub fuel_type: Option<String>,

    /// Unlimited regional rail pass
    #[serde(default, alias = "hasDeutschlandticket")]
    pub has_rail_pass: bool,

    /// Defaults to true
    pub is_round_trip: Option<bool>,
}

impl ItineraryRequest {
    pub fn transport(&self) -> TransportOptions {
        transport_options(
            self.transport_mode.as_deref(),
            self.fuel_type.as_deref(),
            self.has_rail_pass,
        )
    }
}

/// Request for destination suggestions from a named start point.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanRequest {
    pub start_location: String,

    /// EUR, clamped to 1..=100000 (default 500)
    pub budget: Option<f64>,

    /// Clamped to 1..=30 (default 3)
    pub days: Option<f64>,

    #[serde(default)]
    pub interests: Vec<String>,
    pub transport_mode: Option<String>,
    pub fuel_type: Option<String>,

    #[serde(default, alias = "hasDeutschlandticket")]
    pub has_rail_pass: bool,
}

impl TripPlanRequest {
    pub fn transport(&self) -> TransportOptions {
        transport_options(
            self.transport_mode.as_deref(),
            self.fuel_type.as_deref(),
            self.has_rail_pass,
        )
    }
}

/// Ranked destinations and the geocoded start point.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanResponse {
    pub suggestions: Vec<TripSuggestion>,
    pub start_point: Waypoint,
}

/// Where a set of trip ideas came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaSource {
    /// Written by the language model
    Ai,
    /// Derived from ranked catalog regions
    Catalog,
}

/// Trip ideas for a start location.
#[derive(Debug, Serialize)]
pub struct TripSuggestResponse {
    pub suggestions: Vec<TripIdea>,
    pub source: IdeaSource,
}

/// Request for exploration progress.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    #[serde(default)]
    pub completed_ids: Vec<String>,
}

/// Progress overall and per region.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub overall: ProgressEntry,
    pub regions: Vec<RegionProgressEntry>,
}

/// Progress numbers with their rank name.
#[derive(Debug, Serialize)]
pub struct ProgressEntry {
    #[serde(flatten)]
    pub progress: ExplorationProgress,
    pub label: &'static str,
}

/// Progress for one catalog region.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionProgressEntry {
    pub region_id: String,
    pub name: String,
    #[serde(flatten)]
    pub progress: ProgressEntry,
}

/// Query for geocoding search.
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub q: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Validate a coordinate pair. `what` names it in the error message.
pub fn parse_point(lat: f64, lng: f64, what: &str) -> Result<GeoPoint, String> {
    GeoPoint::new(lat, lng).map_err(|e| format!("Invalid {what}: {e}"))
}

/// Detour budget in minutes: 1..=120, 30 when missing.
pub fn clamp_detour(minutes: Option<f64>) -> u32 {
    match minutes {
        Some(m) if m.is_finite() => m.round().clamp(1.0, 120.0) as u32,
        _ => 30,
    }
}

/// Day count: 1..=`max`, 3 when missing.
pub fn clamp_days(days: Option<f64>, max: u32) -> u32 {
    match days {
        Some(d) if d.is_finite() => d.round().clamp(1.0, f64::from(max.max(1))) as u32,
        _ => 3,
    }
}

/// Budget in EUR: 1..=100000, 500 when missing.
pub fn clamp_budget(budget: Option<f64>) -> f64 {
    match budget {
        Some(b) if b.is_finite() => b.clamp(1.0, 100_000.0),
        _ => 500.0,
    }
}

/// Trim a user-supplied place name, falling back to `default` when blank.
///
/// Names longer than [`MAX_LOCATION_LEN`] characters are cut.
pub fn place_name(name: Option<&str>, default: &str) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n.chars().take(MAX_LOCATION_LEN).collect(),
        None => default.to_string(),
    }
}

/// Parse interest names, silently dropping unknown ones.
pub fn parse_interests(names: &[String]) -> Vec<QuestCategory> {
    QuestCategory::parse_lenient(names)
}

fn transport_options(mode: Option<&str>, fuel: Option<&str>, rail_pass: bool) -> TransportOptions {
    match TransportMode::parse_lenient(mode) {
        TransportMode::Train => TransportOptions::train(rail_pass),
        TransportMode::Car => TransportOptions::car(FuelType::parse_lenient(fuel)),
    }
}
