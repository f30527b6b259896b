//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::catalog::{overall_progress, progress_label, region_progress};
use crate::discovery::QuestDiscovery;
use crate::domain::{GeoPoint, Itinerary, Waypoint};
use crate::geocode::GeocodeError;
use crate::itinerary::{ItineraryError, TripPlanner, TripRequest};
use crate::matcher::match_catalog_quests;
use crate::routing::RoutingError;
use crate::suggest::{SuggestionRequest, catalog_ideas, suggest_trips};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/route", post(calc_route))
        .route("/api/quests", post(catalog_quests))
        .route("/api/quests-ai", post(ai_quests))
        .route("/api/trip-itinerary", post(trip_itinerary))
        .route("/api/trip-plan", post(trip_plan))
        .route("/api/trip-suggest", post(trip_suggest))
        .route("/api/progress", post(progress))
        .route("/api/geocode", get(geocode))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Route from origin through optional waypoints to destination.
async fn calc_route(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResult>, AppError> {
    if req.waypoints.len() > MAX_WAYPOINTS {
        return Err(AppError::BadRequest {
            message: format!("Maximum {MAX_WAYPOINTS} waypoints allowed"),
        });
    }

    let origin = parse_point(req.origin.lat, req.origin.lng, "origin").map_err(bad_request)?;
    let destination =
        parse_point(req.destination.lat, req.destination.lng, "destination").map_err(bad_request)?;

    // Invalid intermediate points are skipped rather than rejected.
    let via: Vec<GeoPoint> = req
        .waypoints
        .iter()
        .filter_map(|w| GeoPoint::new(w.lat, w.lng).ok())
        .collect();

    if via.is_empty() {
        let route = state.routing.get_route(origin, destination).await?;
        return Ok(Json(RouteResult::from_route(&route)));
    }

    let mut points = Vec::with_capacity(via.len() + 2);
    points.push(origin);
    points.extend(via);
    points.push(destination);
    let route = state.routing.client().get_route_via(&points).await?;
    Ok(Json(RouteResult::from_route(&route)))
}

/// Catalog quests within the detour budget of the route.
async fn catalog_quests(
    State(state): State<AppState>,
    Json(req): Json<QuestSearchRequest>,
) -> Result<Json<QuestSearchResponse>, AppError> {
    let (origin, destination) = endpoints(&req)?;
    let budget = clamp_detour(req.max_detour_minutes);
    let interests = parse_interests(&req.interests);

    let route = state.routing.get_route(origin, destination).await?;
    let quests = match_catalog_quests(
        &state.catalog,
        &route.geometry,
        budget,
        &interests,
        &state.matcher,
    );

    info!(quests = quests.len(), budget, "catalog quests along route");

    Ok(Json(QuestSearchResponse {
        quests,
        route_geometry: route.geometry.clone(),
        distance: route.distance_m,
        duration: route.duration_s,
    }))
}

/// AI quests discovered along the route.
async fn ai_quests(
    State(state): State<AppState>,
    Json(req): Json<QuestSearchRequest>,
) -> Result<Json<AiQuestResponse>, AppError> {
    let (origin, destination) = endpoints(&req)?;
    let origin = Waypoint::new(origin, place_name(req.origin_name.as_deref(), "Origin"));
    let destination = Waypoint::new(
        destination,
        place_name(req.dest_name.as_deref(), "Destination"),
    );
    let budget = clamp_detour(req.max_detour_minutes);
    let interests = parse_interests(&req.interests);

    let discovery = QuestDiscovery::new(
        &state.catalog,
        state.routing.as_ref(),
        &state.overpass,
        &state.llm,
    )
    .with_config(state.discovery.as_ref().clone());

    let found = discovery
        .discover(&origin, &destination, &interests, budget)
        .await?;

    Ok(Json(AiQuestResponse {
        quests: found.quests,
    }))
}

/// Build a complete multi-day itinerary.
async fn trip_itinerary(
    State(state): State<AppState>,
    Json(req): Json<ItineraryRequest>,
) -> Result<Json<Itinerary>, AppError> {
    let origin = parse_point(req.origin_lat, req.origin_lng, "origin").map_err(bad_request)?;
    let destination =
        parse_point(req.dest_lat, req.dest_lng, "destination").map_err(bad_request)?;

    let origin = Waypoint::new(origin, named(&state, req.origin_name.as_deref(), origin).await);
    let destination = Waypoint::new(
        destination,
        named(&state, req.dest_name.as_deref(), destination).await,
    );

    let days = clamp_days(req.days, state.itinerary.max_days);
    let mut request = TripRequest::new(origin, destination, days)
        .with_interests(parse_interests(&req.interests))
        .with_transport(req.transport());
    if req.is_round_trip == Some(false) {
        request = request.one_way();
    }

    let planner = TripPlanner::new(&state.catalog, state.routing.as_ref(), state.lodging.as_ref())
        .with_config(state.itinerary.as_ref().clone())
        .with_matcher(state.matcher.as_ref().clone())
        .with_costs(state.costs.as_ref().clone());

    let itinerary = planner.build(&request).await?;
    Ok(Json(itinerary))
}

/// Geocode a start location and rank destinations from it.
async fn trip_plan(
    State(state): State<AppState>,
    Json(req): Json<TripPlanRequest>,
) -> Result<Json<TripPlanResponse>, AppError> {
    let location = checked_query(Some(req.start_location.as_str()), "startLocation")?;
    let start = geocode_start(&state, location).await?;

    let request = suggestion_request(&req, start.location);
    let suggestions = suggest_trips(&state.catalog, &request, &state.costs);

    info!(
        start = %start.name,
        suggestions = suggestions.len(),
        "planned trip suggestions"
    );

    Ok(Json(TripPlanResponse {
        suggestions,
        start_point: start,
    }))
}

/// Trip ideas from the language model, or from ranked catalog regions when
/// the model has nothing to offer.
async fn trip_suggest(
    State(state): State<AppState>,
    Json(req): Json<TripPlanRequest>,
) -> Result<Json<TripSuggestResponse>, AppError> {
    let location = checked_query(Some(req.start_location.as_str()), "startLocation")?;
    let budget = clamp_budget(req.budget);
    let days = clamp_days(req.days, 30);
    let interests = parse_interests(&req.interests);

    let ideas = state
        .llm
        .suggest_trip_ideas(location, budget, days, &interests)
        .await;
    if !ideas.is_empty() {
        info!(start = location, ideas = ideas.len(), "AI trip ideas");
        return Ok(Json(TripSuggestResponse {
            suggestions: ideas,
            source: IdeaSource::Ai,
        }));
    }

    let start = geocode_start(&state, location).await?;
    let request = suggestion_request(&req, start.location);
    let ideas = catalog_ideas(&state.catalog, &request, &state.costs);
    info!(start = %start.name, ideas = ideas.len(), "catalog trip ideas");

    Ok(Json(TripSuggestResponse {
        suggestions: ideas,
        source: IdeaSource::Catalog,
    }))
}

/// Exploration progress for a set of completed quest ids.
async fn progress(
    State(state): State<AppState>,
    Json(req): Json<ProgressRequest>,
) -> Json<ProgressResponse> {
    let entry = |progress: crate::catalog::ExplorationProgress| ProgressEntry {
        label: progress_label(progress.percentage),
        progress,
    };

    let regions = state
        .catalog
        .regions()
        .iter()
        .map(|region| RegionProgressEntry {
            region_id: region.id.clone(),
            name: region.name.clone(),
            progress: entry(region_progress(&state.catalog, &region.id, &req.completed_ids)),
        })
        .collect();

    Json(ProgressResponse {
        overall: entry(overall_progress(&state.catalog, &req.completed_ids)),
        regions,
    })
}

/// Geocoding passthrough.
async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<Vec<Waypoint>>, AppError> {
    let q = checked_query(query.q.as_deref(), "query")?;
    let places = state.geocode.search(q).await?;
    Ok(Json(places))
}

/// Validate both ends of a quest search.
fn endpoints(req: &QuestSearchRequest) -> Result<(GeoPoint, GeoPoint), AppError> {
    let origin = parse_point(req.origin_lat, req.origin_lng, "origin").map_err(bad_request)?;
    let destination =
        parse_point(req.dest_lat, req.dest_lng, "destination").map_err(bad_request)?;
    Ok((origin, destination))
}

/// Best geocoding match for a start location.
async fn geocode_start(state: &AppState, location: &str) -> Result<Waypoint, AppError> {
    state
        .geocode
        .search(location)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest {
            message: "Could not find that location. Try a different search.".to_string(),
        })
}

fn suggestion_request(req: &TripPlanRequest, start: GeoPoint) -> SuggestionRequest {
    SuggestionRequest {
        start,
        budget: clamp_budget(req.budget),
        days: clamp_days(req.days, 30),
        interests: parse_interests(&req.interests),
        transport: req.transport(),
    }
}

/// Trimmed, non-empty, at most [`MAX_LOCATION_LEN`] characters.
fn checked_query<'a>(raw: Option<&'a str>, what: &str) -> Result<&'a str, AppError> {
    let q = raw.map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::BadRequest {
            message: format!("Missing {what}"),
        });
    }
    if q.chars().count() > MAX_LOCATION_LEN {
        return Err(AppError::BadRequest {
            message: format!("{what} too long (max {MAX_LOCATION_LEN} characters)"),
        });
    }
    Ok(q)
}

/// The supplied name, or a reverse-geocoded one when it is missing.
async fn named(state: &AppState, name: Option<&str>, point: GeoPoint) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(_) => place_name(name, ""),
        None => state.geocode.reverse(point).await,
    }
}

fn bad_request(message: String) -> AppError {
    AppError::BadRequest { message }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// A mandatory upstream service failed
    Upstream { message: String },
}

impl From<RoutingError> for AppError {
    fn from(e: RoutingError) -> Self {
        match e {
            RoutingError::NoRoute => AppError::NotFound {
                message: "No route found".to_string(),
            },
            RoutingError::WaypointCount { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: format!("Failed to calculate route: {e}"),
            },
        }
    }
}

impl From<ItineraryError> for AppError {
    fn from(e: ItineraryError) -> Self {
        match e {
            ItineraryError::OutboundRoute(inner) | ItineraryError::ReturnRoute(inner) => {
                inner.into()
            }
        }
    }
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        match e {
            GeocodeError::EmptyQuery => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: format!("Geocoding failed: {e}"),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_errors_map_to_statuses() {
        let status = |e: RoutingError| AppError::from(e).into_response().status();
        assert_eq!(status(RoutingError::NoRoute), StatusCode::NOT_FOUND);
        assert_eq!(status(RoutingError::RateLimited), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status(RoutingError::WaypointCount { got: 30, max: 27 }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn itinerary_errors_unwrap_routing() {
        let e = ItineraryError::ReturnRoute(RoutingError::NoRoute);
        assert_eq!(
            AppError::from(e).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn query_checks() {
        assert!(checked_query(None, "query").is_err());
        assert!(checked_query(Some("  "), "query").is_err());
        assert_eq!(checked_query(Some(" Köln "), "query").unwrap(), "Köln");
        let long = "a".repeat(MAX_LOCATION_LEN + 1);
        assert!(checked_query(Some(&long), "query").is_err());
    }
}
