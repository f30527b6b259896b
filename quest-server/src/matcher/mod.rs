//! Matching curated quests against a route.
//!
//! A quest is "along the route" when its straight-line distance to the
//! route, converted to minutes, fits the traveller's detour budget. The
//! conversion is a coarse heuristic, not a routed detour.
//!
//! The pipeline is:
//! 1. pad the route's bounding box by the detour radius and drop catalog
//!    entries outside it;
//! 2. apply the interest filter;
//! 3. measure each survivor against a coarse sample of the route;
//! 4. drop anything over budget and stable-sort by detour.

mod config;
mod dedup;

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::QuestCatalog;
use crate::domain::{GeoPoint, MatchedQuest, PointOfInterest, QuestCategory, matches_interests};
use crate::geometry::{BoundingBox, haversine_km, sample_route_points};

pub use config::MatcherConfig;
pub use dedup::{find_catalog_match, unify_with_catalog};

/// Match a set of POIs against a route polyline.
///
/// Returns POIs whose estimated detour is within `budget_minutes`, sorted
/// ascending by detour. Equal detours keep input order.
pub fn match_pois<'a, I>(
    pois: I,
    polyline: &[GeoPoint],
    budget_minutes: u32,
    interests: &[QuestCategory],
    config: &MatcherConfig,
) -> Vec<MatchedQuest>
where
    I: IntoIterator<Item = &'a PointOfInterest>,
{
    let Some(bbox) = BoundingBox::of(polyline) else {
        return Vec::new();
    };
    let max_detour_km = config.max_detour_km(budget_minutes);
    let bbox = bbox.padded(max_detour_km / config.km_per_degree);
    let sample: Vec<GeoPoint> =
        sample_route_points(polyline, config.sample_interval_km).collect();

    let mut matched: Vec<MatchedQuest> = pois
        .into_iter()
        .filter(|poi| bbox.contains(poi.location))
        .filter(|poi| matches_interests(poi.category, interests))
        .filter_map(|poi| {
            let min_km = sample
                .iter()
                .map(|p| haversine_km(poi.location, *p))
                .fold(f64::INFINITY, f64::min);
            let detour = config.detour_minutes(min_km);
            (detour <= budget_minutes).then(|| MatchedQuest::new(poi.clone(), detour))
        })
        .collect();

    // `sort_by_key` is stable, so catalog order breaks ties.
    matched.sort_by_key(|q| q.detour_minutes);

    debug!(
        sample_points = sample.len(),
        matched = matched.len(),
        budget_minutes,
        "matched POIs along route"
    );

    matched
}

/// Match the catalog against a route.
pub fn match_catalog_quests(
    catalog: &QuestCatalog,
    polyline: &[GeoPoint],
    budget_minutes: u32,
    interests: &[QuestCategory],
    config: &MatcherConfig,
) -> Vec<MatchedQuest> {
    match_pois(catalog.quests(), polyline, budget_minutes, interests, config)
}

/// Catalog quests within `radius_km` of a point, in catalog order.
///
/// Quests whose id is in `exclude` are skipped. Detour is zero: these are
/// visited from the point itself.
pub fn quests_near_point(
    catalog: &QuestCatalog,
    center: GeoPoint,
    radius_km: f64,
    interests: &[QuestCategory],
    exclude: &HashSet<String>,
) -> Vec<MatchedQuest> {
    catalog
        .quests()
        .filter(|q| haversine_km(q.location, center) <= radius_km)
        .filter(|q| matches_interests(q.category, interests))
        .filter(|q| !exclude.contains(&q.id))
        .map(|q| MatchedQuest::new(q.clone(), 0))
        .collect()
}
