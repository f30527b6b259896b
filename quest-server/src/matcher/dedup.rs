//! Identity unification of AI-discovered POIs with the catalog.

use tracing::trace;

use crate::catalog::QuestCatalog;
use crate::domain::{MatchedQuest, PointOfInterest};
use crate::geometry::haversine_km;

/// First catalog entry (in catalog order) within `threshold_km` of `poi`.
pub fn find_catalog_match<'c>(
    catalog: &'c QuestCatalog,
    poi: &PointOfInterest,
    threshold_km: f64,
) -> Option<&'c PointOfInterest> {
    catalog
        .quests()
        .find(|cq| haversine_km(cq.location, poi.location) <= threshold_km)
}

/// Give each AI quest the id of a nearby catalog quest, if any.
///
/// Completion and photo state are keyed by id, so a POI the model found
/// independently must resolve to the same id as its curated twin.
pub fn unify_with_catalog(
    catalog: &QuestCatalog,
    quests: Vec<MatchedQuest>,
    threshold_km: f64,
) -> Vec<MatchedQuest> {
    quests
        .into_iter()
        .map(|mut quest| {
            if let Some(curated) = find_catalog_match(catalog, &quest.poi, threshold_km) {
                trace!(from = %quest.poi.id, to = %curated.id, "unified AI quest with catalog");
                quest.poi.id = curated.id.clone();
            }
            quest
        })
        .collect()
}
