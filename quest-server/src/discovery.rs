//! AI quest discovery along a route.
//!
//! Route → coarse sample → Overpass POIs around each sample point →
//! language-model quests → detour budget → catalog id unification.

use tracing::{debug, info};

use crate::catalog::QuestCatalog;
use crate::domain::{MatchedQuest, QuestCategory, Waypoint};
use crate::geometry::sample_route_points;
use crate::llm::LlmClient;
use crate::matcher::unify_with_catalog;
use crate::overpass::OverpassClient;
use crate::routing::{Route, RouteProvider, RoutingError};

/// Tunables for discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Spacing of Overpass queries along the route (km).
    pub sample_interval_km: f64,
    /// Search radius around each sample point (metres).
    pub search_radius_m: u32,
    /// AI quests this close to a catalog quest take its id (km).
    pub dedup_threshold_km: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            sample_interval_km: 30.0,
            search_radius_m: 10_000,
            dedup_threshold_km: 0.5,
        }
    }
}

/// Quests discovered for a trip, with the route they were found along.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub quests: Vec<MatchedQuest>,
    pub route: Route,
}

/// Runs the discovery pipeline against live collaborators.
pub struct QuestDiscovery<'a, R> {
    catalog: &'a QuestCatalog,
    routes: &'a R,
    overpass: &'a OverpassClient,
    llm: &'a LlmClient,
    config: DiscoveryConfig,
}

impl<'a, R: RouteProvider + Sync> QuestDiscovery<'a, R> {
    pub fn new(
        catalog: &'a QuestCatalog,
        routes: &'a R,
        overpass: &'a OverpassClient,
        llm: &'a LlmClient,
    ) -> Self {
        Self {
            catalog,
            routes,
            overpass,
            llm,
            config: DiscoveryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Discover quests between two waypoints.
    ///
    /// Only the route is mandatory. With AI disabled the result has the
    /// route and no quests, and Overpass is not queried.
    pub async fn discover(
        &self,
        origin: &Waypoint,
        destination: &Waypoint,
        interests: &[QuestCategory],
        max_detour_minutes: u32,
    ) -> Result<Discovery, RoutingError> {
        let route = self
            .routes
            .route(origin.location, destination.location)
            .await?;

        if !self.llm.is_enabled() {
            debug!("AI discovery disabled, returning route only");
            return Ok(Discovery {
                quests: Vec::new(),
                route,
            });
        }

        let samples: Vec<_> =
            sample_route_points(&route.geometry, self.config.sample_interval_km).collect();
        let pois = self
            .overpass
            .find_pois_along_route(&samples, self.config.search_radius_m)
            .await;

        let generated = self
            .llm
            .generate_quests(&pois, interests, &origin.name, &destination.name)
            .await;
        let quests = finish_discovered(
            self.catalog,
            generated,
            max_detour_minutes,
            self.config.dedup_threshold_km,
        );

        info!(
            samples = samples.len(),
            pois = pois.len(),
            quests = quests.len(),
            "discovered AI quests"
        );

        Ok(Discovery { quests, route })
    }
}

/// Drop quests over the detour budget and adopt catalog ids for quests
/// that coincide with curated ones.
pub fn finish_discovered(
    catalog: &QuestCatalog,
    quests: Vec<MatchedQuest>,
    max_detour_minutes: u32,
    dedup_threshold_km: f64,
) -> Vec<MatchedQuest> {
    let within_budget = quests
        .into_iter()
        .filter(|q| q.detour_minutes <= max_detour_minutes)
        .collect();
    unify_with_catalog(catalog, within_budget, dedup_threshold_km)
}
