//! Assembling complete trips from routes, quests and lodging.

use std::collections::HashSet;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::QuestCatalog;
use crate::cost::{CostModel, TransportOptions};
use crate::domain::{DayPlan, GeoPoint, Itinerary, MatchedQuest, QuestCategory, Waypoint};
use crate::lodging::LodgingProvider;
use crate::matcher::{MatcherConfig, match_catalog_quests, quests_near_point};
use crate::routing::{Route, RouteProvider, RoutingError};

use super::config::ItineraryConfig;
use super::partition::{DistancePolicy, Phase, PhaseDay, partition_phase};
use super::split::DaySplit;

/// Error from itinerary building.
#[derive(Debug, thiserror::Error)]
pub enum ItineraryError {
    /// No route from origin to destination
    #[error("no outbound route: {0}")]
    OutboundRoute(#[source] RoutingError),

    /// No route back from the destination on a round trip
    #[error("no return route: {0}")]
    ReturnRoute(#[source] RoutingError),
}

/// Request for a full trip itinerary.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,
    /// Requested length; clamped to `1..=max_days`.
    pub days: u32,
    /// Empty means every category.
    pub interests: Vec<QuestCategory>,
    pub transport: TransportOptions,
    pub round_trip: bool,
}

impl TripRequest {
    pub fn new(origin: Waypoint, destination: Waypoint, days: u32) -> Self {
        Self {
            origin,
            destination,
            days,
            interests: Vec::new(),
            transport: TransportOptions::default(),
            round_trip: true,
        }
    }

    pub fn with_interests(mut self, interests: Vec<QuestCategory>) -> Self {
        self.interests = interests;
        self
    }

    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }

    pub fn one_way(mut self) -> Self {
        self.round_trip = false;
        self
    }
}

/// Builds itineraries from a catalog and its collaborators.
pub struct TripPlanner<'a, R, L> {
    catalog: &'a QuestCatalog,
    routes: &'a R,
    lodging: &'a L,
    config: ItineraryConfig,
    matcher: MatcherConfig,
    costs: CostModel,
}

impl<'a, R: RouteProvider + Sync, L: LodgingProvider + Sync> TripPlanner<'a, R, L> {
    /// Create a planner with default tunables.
    pub fn new(catalog: &'a QuestCatalog, routes: &'a R, lodging: &'a L) -> Self {
        Self {
            catalog,
            routes,
            lodging,
            config: ItineraryConfig::default(),
            matcher: MatcherConfig::default(),
            costs: CostModel::default(),
        }
    }

    pub fn with_config(mut self, config: ItineraryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_matcher(mut self, matcher: MatcherConfig) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_costs(mut self, costs: CostModel) -> Self {
        self.costs = costs;
        self
    }

    /// Build a full itinerary.
    ///
    /// Days run outbound, then destination stay, then return. Per-day
    /// distance on travel days is the routing service's phase total split
    /// evenly. Route failures are fatal; lodging lookups that come back
    /// empty just leave the day without a hotel.
    pub async fn build(&self, request: &TripRequest) -> Result<Itinerary, ItineraryError> {
        let days = self.config.clamp_days(request.days);
        let origin = &request.origin;
        let destination = &request.destination;

        let outbound = self
            .routes
            .route(origin.location, destination.location)
            .await
            .map_err(ItineraryError::OutboundRoute)?;
        let outbound_quests = self.quests_along(&outbound, &request.interests);
        let used: HashSet<String> = outbound_quests.iter().map(|q| q.id().to_string()).collect();

        let return_route = if request.round_trip {
            Some(
                self.routes
                    .route(destination.location, origin.location)
                    .await
                    .map_err(ItineraryError::ReturnRoute)?,
            )
        } else {
            None
        };
        let return_quests: Vec<MatchedQuest> = return_route
            .as_ref()
            .map(|r| {
                self.quests_along(r, &request.interests)
                    .into_iter()
                    .filter(|q| !used.contains(q.id()))
                    .collect()
            })
            .unwrap_or_default();

        let split = DaySplit::for_trip(days, request.round_trip);
        debug!(
            days,
            outbound_days = split.outbound_days,
            destination_days = split.destination_days,
            return_days = split.return_days,
            "split trip days"
        );

        let mut plans = Vec::with_capacity(split.total() as usize);

        let outbound_days = partition_phase(
            &phase_of(&outbound, split.outbound_days),
            outbound_quests,
            DistancePolicy::EqualSplit,
        );
        let outbound_count = outbound_days.len();
        for (i, day) in outbound_days.into_iter().enumerate() {
            let label = if outbound_count == 1 {
                "Travel to destination".to_string()
            } else {
                format!("Outbound day {}", i + 1)
            };
            let mut plan = day_plan(day, label, false);
            if i + 1 == outbound_count {
                plan.overnight = Some(destination.clone());
            }
            plans.push(plan);
        }

        let stay_quests = quests_near_point(
            self.catalog,
            destination.location,
            self.config.destination_radius_km,
            &request.interests,
            &used,
        );
        let stay_label = format!("Exploring {}", display_name(&destination.name, "destination"));
        for quests in chunk_evenly(stay_quests, split.destination_days as usize) {
            plans.push(DayPlan {
                day_index: 0,
                label: stay_label.clone(),
                quests,
                overnight: Some(destination.clone()),
                hotel: None,
                distance_km: 0.0,
                duration_minutes: 0.0,
                is_return_leg: false,
            });
        }

        if let Some(route) = &return_route {
            let return_days = partition_phase(
                &phase_of(route, split.return_days),
                return_quests,
                DistancePolicy::EqualSplit,
            );
            let return_count = return_days.len();
            for (i, day) in return_days.into_iter().enumerate() {
                let label = if i + 1 == return_count {
                    "Return home".to_string()
                } else {
                    format!("Return day {}", i + 1)
                };
                plans.push(day_plan(day, label, true));
            }
        }

        for (i, plan) in plans.iter_mut().enumerate() {
            plan.day_index = i as u32 + 1;
        }

        self.assign_hotels(&mut plans, &destination.name).await;

        let return_km = return_route.as_ref().map_or(0.0, Route::distance_km);
        let return_minutes = return_route.as_ref().map_or(0.0, Route::duration_minutes);
        let total_distance_km = (outbound.distance_km() + return_km).round();
        let total_duration_minutes = (outbound.duration_minutes() + return_minutes).round();

        let nightly_prices: Vec<Option<f64>> = plans
            .iter()
            .map(|p| p.hotel.as_ref().map(|h| h.estimated_price as f64))
            .collect();
        let cost = self
            .costs
            .estimate_exact(total_distance_km, &request.transport, &nightly_prices);

        let itinerary = Itinerary {
            id: Uuid::new_v4().to_string(),
            title: format!(
                "{} → {}",
                display_name(&origin.name, "Start"),
                display_name(&destination.name, "Destination")
            ),
            origin: origin.clone(),
            destination: destination.clone(),
            days: plans.len() as u32,
            day_plans: plans,
            outbound_geometry: outbound.geometry,
            return_geometry: return_route.map(|r| r.geometry).unwrap_or_default(),
            total_distance_km,
            total_duration_minutes,
            transport_mode: request.transport.mode,
            is_round_trip: request.round_trip,
            cost,
            created_at: Utc::now(),
        };

        info!(
            id = %itinerary.id,
            days = itinerary.days,
            quests = itinerary.quest_count(),
            distance_km = total_distance_km,
            "built itinerary"
        );

        Ok(itinerary)
    }

    fn quests_along(&self, route: &Route, interests: &[QuestCategory]) -> Vec<MatchedQuest> {
        match_catalog_quests(
            self.catalog,
            &route.geometry,
            self.config.detour_budget_minutes,
            interests,
            &self.matcher,
        )
    }

    /// Look up a hotel for every night of the trip, concurrently.
    ///
    /// The last day has no night. Destination-side stops are priced in the
    /// destination's region, return-leg stops in the fallback region.
    async fn assign_hotels(&self, plans: &mut [DayPlan], destination_name: &str) {
        let Some(last) = plans.len().checked_sub(1) else {
            return;
        };
        let destination_region = display_name(destination_name, &self.config.fallback_region);

        let targets: Vec<Option<(GeoPoint, &str)>> = plans
            .iter()
            .enumerate()
            .map(|(i, plan)| {
                if i == last {
                    return None;
                }
                let region = if plan.is_return_leg {
                    self.config.fallback_region.as_str()
                } else {
                    destination_region
                };
                plan.overnight.as_ref().map(|w| (w.location, region))
            })
            .collect();

        let lookups = targets.into_iter().map(|target| async move {
            match target {
                Some((point, region)) => self.lodging.find_best_hotel_near(point, region).await,
                None => None,
            }
        });
        let hotels = join_all(lookups).await;

        for (plan, hotel) in plans.iter_mut().zip(hotels) {
            plan.hotel = hotel;
        }
    }
}

/// Split quests along a single route into days.
///
/// Used when the caller already has a route and its quests. Per-day
/// distance comes from the polyline inside each day's window, and duration
/// from the configured average speed.
pub fn build_route_itinerary(
    polyline: &[GeoPoint],
    quests: Vec<MatchedQuest>,
    days: u32,
    config: &ItineraryConfig,
) -> Vec<DayPlan> {
    let phase = Phase {
        polyline,
        distance_km: 0.0,
        duration_minutes: 0.0,
        days: config.clamp_days(days),
    };
    let policy = DistancePolicy::SegmentSum {
        average_speed_kmh: config.average_speed_kmh,
    };

    partition_phase(&phase, quests, policy)
        .into_iter()
        .enumerate()
        .map(|(i, day)| {
            let mut plan = day_plan(day, format!("Day {}", i + 1), false);
            plan.day_index = i as u32 + 1;
            plan
        })
        .collect()
}

fn phase_of(route: &Route, days: u32) -> Phase<'_> {
    Phase {
        polyline: &route.geometry,
        distance_km: route.distance_km(),
        duration_minutes: route.duration_minutes(),
        days,
    }
}

fn day_plan(day: PhaseDay, label: String, is_return_leg: bool) -> DayPlan {
    DayPlan {
        day_index: 0,
        label,
        quests: day.quests,
        overnight: day.overnight,
        hotel: None,
        distance_km: day.distance_km,
        duration_minutes: day.duration_minutes,
        is_return_leg,
    }
}

/// Split items into `n` consecutive groups of `ceil(len / n)`; trailing
/// groups may be short or empty.
fn chunk_evenly<T>(items: Vec<T>, n: usize) -> Vec<Vec<T>> {
    if n == 0 {
        return Vec::new();
    }
    let per_group = items.len().div_ceil(n).max(1);
    let mut groups: Vec<Vec<T>> = (0..n).map(|_| Vec::new()).collect();
    for (i, item) in items.into_iter().enumerate() {
        groups[(i / per_group).min(n - 1)].push(item);
    }
    groups
}

fn display_name<'s>(name: &'s str, fallback: &'s str) -> &'s str {
    let trimmed = name.trim();
    if trimmed.is_empty() { fallback } else { trimmed }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::domain::{FuelType, Hotel, HotelKind, PointOfInterest, TransportMode};
    use crate::geometry::polyline_length_km;

    fn pt(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    /// Straight line along latitude 50, one vertex per 0.01 degrees.
    fn line(from_lng: f64, to_lng: f64) -> Vec<GeoPoint> {
        let steps = ((to_lng - from_lng) / 0.01).abs().round() as usize;
        let dir = if to_lng >= from_lng { 1.0 } else { -1.0 };
        (0..=steps)
            .map(|i| pt(50.0, from_lng + dir * i as f64 * 0.01))
            .collect()
    }

    struct StaticRoutes;

    impl RouteProvider for StaticRoutes {
        async fn route(&self, origin: GeoPoint, destination: GeoPoint) -> Result<Route, RoutingError> {
            if origin == destination {
                return Err(RoutingError::NoRoute);
            }
            let geometry = line(origin.lng(), destination.lng());
            let km = polyline_length_km(&geometry);
            Ok(Route {
                geometry,
                distance_m: km * 1000.0,
                duration_s: km / 80.0 * 3600.0,
            })
        }
    }

    /// Lodging that prices every stop at 70, except inside `empty_near`.
    #[derive(Default)]
    struct FixedLodging {
        empty_near: Option<GeoPoint>,
        lookups: Mutex<Vec<(GeoPoint, String)>>,
    }

    impl LodgingProvider for FixedLodging {
        async fn find_best_hotel_near(&self, point: GeoPoint, region_name: &str) -> Option<Hotel> {
            self.lookups
                .lock()
                .unwrap()
                .push((point, region_name.to_string()));
            if self.empty_near == Some(point) {
                return None;
            }
            Some(Hotel {
                name: format!("Hotel at {point}"),
                location: point,
                kind: HotelKind::Hotel,
                stars: None,
                estimated_price: 70,
            })
        }
    }

    fn quest(id: &str, lat: f64, lng: f64) -> PointOfInterest {
        PointOfInterest::new(id, id, QuestCategory::Culture, pt(lat, lng), 40)
    }

    /// Quests sit on sample-aligned longitudes of the 8.0 → 10.0 route.
    fn catalog() -> QuestCatalog {
        CatalogBuilder::new()
            .region("west", "West", pt(50.0, 8.5))
            .quest(quest("near-start", 50.01, 8.14))
            .quest(quest("middle", 50.01, 8.98))
            .quest(quest("near-end", 50.01, 9.75))
            .quest(quest("at-destination", 50.05, 10.05))
            .quest(quest("far-away", 53.5, 10.0))
            .build()
            .unwrap()
    }

    /// A tight detour budget keeps the destination quest out of the
    /// outbound phase.
    fn planner<'a>(
        catalog: &'a QuestCatalog,
        lodging: &'a FixedLodging,
    ) -> TripPlanner<'a, StaticRoutes, FixedLodging> {
        TripPlanner::new(catalog, &StaticRoutes, lodging).with_config(ItineraryConfig {
            detour_budget_minutes: 5,
            ..ItineraryConfig::default()
        })
    }

    fn request(days: u32) -> TripRequest {
        TripRequest::new(
            Waypoint::new(pt(50.0, 8.0), "Mainz"),
            Waypoint::new(pt(50.0, 10.0), "Würzburg"),
            days,
        )
    }

    fn all_ids(itinerary: &Itinerary) -> Vec<&str> {
        itinerary
            .day_plans
            .iter()
            .flat_map(|d| d.quests.iter().map(|q| q.id()))
            .collect()
    }

    #[tokio::test]
    async fn round_trip_structure() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let itinerary = planner.build(&request(6)).await.unwrap();

        assert_eq!(itinerary.days, 6);
        let indices: Vec<u32> = itinerary.day_plans.iter().map(|d| d.day_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);

        let labels: Vec<&str> = itinerary.day_plans.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Outbound day 1",
                "Outbound day 2",
                "Exploring Würzburg",
                "Exploring Würzburg",
                "Return day 1",
                "Return home",
            ]
        );
        let return_flags: Vec<bool> = itinerary.day_plans.iter().map(|d| d.is_return_leg).collect();
        assert_eq!(return_flags, vec![false, false, false, false, true, true]);

        assert_eq!(itinerary.title, "Mainz → Würzburg");
        assert!(itinerary.is_round_trip);
        assert!(!itinerary.return_geometry.is_empty());
    }

    #[tokio::test]
    async fn quests_appear_once_across_phases() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let itinerary = planner.build(&request(6)).await.unwrap();
        let mut ids = all_ids(&itinerary);
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);

        // The return leg covers the same road, so it offers nothing new.
        let return_quests: usize = itinerary
            .day_plans
            .iter()
            .filter(|d| d.is_return_leg)
            .map(|d| d.quests.len())
            .sum();
        assert_eq!(return_quests, 0);
        assert!(!ids.contains(&"far-away"));
    }

    #[tokio::test]
    async fn outbound_quests_follow_route_order() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let itinerary = planner.build(&request(6)).await.unwrap();
        let day1: Vec<&str> = itinerary.day_plans[0].quests.iter().map(|q| q.id()).collect();
        let day2: Vec<&str> = itinerary.day_plans[1].quests.iter().map(|q| q.id()).collect();
        assert_eq!(day1, vec!["near-start", "middle"]);
        assert_eq!(day2, vec!["near-end"]);
    }

    #[tokio::test]
    async fn overnights_and_hotels() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let itinerary = planner.build(&request(6)).await.unwrap();
        let plans = &itinerary.day_plans;

        // Day 1 ends at its last quest, day 2 at the destination.
        assert_eq!(plans[0].overnight.as_ref().unwrap().name, "middle");
        assert_eq!(plans[1].overnight.as_ref().unwrap().name, "Würzburg");
        assert!(plans[5].overnight.is_none());

        for plan in &plans[..5] {
            assert!(plan.hotel.is_some(), "day {} has no hotel", plan.day_index);
        }
        assert!(plans[5].hotel.is_none());

        // Five nights at 70.
        assert_eq!(itinerary.cost.accommodation_cost, 350.0);

        let lookups = lodging.lookups.lock().unwrap();
        assert_eq!(lookups.len(), 5);
        let regions: HashMap<&str, usize> = lookups.iter().fold(HashMap::new(), |mut m, (_, r)| {
            *m.entry(r.as_str()).or_default() += 1;
            m
        });
        assert_eq!(regions.get("Würzburg"), Some(&4));
        assert_eq!(regions.get("Germany"), Some(&1));
    }

    #[tokio::test]
    async fn missing_hotel_costs_nothing() {
        let catalog = catalog();
        let lodging = FixedLodging {
            empty_near: Some(pt(50.0, 10.0)),
            ..Default::default()
        };
        let planner = planner(&catalog, &lodging);

        let itinerary = planner.build(&request(6)).await.unwrap();
        // Days 2-4 overnight at the destination and find nothing.
        let with_hotel = itinerary.day_plans.iter().filter(|d| d.hotel.is_some()).count();
        assert_eq!(with_hotel, 2);
        assert_eq!(itinerary.cost.accommodation_cost, 140.0);
    }

    #[tokio::test]
    async fn destination_days_use_nearby_quests() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let itinerary = planner.build(&request(6)).await.unwrap();
        let stay: Vec<&str> = itinerary.day_plans[2..4]
            .iter()
            .flat_map(|d| d.quests.iter().map(|q| q.id()))
            .collect();
        assert_eq!(stay, vec!["at-destination"]);
        assert!(itinerary.day_plans[2..4].iter().all(|d| d.distance_km == 0.0));
    }

    #[tokio::test]
    async fn one_way_trip() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let itinerary = planner.build(&request(5).one_way()).await.unwrap();
        assert_eq!(itinerary.days, 5);
        assert!(itinerary.day_plans.iter().all(|d| !d.is_return_leg));
        assert!(itinerary.return_geometry.is_empty());
        assert!(!itinerary.is_round_trip);

        let travel_days = itinerary.day_plans.iter().filter(|d| d.distance_km > 0.0).count();
        assert_eq!(travel_days, 2);
    }

    #[tokio::test]
    async fn travel_distance_matches_total() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let itinerary = planner.build(&request(7)).await.unwrap();
        let sum: f64 = itinerary.day_plans.iter().map(|d| d.distance_km).sum();
        assert!((sum - itinerary.total_distance_km).abs() <= 1.0);
    }

    #[tokio::test]
    async fn cost_follows_transport() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let car = planner
            .build(&request(3).with_transport(TransportOptions::car(FuelType::Petrol)))
            .await
            .unwrap();
        assert!(car.cost.transport_cost > 0.0);
        assert_eq!(car.transport_mode, TransportMode::Car);

        let pass = planner
            .build(&request(3).with_transport(TransportOptions::train(true)))
            .await
            .unwrap();
        assert_eq!(pass.cost.transport_cost, 0.0);
        assert_eq!(pass.transport_mode, TransportMode::Train);
    }

    #[tokio::test]
    async fn days_are_clamped() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let itinerary = planner.build(&request(40)).await.unwrap();
        assert_eq!(itinerary.days, 14);
    }

    #[tokio::test]
    async fn route_failure_is_fatal() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let mut req = request(3);
        req.destination.location = req.origin.location;
        let err = planner.build(&req).await.unwrap_err();
        assert!(matches!(err, ItineraryError::OutboundRoute(RoutingError::NoRoute)));
    }

    #[tokio::test]
    async fn interests_filter_quests() {
        let catalog = catalog();
        let lodging = FixedLodging::default();
        let planner = planner(&catalog, &lodging);

        let itinerary = planner
            .build(&request(3).with_interests(vec![QuestCategory::Nature]))
            .await
            .unwrap();
        assert_eq!(itinerary.quest_count(), 0);
    }

    #[test]
    fn route_itinerary_segments_cover_route() {
        let polyline = line(8.0, 10.0);
        let quests = vec![
            MatchedQuest::new(quest("b", 50.0, 9.5), 2),
            MatchedQuest::new(quest("a", 50.0, 8.2), 1),
        ];
        let plans = build_route_itinerary(&polyline, quests, 3, &ItineraryConfig::default());

        assert_eq!(plans.len(), 3);
        assert_eq!(
            plans.iter().map(|p| p.day_index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        let sum: f64 = plans.iter().map(|p| p.distance_km).sum();
        assert!((sum - polyline_length_km(&polyline)).abs() < 1e-6);
        assert_eq!(plans[0].quests[0].id(), "a");
        assert_eq!(plans[2].quests[0].id(), "b");
        for plan in &plans {
            assert!((plan.duration_minutes - plan.distance_km / 80.0 * 60.0).abs() < 1e-9);
        }
    }

    #[test]
    fn single_day_route_itinerary() {
        let polyline = line(8.0, 8.5);
        let plans = build_route_itinerary(&polyline, vec![], 1, &ItineraryConfig::default());
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].label, "Day 1");
        assert!(plans[0].overnight.is_none());
    }

    #[test]
    fn chunking() {
        assert_eq!(chunk_evenly(vec![1, 2, 3, 4, 5], 2), vec![vec![1, 2, 3], vec![4, 5]]);
        assert_eq!(chunk_evenly(vec![1], 3), vec![vec![1], vec![], vec![]]);
        assert_eq!(chunk_evenly(Vec::<u8>::new(), 2), vec![Vec::<u8>::new(), vec![]]);
        assert!(chunk_evenly(vec![1, 2], 0).is_empty());
    }
}
