//! Ranking catalog regions as trip destinations.

use serde::Serialize;

use crate::catalog::QuestCatalog;
use crate::cost::{CostModel, TransportOptions};
use crate::domain::{CostBreakdown, GeoPoint, PointOfInterest, QuestCategory, matches_interests};
use crate::geometry::haversine_km;

/// Most suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Most highlight titles per suggestion.
const MAX_HIGHLIGHTS: usize = 4;

/// What the traveller can spend and how.
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    pub start: GeoPoint,
    /// Total budget in EUR.
    pub budget: f64,
    pub days: u32,
    pub interests: Vec<QuestCategory>,
    pub transport: TransportOptions,
}

/// A destination region worth visiting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSuggestion {
    pub region_id: String,
    pub title: String,
    pub destination: String,
    pub description: String,
    pub quest_count: usize,
    pub total_reward: u32,
    /// Straight-line round-trip distance.
    pub distance_km: f64,
    pub cost: CostBreakdown,
    pub estimated_cost: f64,
    pub highlights: Vec<String>,
    pub center: GeoPoint,
}

/// Rank regions for a start point and budget.
///
/// Regions with no matching quests, or whose estimated cost exceeds the
/// budget, are left out. Nights are costed at the default rate since no
/// hotel has been chosen yet. Score is `quests * 10 + reward / 10 -
/// one_way_km / 50`, highest first; ties keep catalog order.
pub fn suggest_trips(
    catalog: &QuestCatalog,
    request: &SuggestionRequest,
    costs: &CostModel,
) -> Vec<TripSuggestion> {
    let nights = vec![None; request.days.saturating_sub(1) as usize];

    let mut scored: Vec<(f64, TripSuggestion)> = catalog
        .regions()
        .iter()
        .filter_map(|region| {
            let mut quests: Vec<&PointOfInterest> = region
                .quests
                .iter()
                .filter(|q| matches_interests(q.category, &request.interests))
                .collect();
            if quests.is_empty() {
                return None;
            }

            let one_way_km = haversine_km(request.start, region.center);
            let distance_km = one_way_km * 2.0;
            let cost = costs.estimate_with_fallback(distance_km, &request.transport, &nights);
            if cost.total() > request.budget {
                return None;
            }

            let total_reward: u32 = quests.iter().map(|q| q.reward_points).sum();
            quests.sort_by(|a, b| b.reward_points.cmp(&a.reward_points));
            let highlights: Vec<String> = quests
                .iter()
                .take(MAX_HIGHLIGHTS)
                .map(|q| q.title.clone())
                .collect();

            let score =
                quests.len() as f64 * 10.0 + total_reward as f64 / 10.0 - one_way_km / 50.0;

            Some((
                score,
                TripSuggestion {
                    region_id: region.id.clone(),
                    title: format!("Explore {}", region.name),
                    destination: region.name.clone(),
                    description: describe(&region.name, &highlights, quests.len()),
                    quest_count: quests.len(),
                    total_reward,
                    distance_km: distance_km.round(),
                    cost,
                    estimated_cost: cost.total(),
                    highlights,
                    center: region.center,
                },
            ))
        })
        .collect();

    scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, s)| s)
        .collect()
}

/// A free-form trip idea with a day-by-day outline.
///
/// Produced by the language model, or derived from a ranked region when
/// the model is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripIdea {
    pub title: String,
    pub description: String,
    pub destination: String,
    /// Total in EUR.
    pub estimated_cost: f64,
    pub highlights: Vec<String>,
    /// One line per day.
    pub daily_plan: Vec<String>,
}

impl TripIdea {
    /// An idea for a ranked region, with its highlights dealt out over
    /// `days` in turn.
    pub fn from_suggestion(suggestion: &TripSuggestion, days: u32) -> Self {
        let days = days.max(1) as usize;
        let daily_plan = (0..days)
            .map(|day| {
                let stops: Vec<&str> = suggestion
                    .highlights
                    .iter()
                    .skip(day)
                    .step_by(days)
                    .map(String::as_str)
                    .collect();
                if stops.is_empty() {
                    format!("Day {}: Free time in {}", day + 1, suggestion.destination)
                } else {
                    format!("Day {}: {}", day + 1, stops.join(", "))
                }
            })
            .collect();

        Self {
            title: suggestion.title.clone(),
            description: suggestion.description.clone(),
            destination: suggestion.destination.clone(),
            estimated_cost: suggestion.estimated_cost,
            highlights: suggestion.highlights.clone(),
            daily_plan,
        }
    }
}

/// [`suggest_trips`] expressed as trip ideas.
pub fn catalog_ideas(
    catalog: &QuestCatalog,
    request: &SuggestionRequest,
    costs: &CostModel,
) -> Vec<TripIdea> {
    suggest_trips(catalog, request, costs)
        .iter()
        .map(|s| TripIdea::from_suggestion(s, request.days))
        .collect()
}

fn describe(region: &str, highlights: &[String], quest_count: usize) -> String {
    let noun = if quest_count == 1 { "quest" } else { "quests" };
    let top = highlights
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" and ");
    format!("Discover {quest_count} {noun} in {region}. Highlights include {top}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::domain::FuelType;

    fn pt(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    fn poi(id: &str, category: QuestCategory, at: GeoPoint, reward: u32) -> PointOfInterest {
        PointOfInterest::new(id, id.to_uppercase(), category, at, reward)
    }

    /// Start in Frankfurt. "near" is ~30 km away, "rich" ~150 km away with
    /// more quests, "remote" ~580 km away.
    fn catalog() -> QuestCatalog {
        let near = pt(50.11, 9.1);
        let rich = pt(48.78, 9.18);
        let remote = pt(53.55, 15.0);
        CatalogBuilder::new()
            .region("near", "Near", near)
            .quest(poi("n1", QuestCategory::Food, near, 30))
            .region("rich", "Rich", rich)
            .quest(poi("r1", QuestCategory::History, rich, 40))
            .quest(poi("r2", QuestCategory::Nature, rich, 90))
            .quest(poi("r3", QuestCategory::History, rich, 60))
            .quest(poi("r4", QuestCategory::Scenic, rich, 20))
            .quest(poi("r5", QuestCategory::Weird, rich, 10))
            .region("remote", "Remote", remote)
            .quest(poi("x1", QuestCategory::History, remote, 100))
            .region("empty", "Empty", pt(50.2, 8.7))
            .build()
            .unwrap()
    }

    fn request(budget: f64, days: u32, interests: Vec<QuestCategory>) -> SuggestionRequest {
        SuggestionRequest {
            start: pt(50.11, 8.68),
            budget,
            days,
            interests,
            transport: TransportOptions::car(FuelType::Petrol),
        }
    }

    #[test]
    fn ranks_by_score() {
        let out = suggest_trips(&catalog(), &request(10_000.0, 3, vec![]), &CostModel::default());
        let ids: Vec<&str> = out.iter().map(|s| s.region_id.as_str()).collect();
        // rich: 50 + 22 - 3.0; near: 10 + 3 - 0.6; remote: 10 + 10 - 11.6
        assert_eq!(ids, vec!["rich", "near", "remote"]);
    }

    #[test]
    fn highlights_by_reward() {
        let out = suggest_trips(&catalog(), &request(10_000.0, 3, vec![]), &CostModel::default());
        let rich = &out[0];
        assert_eq!(rich.highlights, vec!["R2", "R3", "R1", "R4"]);
        assert_eq!(rich.quest_count, 5);
        assert_eq!(rich.total_reward, 220);
        assert_eq!(
            rich.description,
            "Discover 5 quests in Rich. Highlights include R2 and R3."
        );
    }

    #[test]
    fn budget_excludes_expensive_regions() {
        // Two nights at 60 plus fuel: only "near" stays under 130.
        let out = suggest_trips(&catalog(), &request(130.0, 3, vec![]), &CostModel::default());
        let ids: Vec<&str> = out.iter().map(|s| s.region_id.as_str()).collect();
        assert_eq!(ids, vec!["near"]);
        assert_eq!(out[0].cost.accommodation_cost, 120.0);
        assert!(out[0].estimated_cost <= 130.0);
    }

    #[test]
    fn interests_filter_regions() {
        let out = suggest_trips(
            &catalog(),
            &request(10_000.0, 1, vec![QuestCategory::Food]),
            &CostModel::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].region_id, "near");
        assert_eq!(out[0].cost.accommodation_cost, 0.0);
        assert_eq!(
            out[0].description,
            "Discover 1 quest in Near. Highlights include N1."
        );
    }

    #[test]
    fn regions_without_quests_never_appear() {
        let out = suggest_trips(&catalog(), &request(10_000.0, 3, vec![]), &CostModel::default());
        assert!(out.iter().all(|s| s.region_id != "empty"));
    }

    #[test]
    fn catalog_ideas_deal_highlights_over_days() {
        let ideas = catalog_ideas(&catalog(), &request(10_000.0, 3, vec![]), &CostModel::default());
        assert_eq!(ideas.len(), 3);

        let rich = &ideas[0];
        assert_eq!(rich.title, "Explore Rich");
        assert_eq!(rich.destination, "Rich");
        assert_eq!(
            rich.daily_plan,
            vec!["Day 1: R2, R4", "Day 2: R3", "Day 3: R1"]
        );

        let near = &ideas[1];
        assert_eq!(
            near.daily_plan,
            vec!["Day 1: N1", "Day 2: Free time in Near", "Day 3: Free time in Near"]
        );
    }

    #[test]
    fn single_day_idea_lists_every_highlight() {
        let out = suggest_trips(&catalog(), &request(10_000.0, 1, vec![]), &CostModel::default());
        let idea = TripIdea::from_suggestion(&out[0], 0);
        assert_eq!(idea.daily_plan, vec!["Day 1: R2, R3, R1, R4"]);
        assert_eq!(idea.estimated_cost, out[0].estimated_cost);
    }
}
