//! Prompt text.

use std::fmt::Write;

use crate::domain::QuestCategory;
use crate::overpass::{RawHotel, RawPoi};

/// Prompt asking for side quests built from numbered POIs.
pub fn quest_prompt(
    pois: &[RawPoi],
    interests: &[QuestCategory],
    origin_name: &str,
    destination_name: &str,
) -> String {
    let mut poi_list = String::new();
    for (i, poi) in pois.iter().enumerate() {
        let _ = write!(
            poi_list,
            "{}. \"{}\" (type: {}, lat: {}, lng: {}",
            i + 1,
            poi.name,
            poi.kind,
            poi.location.lat(),
            poi.location.lng()
        );
        if let Some(cuisine) = poi.tags.get("cuisine") {
            let _ = write!(poi_list, ", cuisine: {cuisine}");
        }
        if let Some(info) = poi.tags.get("description") {
            let _ = write!(poi_list, ", info: {info}");
        }
        poi_list.push_str(")\n");
    }

    let focus = if interests.is_empty() {
        "all categories".to_string()
    } else {
        interests
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let categories = QuestCategory::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a creative travel guide. A traveler is driving from {origin_name} to \
         {destination_name}.\n\n\
         Here are interesting places along their route:\n{poi_list}\n\
         Generate engaging \"side quests\" for the best ones. Focus on: {focus}.\n\n\
         For each quest, return a JSON array with objects containing:\n\
         - \"poiIndex\": the number from the list above (1-based)\n\
         - \"title\": a catchy, short quest title\n\
         - \"description\": 2-3 sentences with what makes it special, a local tip or a fun fact\n\
         - \"category\": one of: {categories}\n\
         - \"detourMinutes\": estimated extra time needed (5-60 minutes)\n\
         - \"xp\": points from 10-100 based on how unique the stop is\n\n\
         Return ONLY a valid JSON array, no markdown. Generate 5-15 quests."
    )
}

/// Prompt asking for one nightly price per hotel.
pub fn price_prompt(hotels: &[RawHotel], region_name: &str) -> String {
    let mut list = String::new();
    for (i, h) in hotels.iter().enumerate() {
        let _ = write!(list, "{}. \"{}\" ({}", i + 1, h.name, h.kind);
        if let Some(stars) = h.stars {
            let _ = write!(list, ", {stars} stars");
        }
        let _ = writeln!(list, ") in {region_name}");
    }

    format!(
        "Estimate the price per night in EUR for each of these accommodations. \
         Consider the type, star rating and region.\n\n{list}\n\
         Return ONLY a JSON array of numbers, one per accommodation, in the same order. \
         Example: [75, 45, 90]"
    )
}

/// Prompt asking for three trip ideas from a start location.
pub fn trip_ideas_prompt(
    start_location: &str,
    budget: f64,
    days: u32,
    interests: &[QuestCategory],
) -> String {
    let interests = if interests.is_empty() {
        "varied activities".to_string()
    } else {
        interests
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "You are a creative travel planner. A traveler wants a trip with these details:\n\
         - Starting from: {start_location}\n\
         - Budget: {budget}€ total\n\
         - Duration: {days} days\n\
         - Interests: {interests}\n\n\
         Suggest 3 different trip ideas. For each, return a JSON array with:\n\
         - \"title\": catchy trip name\n\
         - \"description\": 2-3 sentences about why this trip is great\n\
         - \"destination\": main destination city/region\n\
         - \"estimatedCost\": estimated total cost in euros (fuel, accommodation, food)\n\
         - \"highlights\": array of 3-5 highlight stops/activities\n\
         - \"dailyPlan\": array of {days} strings, one per day, summarizing the day\n\n\
         Return ONLY a valid JSON array, no markdown."
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{GeoPoint, HotelKind};

    #[test]
    fn quest_prompt_numbers_pois() {
        let mut tags = BTreeMap::new();
        tags.insert("cuisine".to_string(), "bavarian".to_string());
        let pois = vec![RawPoi {
            id: 1,
            location: GeoPoint::new(48.5, 11.5).unwrap(),
            name: "Klosterbräu".to_string(),
            kind: "restaurant".to_string(),
            tags,
        }];
        let prompt = quest_prompt(&pois, &[QuestCategory::Food], "Munich", "Nuremberg");
        assert!(prompt.contains("driving from Munich to Nuremberg"));
        assert!(
            prompt.contains("1. \"Klosterbräu\" (type: restaurant, lat: 48.5, lng: 11.5, cuisine: bavarian)")
        );
        assert!(prompt.contains("Focus on: food."));
        assert!(prompt.contains("hidden_gem, scenic, food"));
    }

    #[test]
    fn trip_ideas_prompt_states_constraints() {
        let prompt = trip_ideas_prompt("Köln", 750.0, 4, &[QuestCategory::Nature, QuestCategory::Weird]);
        assert!(prompt.contains("- Starting from: Köln\n"));
        assert!(prompt.contains("- Budget: 750€ total\n"));
        assert!(prompt.contains("- Duration: 4 days\n"));
        assert!(prompt.contains("- Interests: nature, weird\n"));
        assert!(prompt.contains("array of 4 strings, one per day"));

        let open = trip_ideas_prompt("Köln", 500.0, 3, &[]);
        assert!(open.contains("- Interests: varied activities\n"));
    }

    #[test]
    fn price_prompt_lists_hotels() {
        let hotels = vec![RawHotel {
            name: "Hotel Post".to_string(),
            location: GeoPoint::new(48.0, 11.0).unwrap(),
            kind: HotelKind::GuestHouse,
            stars: Some(3),
        }];
        let prompt = price_prompt(&hotels, "Bavaria");
        assert!(prompt.contains("1. \"Hotel Post\" (guest_house, 3 stars) in Bavaria"));
    }
}
