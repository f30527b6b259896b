//! Sanitising model output.
//!
//! Model replies are untrusted text. They may be wrapped in markdown
//! fences, reference POIs that do not exist, or carry numbers outside the
//! ranges we can use. Everything here degrades per item rather than
//! rejecting a whole reply.

use std::ops::RangeInclusive;

use serde_json::Value;

use crate::domain::{Hotel, MatchedQuest, PointOfInterest, QuestCategory};
use crate::overpass::{RawHotel, RawPoi};
use crate::suggest::TripIdea;

use super::error::LlmError;

/// Accepted detour estimates, in minutes.
pub const DETOUR_RANGE: RangeInclusive<u32> = 5..=60;
/// Detour used when the model gives none.
pub const DEFAULT_DETOUR_MINUTES: u32 = 15;
/// Accepted reward points.
pub const XP_RANGE: RangeInclusive<u32> = 10..=100;
/// Reward used when the model gives none.
pub const DEFAULT_XP: u32 = 50;

/// Remove a surrounding ```` ```json ```` / ```` ``` ```` fence.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        // Drop the info string ("json", "JSON", or nothing).
        s = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Parse a reply that should be a JSON array.
fn parse_array(text: &str) -> Result<Vec<Value>, LlmError> {
    let json = strip_code_fences(text);
    let value: Value = serde_json::from_str(json).map_err(|e| LlmError::Json {
        message: e.to_string(),
        body: Some(json.chars().take(200).collect()),
    })?;
    match value {
        Value::Array(items) => Ok(items),
        other => Err(LlmError::Json {
            message: format!("expected a JSON array, got {}", json_kind(&other)),
            body: None,
        }),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A non-negative number, rounded, from a number or numeric string.
fn as_rounded(v: Option<&Value>) -> Option<u32> {
    let n = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n.is_finite() && n > 0.0).then(|| n.round().min(u32::MAX as f64) as u32)
}

fn as_text(v: Option<&Value>) -> Option<&str> {
    v?.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn clamp_or(v: Option<u32>, range: RangeInclusive<u32>, default: u32) -> u32 {
    v.map_or(default, |n| n.clamp(*range.start(), *range.end()))
}

/// Turn a quest-generation reply into quests placed at their POIs.
///
/// Items are dropped when `poiIndex` (1-based) is out of range or the
/// category is unknown. Quest ids are derived from the OSM id so the same
/// POI always yields the same id.
pub fn parse_quests(text: &str, pois: &[RawPoi]) -> Result<Vec<MatchedQuest>, LlmError> {
    let items = parse_array(text)?;

    let quests = items
        .iter()
        .filter_map(|item| {
            let index = as_rounded(item.get("poiIndex"))? as usize;
            let poi = pois.get(index.checked_sub(1)?)?;
            let category: QuestCategory = as_text(item.get("category"))?.parse().ok()?;

            let title = as_text(item.get("title")).unwrap_or(&poi.name);
            let description = as_text(item.get("description")).unwrap_or_default();
            let detour = clamp_or(
                as_rounded(item.get("detourMinutes")),
                DETOUR_RANGE,
                DEFAULT_DETOUR_MINUTES,
            );
            let xp = clamp_or(as_rounded(item.get("xp")), XP_RANGE, DEFAULT_XP);

            let mut quest = PointOfInterest::new(
                format!("quest-{}", poi.id),
                title,
                category,
                poi.location,
                xp,
            )
            .with_description(description);
            quest.address = poi.address();

            Some(MatchedQuest::new(quest, detour))
        })
        .collect();

    Ok(quests)
}

/// Turn a trip-idea reply into ideas.
///
/// Every array element becomes an idea; missing fields get placeholders
/// and a missing or non-positive cost becomes `budget`.
pub fn parse_trip_ideas(text: &str, budget: f64) -> Result<Vec<TripIdea>, LlmError> {
    let items = parse_array(text)?;
    Ok(items
        .iter()
        .map(|item| TripIdea {
            title: as_text(item.get("title")).unwrap_or("Unnamed Trip").to_string(),
            description: as_text(item.get("description"))
                .unwrap_or_default()
                .to_string(),
            destination: as_text(item.get("destination"))
                .unwrap_or("Unknown")
                .to_string(),
            estimated_cost: as_rounded(item.get("estimatedCost")).map_or(budget, f64::from),
            highlights: as_lines(item.get("highlights")),
            daily_plan: as_lines(item.get("dailyPlan")),
        })
        .collect())
}

/// Non-empty entries of a JSON array, with scalars written out as text.
fn as_lines(v: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = v else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(_) | Value::Bool(_) => Some(item.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Attach prices from a price-estimation reply to `hotels`, in order.
///
/// A missing, non-numeric or non-positive entry falls back to the price
/// for the hotel's kind.
pub fn parse_prices(text: &str, hotels: &[RawHotel]) -> Result<Vec<Hotel>, LlmError> {
    let items = parse_array(text)?;
    Ok(hotels
        .iter()
        .enumerate()
        .map(|(i, h)| priced(h, as_rounded(items.get(i))))
        .collect())
}

/// Price every hotel at its kind's fallback rate.
pub fn fallback_prices(hotels: &[RawHotel]) -> Vec<Hotel> {
    hotels.iter().map(|h| priced(h, None)).collect()
}

fn priced(hotel: &RawHotel, price: Option<u32>) -> Hotel {
    Hotel {
        name: hotel.name.clone(),
        location: hotel.location,
        kind: hotel.kind,
        stars: hotel.stars,
        estimated_price: price.unwrap_or_else(|| hotel.kind.fallback_price()),
    }
}
