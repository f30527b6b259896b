//! Itinerary and trip value types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{GeoPoint, MatchedQuest};

/// A named location on a trip: origin, destination or overnight stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub location: GeoPoint,
    pub name: String,
}

impl Waypoint {
    pub fn new(location: GeoPoint, name: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
        }
    }
}

/// Kind of accommodation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotelKind {
    Hotel,
    Hostel,
    GuestHouse,
}

impl HotelKind {
    /// Parse an OSM `tourism=*` value. Unknown values are treated as hotels.
    pub fn from_tourism_tag(tag: &str) -> Self {
        match tag {
            "hostel" => HotelKind::Hostel,
            "guest_house" => HotelKind::GuestHouse,
            _ => HotelKind::Hotel,
        }
    }

    /// Nightly price used when no estimate is available.
    pub fn fallback_price(&self) -> u32 {
        match self {
            HotelKind::Hotel => 80,
            HotelKind::GuestHouse => 55,
            HotelKind::Hostel => 30,
        }
    }
}

impl fmt::Display for HotelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HotelKind::Hotel => "hotel",
            HotelKind::Hostel => "hostel",
            HotelKind::GuestHouse => "guest_house",
        })
    }
}

/// A lodging suggestion with an estimated nightly price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub name: String,
    pub location: GeoPoint,
    pub kind: HotelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u8>,
    pub estimated_price: u32,
}

/// How the traveller gets around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Car,
    Train,
}

impl TransportMode {
    /// Anything other than `"train"` means car.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        match s {
            Some("train") => TransportMode::Train,
            _ => TransportMode::Car,
        }
    }
}

/// Fuel used by a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    #[default]
    Petrol,
    Diesel,
    Electric,
}

impl FuelType {
    /// Unknown or missing values mean petrol.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        match s {
            Some("diesel") => FuelType::Diesel,
            Some("electric") => FuelType::Electric,
            _ => FuelType::Petrol,
        }
    }
}

/// One day of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based, contiguous across the whole itinerary.
    pub day_index: u32,
    pub label: String,
    pub quests: Vec<MatchedQuest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overnight: Option<Waypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<Hotel>,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub is_return_leg: bool,
}

/// Transport and accommodation cost of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub transport_cost: f64,
    pub accommodation_cost: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.transport_cost + self.accommodation_cost
    }
}

/// A complete multi-day trip plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: String,
    pub title: String,
    pub origin: Waypoint,
    pub destination: Waypoint,
    pub days: u32,
    pub day_plans: Vec<DayPlan>,
    pub outbound_geometry: Vec<GeoPoint>,
    pub return_geometry: Vec<GeoPoint>,
    pub total_distance_km: f64,
    pub total_duration_minutes: f64,
    pub transport_mode: TransportMode,
    pub is_round_trip: bool,
    pub cost: CostBreakdown,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Itinerary {
    /// Number of quests across all days.
    pub fn quest_count(&self) -> usize {
        self.day_plans.iter().map(|d| d.quests.len()).sum()
    }
}
