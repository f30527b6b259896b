//! Itinerary builder configuration.

/// Tunables for building multi-day itineraries.
#[derive(Debug, Clone)]
pub struct ItineraryConfig {
    /// Longest trip accepted, in days.
    pub max_days: u32,

    /// Catalog quests within this distance of the destination fill the
    /// stay days (km).
    pub destination_radius_km: f64,

    /// Speed used to turn polyline distance into driving time (km/h).
    pub average_speed_kmh: f64,

    /// Detour budget for quests along the outbound and return routes.
    pub detour_budget_minutes: u32,

    /// Region name passed to lodging lookups when the destination has no
    /// name, and for return-leg stops.
    pub fallback_region: String,
}

impl Default for ItineraryConfig {
    fn default() -> Self {
        Self {
            max_days: 14,
            destination_radius_km: 20.0,
            average_speed_kmh: 80.0,
            detour_budget_minutes: 30,
            fallback_region: "Germany".to_string(),
        }
    }
}

impl ItineraryConfig {
    /// Clamp a requested day count to `1..=max_days`.
    pub fn clamp_days(&self, days: u32) -> u32 {
        days.clamp(1, self.max_days.max(1))
    }
}
