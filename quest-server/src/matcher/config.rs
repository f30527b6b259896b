//! Matcher configuration.

/// Tunables for matching quests against a route.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Spacing of the coarse route sample used for distance checks (km).
    pub sample_interval_km: f64,

    /// Kilometres per degree, used to pad the route bounding box.
    pub km_per_degree: f64,

    /// Detour minutes charged per kilometre of straight-line distance.
    pub minutes_per_km: f64,

    /// Kilometres of straight-line distance covered per detour minute
    /// when converting a minute budget into a search radius.
    pub km_per_detour_minute: f64,

    /// AI POIs closer than this to a catalog entry take its id (km).
    pub dedup_threshold_km: f64,
}

impl MatcherConfig {
    /// Detour minutes for a straight-line distance, rounded to the minute.
    pub fn detour_minutes(&self, distance_km: f64) -> u32 {
        (distance_km * self.minutes_per_km).round().max(0.0) as u32
    }

    /// Search radius corresponding to a detour budget.
    pub fn max_detour_km(&self, budget_minutes: u32) -> f64 {
        budget_minutes as f64 * self.km_per_detour_minute
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            sample_interval_km: 5.0,
            km_per_degree: crate::geometry::KM_PER_DEGREE,
            minutes_per_km: 1.0,
            km_per_detour_minute: 1.0,
            dedup_threshold_km: 0.5,
        }
    }
}
