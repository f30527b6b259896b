//! Nominatim wire types.

use serde::Deserialize;

use crate::domain::{GeoPoint, Waypoint};

/// One search or reverse-lookup result. Nominatim sends coordinates as
/// strings.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

impl Place {
    pub fn location(&self) -> Option<GeoPoint> {
        let lat = self.lat.trim().parse().ok()?;
        let lng = self.lon.trim().parse().ok()?;
        GeoPoint::new(lat, lng).ok()
    }

    pub fn to_waypoint(&self) -> Option<Waypoint> {
        Some(Waypoint::new(self.location()?, short_name(&self.display_name)))
    }
}

/// First two comma-separated components of a display name.
///
/// `"Marienplatz, Altstadt, München, Bayern, Deutschland"` becomes
/// `"Marienplatz, Altstadt"`.
pub fn short_name(display_name: &str) -> String {
    display_name
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(2)
        .collect::<Vec<_>>()
        .join(", ")
}
