//! Routing service wire types and the validated [`Route`].

use serde::Deserialize;

use crate::domain::GeoPoint;

use super::error::RoutingError;

/// Top-level routing response.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

/// One route alternative as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoute {
    pub geometry: RawGeometry,
    /// Metres.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}

/// GeoJSON line geometry; coordinates are `[lng, lat]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

/// A driving route with validated geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub geometry: Vec<GeoPoint>,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl Route {
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_s / 60.0
    }
}

impl TryFrom<RouteResponse> for Route {
    type Error = RoutingError;

    /// Takes the first alternative and swaps its coordinates into
    /// `(lat, lng)` order.
    fn try_from(resp: RouteResponse) -> Result<Self, Self::Error> {
        if resp.code != "Ok" {
            return match resp.code.as_str() {
                "NoRoute" | "NoSegment" => Err(RoutingError::NoRoute),
                code => Err(RoutingError::Api {
                    status: 200,
                    message: resp.message.unwrap_or_else(|| code.to_string()),
                }),
            };
        }

        let raw = resp.routes.into_iter().next().ok_or(RoutingError::NoRoute)?;

        let geometry = raw
            .geometry
            .coordinates
            .iter()
            .map(|&[lng, lat]| GeoPoint::new(lat, lng))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RoutingError::InvalidGeometry(e.to_string()))?;

        if geometry.is_empty() {
            return Err(RoutingError::InvalidGeometry("empty geometry".into()));
        }

        Ok(Route {
            geometry,
            distance_m: raw.distance,
            duration_s: raw.duration,
        })
    }
}
