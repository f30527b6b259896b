//! Road routing via an OSRM server.
//!
//! OSRM returns GeoJSON geometry with `[lng, lat]` coordinate pairs; these
//! are swapped and validated into [`GeoPoint`]s at the boundary so that the
//! rest of the crate only ever sees `(lat, lng)`.

mod client;
mod error;
mod types;

use std::future::Future;

use crate::domain::GeoPoint;

pub use client::{MAX_ROUTE_POINTS, RoutingClient, RoutingConfig};
pub use error::RoutingError;
pub use types::{RawGeometry, RawRoute, Route, RouteResponse};

/// Anything that can produce a driving route between two points.
///
/// The itinerary builder is generic over this so tests can supply fixed
/// geometries.
pub trait RouteProvider {
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = Result<Route, RoutingError>> + Send;
}
