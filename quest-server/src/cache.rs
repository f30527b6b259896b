//! Caching layer for routing responses.
//!
//! The same origin/destination pairs come up repeatedly (quest lookup, then
//! an itinerary for the same trip). Endpoints are snapped to a 1e-4 degree
//! grid (about 11 m) so that requests differing only by float noise share
//! an entry.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::GeoPoint;
use crate::routing::{Route, RouteProvider, RoutingClient, RoutingError};

/// Grid resolution for cache keys, in cells per degree.
const GRID_SCALE: f64 = 10_000.0;

/// Cache key for routes: (origin cell, destination cell).
type RouteKey = ((i64, i64), (i64, i64));

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            max_capacity: 1000,
        }
    }
}

/// Routing provider with caching.
///
/// Wraps any [`RouteProvider`] (normally a [`RoutingClient`]) and caches
/// successful point-to-point routes. Failures are not cached.
pub struct CachedRoutingClient<P = RoutingClient> {
    client: P,
    routes: MokaCache<RouteKey, Arc<Route>>,
}

fn route_key(origin: GeoPoint, destination: GeoPoint) -> RouteKey {
    (origin.grid_key(GRID_SCALE), destination.grid_key(GRID_SCALE))
}

impl<P: RouteProvider + Sync> CachedRoutingClient<P> {
    /// Create a new cached client.
    pub fn new(client: P, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { client, routes }
    }

    /// Get a route, using the cache if available.
    pub async fn get_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Arc<Route>, RoutingError> {
        let key = route_key(origin, destination);

        if let Some(cached) = self.routes.get(&key).await {
            debug!(%origin, %destination, "route cache hit");
            return Ok(cached);
        }

        let route = Arc::new(self.client.route(origin, destination).await?);
        self.routes.insert(key, route.clone()).await;

        Ok(route)
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &P {
        &self.client
    }
}

impl<P: RouteProvider + Sync> RouteProvider for CachedRoutingClient<P> {
    async fn route(&self, origin: GeoPoint, destination: GeoPoint) -> Result<Route, RoutingError> {
        self.get_route(origin, destination)
            .await
            .map(|r| Route::clone(&r))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl RouteProvider for CountingProvider {
        async fn route(
            &self,
            origin: GeoPoint,
            destination: GeoPoint,
        ) -> Result<Route, RoutingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if origin == destination {
                return Err(RoutingError::NoRoute);
            }
            Ok(Route {
                geometry: vec![origin, destination],
                distance_m: 1000.0,
                duration_s: 60.0,
            })
        }
    }

    fn cached() -> CachedRoutingClient<CountingProvider> {
        CachedRoutingClient::new(
            CountingProvider {
                calls: AtomicUsize::new(0),
            },
            &CacheConfig::default(),
        )
    }

    fn pt(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(1800));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn nearby_points_share_a_key() {
        let a = route_key(pt(48.13741, 11.57549), pt(52.52, 13.405));
        let b = route_key(pt(48.137412, 11.575491), pt(52.52, 13.405));
        assert_eq!(a, b);

        let c = route_key(pt(48.1380, 11.5755), pt(52.52, 13.405));
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache() {
        let cache = cached();
        let a = pt(48.0, 11.0);
        let b = pt(49.0, 12.0);

        let first = cache.get_route(a, b).await.unwrap();
        let second = cache.get_route(a, b).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.client().calls.load(Ordering::SeqCst), 1);

        // Reverse direction is a different route.
        cache.get_route(b, a).await.unwrap();
        assert_eq!(cache.client().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = cached();
        let a = pt(48.0, 11.0);

        assert!(cache.get_route(a, a).await.is_err());
        assert!(cache.get_route(a, a).await.is_err());
        assert_eq!(cache.client().calls.load(Ordering::SeqCst), 2);
    }
}
