//! Geometry on route polylines.
//!
//! Distances are great-circle distances on a sphere with the mean Earth
//! radius. Nearest-vertex search deliberately uses squared planar degree
//! distance: it only ranks vertices and is much cheaper than haversine.

use crate::domain::GeoPoint;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Approximate kilometres per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = (b.lat() - a.lat()).to_radians();
    let dlng = (b.lng() - a.lng()).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Index of the polyline vertex closest to `point`.
///
/// Ties resolve to the lowest index. Returns 0 for an empty polyline;
/// callers are expected to guard against that case.
pub fn nearest_polyline_index(point: GeoPoint, polyline: &[GeoPoint]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, vertex) in polyline.iter().enumerate() {
        let d = vertex.planar_distance_sq(&point);
        if d < best_dist {
            best_dist = d;
            best_idx = idx;
        }
    }
    best_idx
}

/// Length of the polyline between vertex `from` and vertex `to` (exclusive
/// of segments starting at `to`), in kilometres.
///
/// Indices are clamped to the polyline.
pub fn polyline_segment_distance_km(polyline: &[GeoPoint], from: usize, to: usize) -> f64 {
    if polyline.len() < 2 {
        return 0.0;
    }
    let end = to.min(polyline.len() - 1);
    if from >= end {
        return 0.0;
    }
    polyline[from..=end]
        .windows(2)
        .map(|w| haversine_km(w[0], w[1]))
        .sum()
}

/// Total polyline length in kilometres.
pub fn polyline_length_km(polyline: &[GeoPoint]) -> f64 {
    polyline_segment_distance_km(polyline, 0, polyline.len().saturating_sub(1))
}

/// Reduce a polyline to points roughly `interval_km` apart.
///
/// The returned iterator is lazy and can be cloned to restart it.
pub fn sample_route_points(polyline: &[GeoPoint], interval_km: f64) -> RouteSampler<'_> {
    RouteSampler {
        polyline,
        interval_km,
        next_idx: 0,
        accumulated: 0.0,
        last_emitted: None,
        finished: polyline.is_empty(),
    }
}

/// Lazy sampler over a polyline. See [`sample_route_points`].
///
/// Emits the first vertex, then every vertex at which the length
/// accumulated since the previous emission reaches the interval, and
/// finally the last vertex if it was not just emitted.
#[derive(Debug, Clone)]
pub struct RouteSampler<'a> {
    polyline: &'a [GeoPoint],
    interval_km: f64,
    next_idx: usize,
    accumulated: f64,
    last_emitted: Option<usize>,
    finished: bool,
}

impl Iterator for RouteSampler<'_> {
    type Item = GeoPoint;

    fn next(&mut self) -> Option<GeoPoint> {
        if self.finished {
            return None;
        }

        if self.last_emitted.is_none() {
            self.last_emitted = Some(0);
            self.next_idx = 1;
            return Some(self.polyline[0]);
        }

        let last = self.polyline.len() - 1;
        while self.next_idx <= last {
            let i = self.next_idx;
            self.next_idx += 1;
            self.accumulated += haversine_km(self.polyline[i - 1], self.polyline[i]);
            if self.accumulated >= self.interval_km {
                self.accumulated = 0.0;
                self.last_emitted = Some(i);
                return Some(self.polyline[i]);
            }
        }

        self.finished = true;
        let last_point = self.polyline[last];
        match self.last_emitted {
            Some(idx) if idx == last || self.polyline[idx] == last_point => None,
            _ => {
                self.last_emitted = Some(last);
                Some(last_point)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            let remaining = self.polyline.len() - self.next_idx.min(self.polyline.len());
            (0, Some(remaining + 1))
        }
    }
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Bounding box of a polyline, or `None` if it is empty.
    pub fn of(polyline: &[GeoPoint]) -> Option<Self> {
        let first = polyline.first()?;
        let mut bbox = BoundingBox {
            min_lat: first.lat(),
            max_lat: first.lat(),
            min_lng: first.lng(),
            max_lng: first.lng(),
        };
        for p in &polyline[1..] {
            bbox.min_lat = bbox.min_lat.min(p.lat());
            bbox.max_lat = bbox.max_lat.max(p.lat());
            bbox.min_lng = bbox.min_lng.min(p.lng());
            bbox.max_lng = bbox.max_lng.max(p.lng());
        }
        Some(bbox)
    }

    /// Grow the box by `degrees` on every side.
    pub fn padded(self, degrees: f64) -> Self {
        BoundingBox {
            min_lat: self.min_lat - degrees,
            max_lat: self.max_lat + degrees,
            min_lng: self.min_lng - degrees,
            max_lng: self.max_lng + degrees,
        }
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat() >= self.min_lat
            && p.lat() <= self.max_lat
            && p.lng() >= self.min_lng
            && p.lng() <= self.max_lng
    }
}
