//! Partitioning one travel phase into days.
//!
//! The phase polyline is cut into `days` contiguous index windows of
//! `ceil(len / days)` vertices; the last window runs to the end of the
//! polyline. Quests are ordered by their nearest polyline vertex and land
//! in the window containing that vertex.

use std::ops::Range;

use crate::domain::{GeoPoint, MatchedQuest, Waypoint};
use crate::geometry::{nearest_polyline_index, polyline_segment_distance_km};

/// How per-day distance and duration are derived.
///
/// The full-trip builder uses [`DistancePolicy::EqualSplit`] so that the
/// routing service's figures (which follow real roads) are preserved. The
/// single-route day planner uses [`DistancePolicy::SegmentSum`], which
/// reflects where each day's windows actually fall on the polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistancePolicy {
    /// Divide the phase totals evenly across days.
    EqualSplit,
    /// Sum polyline segments inside each day's window and derive duration
    /// from an average speed.
    SegmentSum { average_speed_kmh: f64 },
}

/// A travel phase to partition.
#[derive(Debug, Clone, Copy)]
pub struct Phase<'a> {
    pub polyline: &'a [GeoPoint],
    /// Phase distance as reported by the routing service.
    pub distance_km: f64,
    /// Phase duration as reported by the routing service.
    pub duration_minutes: f64,
    pub days: u32,
}

/// One day of a partitioned phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDay {
    pub quests: Vec<MatchedQuest>,
    /// Polyline vertex window covered by this day.
    pub window: Range<usize>,
    /// Where the day ends; `None` for the last day of the phase.
    pub overnight: Option<Waypoint>,
    pub distance_km: f64,
    pub duration_minutes: f64,
}

/// Split a phase and its quests into days.
///
/// Every quest is placed in exactly one day. `phase.days == 0` is treated
/// as one day. An empty polyline yields days with zero distance and every
/// quest on the first day.
pub fn partition_phase(
    phase: &Phase<'_>,
    quests: Vec<MatchedQuest>,
    policy: DistancePolicy,
) -> Vec<PhaseDay> {
    let days = phase.days.max(1) as usize;
    let len = phase.polyline.len();
    let points_per_day = len.div_ceil(days).max(1);
    let last_vertex = len.saturating_sub(1);

    let mut indexed: Vec<(usize, MatchedQuest)> = quests
        .into_iter()
        .map(|q| (nearest_polyline_index(q.location(), phase.polyline), q))
        .collect();
    indexed.sort_by_key(|(idx, _)| *idx);

    let mut buckets: Vec<Vec<MatchedQuest>> = vec![Vec::new(); days];
    for (idx, quest) in indexed {
        let day = (idx / points_per_day).min(days - 1);
        buckets[day].push(quest);
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(d, quests)| {
            let is_last = d == days - 1;
            let start = (d * points_per_day).min(last_vertex);
            let end = if is_last {
                last_vertex
            } else {
                ((d + 1) * points_per_day).min(last_vertex)
            };

            let (distance_km, duration_minutes) = match policy {
                DistancePolicy::EqualSplit => (
                    phase.distance_km / days as f64,
                    phase.duration_minutes / days as f64,
                ),
                DistancePolicy::SegmentSum { average_speed_kmh } => {
                    let km = polyline_segment_distance_km(phase.polyline, start, end);
                    (km, km / average_speed_kmh * 60.0)
                }
            };

            let overnight = if is_last {
                None
            } else {
                overnight_for(&quests, phase.polyline.get(end).copied(), d + 1)
            };

            PhaseDay {
                quests,
                window: start..end,
                overnight,
                distance_km,
                duration_minutes,
            }
        })
        .collect()
}

/// The last quest of the day, or the route point where the day ends.
fn overnight_for(
    quests: &[MatchedQuest],
    day_end: Option<GeoPoint>,
    day_number: usize,
) -> Option<Waypoint> {
    match quests.last() {
        Some(q) => Some(Waypoint::new(q.location(), q.poi.title.clone())),
        None => day_end.map(|p| Waypoint::new(p, format!("Day {day_number} stop"))),
    }
}
