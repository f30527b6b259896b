//! Turning a route and its quests into a day-by-day plan.
//!
//! A trip has up to three phases: the outbound drive, days spent around the
//! destination, and (for round trips) the drive home. [`DaySplit`] decides
//! how many days each phase gets, [`partition_phase`] cuts a travel phase
//! into days, and [`TripPlanner`] ties routing, quest matching, lodging and
//! costing together.

mod builder;
mod config;
mod partition;
mod split;

pub use builder::{ItineraryError, TripPlanner, TripRequest, build_route_itinerary};
pub use config::ItineraryConfig;
pub use partition::{DistancePolicy, Phase, PhaseDay, partition_phase};
pub use split::DaySplit;
