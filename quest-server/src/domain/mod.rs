//! Domain types for the side-quest trip planner.
//!
//! Coordinates and categories are validated at construction time, so code
//! that receives these types can trust their validity. Everything here is
//! a value object computed per request.

mod category;
mod geo;
mod quest;
mod trip;

pub use category::{InvalidCategory, QuestCategory, matches_interests};
pub use geo::{GeoPoint, InvalidGeoPoint};
pub use quest::{MatchedQuest, PointOfInterest};
pub use trip::{
    CostBreakdown, DayPlan, FuelType, Hotel, HotelKind, Itinerary, TransportMode, Waypoint,
};
