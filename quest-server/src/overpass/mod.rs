//! OpenStreetMap POI and accommodation discovery via the Overpass API.
//!
//! Queries are sent as form-encoded Overpass QL. Elements without a name
//! or a position are dropped during conversion; nothing downstream has to
//! deal with anonymous features.

mod client;
mod error;
mod types;

pub use client::{OverpassClient, OverpassConfig, hotel_query, poi_query};
pub use error::OverpassError;
pub use types::{Center, Element, OverpassResponse, RawHotel, RawPoi, detect_kind};
