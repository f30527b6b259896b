//! Place-name geocoding via Nominatim.

mod client;
mod error;
mod types;

pub use client::{GeocodeClient, GeocodeConfig};
pub use error::GeocodeError;
pub use types::{Place, short_name};
