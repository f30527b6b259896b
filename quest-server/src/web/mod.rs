//! Web layer for the side-quest planner.
//!
//! JSON endpoints for routing, quest matching, itineraries and trip
//! suggestions.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, StateError};
