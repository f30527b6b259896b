//! Finding somewhere to sleep near an overnight stop.

use std::future::Future;

use tracing::{debug, warn};

use crate::domain::{GeoPoint, Hotel, HotelKind};
use crate::llm::LlmClient;
use crate::overpass::OverpassClient;

/// Search radius around an overnight stop, in metres.
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 5_000;

/// Anything that can suggest a hotel near a point.
///
/// `region_name` gives price estimation some local context.
pub trait LodgingProvider {
    fn find_best_hotel_near(
        &self,
        point: GeoPoint,
        region_name: &str,
    ) -> impl Future<Output = Option<Hotel>> + Send;
}

/// Lodging lookups backed by Overpass, priced by the language model.
#[derive(Debug, Clone)]
pub struct LodgingService {
    overpass: OverpassClient,
    llm: LlmClient,
    radius_m: u32,
}

impl LodgingService {
    pub fn new(overpass: OverpassClient, llm: LlmClient) -> Self {
        Self {
            overpass,
            llm,
            radius_m: DEFAULT_SEARCH_RADIUS_M,
        }
    }
}

impl LodgingProvider for LodgingService {
    async fn find_best_hotel_near(&self, point: GeoPoint, region_name: &str) -> Option<Hotel> {
        let found = match self.overpass.find_hotels_near(point, self.radius_m).await {
            Ok(found) => found,
            Err(e) => {
                warn!(%point, error = %e, "hotel search failed");
                return None;
            }
        };
        if found.is_empty() {
            debug!(%point, "no hotels nearby");
            return None;
        }

        let priced = self.llm.estimate_hotel_prices(&found, region_name).await;
        pick_best_hotel(priced)
    }
}

/// Cheapest proper hotel, or the cheapest of anything if there is no hotel.
/// Ties keep the earlier entry.
pub fn pick_best_hotel(hotels: Vec<Hotel>) -> Option<Hotel> {
    let has_hotel = hotels.iter().any(|h| h.kind == HotelKind::Hotel);
    hotels
        .into_iter()
        .filter(|h| !has_hotel || h.kind == HotelKind::Hotel)
        .min_by_key(|h| h.estimated_price)
}
