//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedRoutingClient;
use crate::catalog::QuestCatalog;
use crate::config::ServerConfig;
use crate::cost::CostModel;
use crate::discovery::DiscoveryConfig;
use crate::geocode::{GeocodeClient, GeocodeError};
use crate::itinerary::ItineraryConfig;
use crate::llm::{LlmClient, LlmError};
use crate::lodging::LodgingService;
use crate::matcher::MatcherConfig;
use crate::overpass::{OverpassClient, OverpassError};
use crate::routing::{RoutingClient, RoutingError};

/// A collaborator client could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("routing client: {0}")]
    Routing(#[from] RoutingError),

    #[error("Overpass client: {0}")]
    Overpass(#[from] OverpassError),

    #[error("language model client: {0}")]
    Llm(#[from] LlmError),

    #[error("geocoding client: {0}")]
    Geocode(#[from] GeocodeError),
}

/// Shared application state.
///
/// Contains all the services needed to handle requests. The HTTP clients
/// are cheap to clone; everything else is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Curated quests, read-only after start-up
    pub catalog: Arc<QuestCatalog>,

    /// Cached OSRM client
    pub routing: Arc<CachedRoutingClient>,

    pub overpass: OverpassClient,
    pub llm: LlmClient,
    pub geocode: GeocodeClient,

    /// Hotel search and pricing
    pub lodging: Arc<LodgingService>,

    pub matcher: Arc<MatcherConfig>,
    pub itinerary: Arc<ItineraryConfig>,
    pub discovery: Arc<DiscoveryConfig>,
    pub costs: Arc<CostModel>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        catalog: QuestCatalog,
        routing: CachedRoutingClient,
        overpass: OverpassClient,
        llm: LlmClient,
        geocode: GeocodeClient,
    ) -> Self {
        let lodging = LodgingService::new(overpass.clone(), llm.clone());
        Self {
            catalog: Arc::new(catalog),
            routing: Arc::new(routing),
            overpass,
            llm,
            geocode,
            lodging: Arc::new(lodging),
            matcher: Arc::new(MatcherConfig::default()),
            itinerary: Arc::new(ItineraryConfig::default()),
            discovery: Arc::new(DiscoveryConfig::default()),
            costs: Arc::new(CostModel::default()),
        }
    }

    /// Build every client from server configuration.
    ///
    /// No network traffic happens here.
    pub fn from_config(catalog: QuestCatalog, config: &ServerConfig) -> Result<Self, StateError> {
        let routing = RoutingClient::new(config.routing.clone())?;
        let routing = CachedRoutingClient::new(routing, &config.cache);
        let overpass = OverpassClient::new(config.overpass.clone())?;
        let llm = LlmClient::new(config.llm.clone())?;
        let geocode = GeocodeClient::new(config.geocode.clone())?;
        Ok(Self::new(catalog, routing, overpass, llm, geocode))
    }
}
