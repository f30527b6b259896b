//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cache::CacheConfig;
use crate::geocode::GeocodeConfig;
use crate::llm::LlmConfig;
use crate::overpass::OverpassConfig;
use crate::routing::RoutingConfig;

/// Address used when `BIND_ADDR` is unset.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Invalid environment configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `BIND_ADDR` is not a socket address
    #[error("invalid BIND_ADDR {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub routing: RoutingConfig,
    pub overpass: OverpassConfig,
    pub llm: LlmConfig,
    pub geocode: GeocodeConfig,
    pub cache: CacheConfig,
    /// Catalog JSON file; the embedded catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    ///
    /// | Variable         | Effect                                   |
    /// |------------------|------------------------------------------|
    /// | `BIND_ADDR`      | listen address (default `127.0.0.1:3000`) |
    /// | `GEMINI_API_KEY` | enables AI quests and hotel pricing      |
    /// | `OSRM_BASE_URL`  | routing server                           |
    /// | `OVERPASS_URL`   | Overpass interpreter                     |
    /// | `NOMINATIM_URL`  | geocoding server                         |
    /// | `QUEST_CATALOG`  | catalog JSON file                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::BindAddr {
                value: bind.clone(),
                source,
            })?;

        let mut routing = RoutingConfig::default();
        if let Some(url) = get("OSRM_BASE_URL") {
            routing = routing.with_base_url(url);
        }

        let mut overpass = OverpassConfig::default();
        if let Some(url) = get("OVERPASS_URL") {
            overpass = overpass.with_base_url(url);
        }

        let llm = match get("GEMINI_API_KEY") {
            Some(key) => LlmConfig::new(key),
            None => LlmConfig::disabled(),
        };

        let mut geocode = GeocodeConfig::default();
        if let Some(url) = get("NOMINATIM_URL") {
            geocode = geocode.with_base_url(url);
        }

        Ok(Self {
            bind_addr,
            routing,
            overpass,
            llm,
            geocode,
            cache: CacheConfig::default(),
            catalog_path: get("QUEST_CATALOG").map(PathBuf::from),
        })
    }
}
