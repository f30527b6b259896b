use quest_server::catalog::QuestCatalog;
use quest_server::config::ServerConfig;
use quest_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quest_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let catalog = match &config.catalog_path {
        Some(path) => QuestCatalog::from_path(path).expect("Failed to load quest catalog"),
        None => QuestCatalog::embedded().expect("Embedded quest catalog is invalid"),
    };
    info!(
        regions = catalog.regions().len(),
        quests = catalog.len(),
        "loaded quest catalog"
    );

    if config.llm.api_key.is_none() {
        warn!("GEMINI_API_KEY not set. AI quests and hotel pricing are disabled.");
    }

    let state = AppState::from_config(catalog, &config).expect("Failed to create clients");
    let app = create_router(state);

    let addr = config.bind_addr;
    info!(%addr, "side-quest planner listening");
    info!("  GET  /health               - Health check");
    info!("  POST /api/route            - Route through waypoints");
    info!("  POST /api/quests           - Catalog quests along a route");
    info!("  POST /api/quests-ai        - AI quests along a route");
    info!("  POST /api/trip-itinerary   - Multi-day itinerary");
    info!("  POST /api/trip-plan        - Destination suggestions");
    info!("  POST /api/progress         - Exploration progress");
    info!("  GET  /api/geocode?q=       - Place search");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
