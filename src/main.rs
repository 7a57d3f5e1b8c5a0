//! Team Directory Gateway
//!
//! Serves the member collection over REST, backed by a flat JSON document or
//! a hosted record collection.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roster::config::{Config, StoreBackend};
use roster::{create_router, store, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Team Directory Gateway");
    match &config.store {
        StoreBackend::File { path } => tracing::info!("Member store: file {:?}", path),
        StoreBackend::Hosted {
            base_url,
            collection,
        } => tracing::info!("Member store: collection '{}' at {}", collection, base_url),
    }
    tracing::info!("Bind address: {}", config.bind_addr);

    // Open the configured store
    let store = store::open_store(&config).await?;

    // Create application state
    let state = AppState { store };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
