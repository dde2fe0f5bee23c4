use anyhow::{Context, Result};
use std::sync::Arc;

use realty_listings::config::{Settings, StorageBackend};
use realty_listings::store::{InMemoryStore, PgStore, Storage};
use realty_listings::{app, db, logging, seed};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        storage = ?settings.storage_backend,
        "Starting realty listings"
    );

    // Connect storage
    let store: Arc<dyn Storage> = match settings.storage_backend {
        StorageBackend::Postgres => {
            let database_url = settings
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when STORAGE_BACKEND=postgres")?;
            let pool = db::create_pool(database_url, settings.database_max_connections).await?;
            db::run_migrations(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            Arc::new(InMemoryStore::new())
        }
    };

    // Seed before accepting traffic
    if settings.seed_on_startup {
        seed::seed_property_types(store.as_ref())
            .await
            .context("Failed to seed property types")?;
    }

    // Create application state
    let state = app::AppState::new(store, settings.clone());

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
