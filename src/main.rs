use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use cardlink::config::{Config, DatabaseBackend};
use cardlink::storage::{PostgresStorage, SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(SqliteStorage::new(&config.database.url).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", config.database.url);
            Arc::new(PostgresStorage::new(&config.database.url).await?)
        }
    };

    // Initialize database
    info!("Initializing database...");
    storage.init().await?;
    info!("Database initialized successfully");

    // Create routers
    let api_router = cardlink::api::create_api_router(Arc::clone(&storage));
    let public_router = cardlink::public::create_public_router(Arc::clone(&storage));

    // Start API server
    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("🚀 API server listening on http://{}", api_addr);

    // Start public profile server
    let public_addr = format!(
        "{}:{}",
        config.public_server.host, config.public_server.port
    );
    let public_listener = tokio::net::TcpListener::bind(&public_addr).await?;
    info!("🚀 Public profile server listening on http://{}", public_addr);

    // Run both servers concurrently
    tokio::try_join!(
        axum::serve(api_listener, api_router),
        axum::serve(public_listener, public_router),
    )?;

    Ok(())
}
