use bill_tracker::{
    api::{self, AppState},
    config,
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!("Configuration loaded.");

    // 4. Open the connection pool and make sure the bills table exists
    let db = config::database::create_connection(&app_config.database)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Serve until shutdown, then close the pool
    let listener = TcpListener::bind(&app_config.server.bind_addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.server.bind_addr, e))?;
    let db = Arc::new(db);
    api::serve(listener, AppState::new(Arc::clone(&db))).await?;

    match Arc::try_unwrap(db) {
        Ok(db) => {
            db.close().await?;
            info!("Database connection pool closed.");
        }
        Err(_) => warn!("Database pool still shared at shutdown; leaving it to drop."),
    }

    Ok(())
}
