//! HTTP layer - the request/response boundary used by the presentation layer.
//!
//! Builds the axum router over an injected [`AppState`] and runs it until a shutdown
//! signal arrives.

/// Error-to-response mapping
pub mod error;
/// Route handlers
pub mod handlers;
/// Response bodies
pub mod response;

use crate::errors::Result;
use axum::{
    Router,
    routing::{get, patch, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pooled database connection; cloning the state shares the pool
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    /// Creates the state around an already-opened connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Builds the bill tracker router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/bills", get(handlers::list_bills))
        .route("/bills/amountPaid/{id}", get(handlers::get_amount_paid))
        .route(
            "/bills/{id}",
            get(handlers::get_bill).delete(handlers::delete_bill),
        )
        .route("/addbill", post(handlers::add_bill))
        .route("/paybill/{id}", patch(handlers::pay_bill))
        .route("/updatebill/{id}", patch(handlers::update_bill))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the router on `listener` until Ctrl-C or SIGTERM, then drains in-flight requests.
///
/// # Errors
/// Returns `Error::Io` if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {addr}");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
