//! Read-only status API.
//!
//! # Endpoints
//! - `GET /status` — system summary
//! - `GET /status/domains` — every domain's failover state, last verdicts,
//!   transition history, and DNS sync outcome
//! - `GET /status/domains/{domain}` — one domain
//! - `GET /healthz` — liveness of the daemon itself
//!
//! # Design Decisions
//! - Strictly read-only: the loops own all state; this surface only reads
//!   published snapshots
//! - No mutation endpoints means no auth beyond network placement

pub mod handlers;

use axum::routing::get;
use axum::Router;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::controller::StatusRegistry;

/// Build the status API router.
pub fn router(registry: StatusRegistry) -> Router {
    Router::new()
        .route("/status", get(handlers::get_system))
        .route("/status/domains", get(handlers::get_all_domains))
        .route("/status/domains/{domain}", get(handlers::get_domain))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

/// Serve the status API until shutdown.
pub async fn serve(
    bind_address: &str,
    registry: StatusRegistry,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!(address = %bind_address, "Status API listening");

    axum::serve(listener, router(registry))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}
