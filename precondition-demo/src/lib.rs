//! HTTP service demonstrating conditional updates with `ETag` / `If-Match`
//! and offset pagination over a large dataset.

mod api;
pub mod config;
pub mod dataset;
mod error;
mod extract;
mod headers;
pub mod log;
mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use crate::config::Config;
pub use crate::state::AppState;

/// Builds the HTTP router of the service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/reports", get(api::list_reports))
        .route(
            "/api/reports/{id}",
            get(api::get_report).put(api::update_report),
        )
        .route("/api/reset", post(api::reset))
        .route("/api/emissions", get(api::emissions))
        .route("/api/emissions-all", get(api::all_emissions))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the service until a shutdown signal is received.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(&config).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!(addr = %config.addr(), "HTTP server is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutdown signal received, stopping...");
}
