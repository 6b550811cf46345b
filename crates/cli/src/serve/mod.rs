//! `reverseai serve` -- the ReverseAI web page.
//!
//! Serves a single server-rendered HTML form using `axum` + `tokio`.
//! Each decode submission makes exactly one Gemini call.
//!
//! Endpoints:
//! - GET  /         - The page with an empty form
//! - POST /decode   - Decode (or clear) a submitted post; returns the page
//! - GET  /health   - Server status as JSON

mod handlers;
mod page;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use reverseai_core::llm::API_KEY_ENV;

use self::handlers::{handle_decode, handle_health, handle_index, handle_not_found};
use self::state::AppState;
use crate::config::ServeConfig;

/// Maximum request body size: 1 MB.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Maximum pasted post size in bytes.
pub(crate) const MAX_POST_SIZE: usize = 32 * 1024;

/// Build the router over the given state.
pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/decode", post(handle_decode))
        .route("/health", get(handle_health))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl+C.
pub async fn start_server(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var(API_KEY_ENV).map_or(true, |k| k.is_empty()) {
        tracing::warn!(
            "{} is not set; every decode will show an error until it is",
            API_KEY_ENV
        );
    }

    let addr = SocketAddr::new(config.bind, config.port);
    tracing::info!(model = %config.model, api_base = %config.api_base, "starting ReverseAI");

    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("ReverseAI listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received shutdown signal"),
        Err(e) => {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
