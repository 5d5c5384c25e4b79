//! HTTP server for inference
//!
//! Thin adapter exposing the engine over a JSON REST API.

mod handlers;
mod routes;

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use handlers::{
    AppState, ApiError, ErrorDetail, ErrorResponse, InferenceRequest, InferenceResponse,
    LoadModelRequest, QueuedResponse,
};
pub use routes::api_routes;

/// Build the application router with its middleware
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .merge(api_routes())
        .layer(DefaultBodyLimit::max(config.max_body_size));

    if let Some(timeout) = config.request_timeout() {
        app = app.layer(TimeoutLayer::new(timeout));
    }

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    if config.request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

/// Start the HTTP server and run until `shutdown` resolves
pub async fn start<F>(state: Arc<AppState>, config: ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state, &config);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET    /health - Health check");
    tracing::info!("  GET    /api/status - Server status");
    tracing::info!("  GET    /api/models - List loaded models");
    tracing::info!("  POST   /api/load-model - Load new model");
    tracing::info!("  DELETE /api/models/{{name}} - Unload model");
    tracing::info!("  POST   /api/inference/{{model}} - Run inference");
    tracing::info!("  POST   /api/queue/{{model}} - Queue inference");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
