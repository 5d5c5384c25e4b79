//! Route definitions

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    health, list_models, load_model, queue_inference, run_inference, status, unload_model,
    AppState,
};

/// Create the API router
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Status and model management
        .route("/api/status", get(status))
        .route("/api/models", get(list_models))
        .route("/api/models/:name", delete(unload_model))
        .route("/api/load-model", post(load_model))
        // Inference
        .route("/api/inference/:model", post(run_inference))
        .route("/api/queue/:model", post(queue_inference))
}
