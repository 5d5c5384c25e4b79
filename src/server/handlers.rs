//! HTTP request handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::engine::{
    EngineError, InferenceScheduler, ModelRegistry, StatusReporter, TaskId,
};

/// Shared application state
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub scheduler: Arc<InferenceScheduler>,
    pub reporter: StatusReporter,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>, scheduler: Arc<InferenceScheduler>) -> Self {
        let reporter = StatusReporter::new(Arc::clone(&registry), Arc::clone(&scheduler));
        Self {
            registry,
            scheduler,
            reporter,
        }
    }
}

/// Engine error rendered as a JSON error body
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            EngineError::ModelNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::ShapeMismatch { .. } | EngineError::InitializationFailure { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            EngineError::DuplicateName(_) | EngineError::InvalidState(_) => StatusCode::CONFLICT,
            EngineError::QueueFull { .. } => StatusCode::TOO_MANY_REQUESTS,
            EngineError::NotInitialized(_) | EngineError::SchedulerStopped => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            EngineError::RuntimeExecutionFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorDetail {
                kind: self.0.kind().to_string(),
                message: self.0.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Server status
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.reporter.report().await)
}

/// List loaded models
pub async fn list_models(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.registry.list().await)
}

/// Load a new model
pub async fn load_model(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoadModelRequest>,
) -> Result<Response, ApiError> {
    state.registry.load(&request.name, &request.path).await?;

    match state.registry.describe(&request.name).await {
        Some(info) => Ok((StatusCode::CREATED, Json(info)).into_response()),
        // Unloaded again between the two calls
        None => Err(EngineError::ModelNotFound(request.name).into()),
    }
}

/// Unload a model
pub async fn unload_model(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.registry.unload(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Synchronous inference
pub async fn run_inference(
    State(state): State<Arc<AppState>>,
    Path(model): Path<String>,
    Json(request): Json<InferenceRequest>,
) -> Result<Json<InferenceResponse>, ApiError> {
    let start = Instant::now();
    let output = state.registry.run(&model, request.input).await?;

    Ok(Json(InferenceResponse {
        model,
        output,
        latency_us: start.elapsed().as_micros() as u64,
    }))
}

/// Queue an inference for the background worker
pub async fn queue_inference(
    State(state): State<Arc<AppState>>,
    Path(model): Path<String>,
    Json(request): Json<InferenceRequest>,
) -> Result<Response, ApiError> {
    let task_id = state.scheduler.enqueue(model, request.input)?;

    let response = QueuedResponse {
        task_id,
        queue_depth: state.scheduler.queue_depth(),
    };
    Ok((StatusCode::ACCEPTED, Json(response)).into_response())
}

// Request/Response types

#[derive(Deserialize)]
pub struct LoadModelRequest {
    pub name: String,
    pub path: std::path::PathBuf,
}

#[derive(Deserialize)]
pub struct InferenceRequest {
    pub input: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
pub struct InferenceResponse {
    pub model: String,
    pub output: Vec<f32>,
    pub latency_us: u64,
}

#[derive(Serialize, Deserialize)]
pub struct QueuedResponse {
    pub task_id: TaskId,
    pub queue_depth: usize,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}
