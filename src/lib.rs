//! Edgeai - Multi-model inference runtime for edge devices
//!
//! Edgeai keeps several named models resident, runs them on demand or
//! through a background task queue, and reports a snapshot of its state.
//!
//! # Architecture
//!
//! - **engine**: model handles, registry, task queue, scheduler, status
//! - **model**: the built-in dense (affine + activation) backend
//! - **loader**: format detection and loading of model artifacts
//! - **server** / **cli**: HTTP and command-line front ends
//!
//! # Example
//!
//! ```bash
//! # Start server with two models
//! edgeai serve -m classifier=models/classifier.json -m anomaly=models/anomaly.yaml
//!
//! # One-off inference
//! edgeai run models/classifier.json --input 0.1,0.2,0.3,0.4
//!
//! # List available models
//! edgeai list
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod loader;
pub mod model;
pub mod server;

// Re-export key types
pub use config::{EdgeConfig, SchedulerConfig, ServerConfig};
pub use engine::{
    EngineError, InferenceScheduler, ModelHandle, ModelRegistry, StatusReporter, StatusSnapshot,
};
pub use loader::{load_model, FileLoader, ModelFormat, ModelSource};
