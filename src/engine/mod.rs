//! Core inference engine
//!
//! This module provides the inference execution pipeline:
//! - ModelHandle: owns one model runtime, serializes its execution
//! - ModelRegistry: name -> handle map with dynamic load/unload
//! - InferenceScheduler: single worker draining a FIFO task queue
//! - StatusReporter: read-only status snapshots

mod backend;
mod error;
mod handle;
mod queue;
mod registry;
mod scheduler;
mod status;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::{BackendLoader, BoxedBackend, ModelBackend};
pub use error::{EngineError, EngineResult};
pub use handle::{HandleState, ModelHandle, TensorShape};
pub use queue::{InferenceTask, ReplyReceiver, TaskId};
pub use registry::{ModelInfo, ModelRegistry, ModelStatus};
pub use scheduler::{InferenceScheduler, SchedulerState, SchedulerStats};
pub use status::{StatusReporter, StatusSnapshot};
