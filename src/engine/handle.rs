//! Model runtime handle
//!
//! Owns one loaded model and its execution context. Initialization is
//! one-shot and `run` is serialized per handle; handles of different models
//! never share a lock.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Instant;

use serde::Serialize;

use super::backend::{BackendLoader, BoxedBackend};
use super::error::{EngineError, EngineResult};

/// Lifecycle of a handle
///
/// Only `Uninitialized -> Ready` and `Uninitialized -> Failed` are possible.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleState {
    Uninitialized = 0,
    Ready = 1,
    Failed = 2,
}

impl HandleState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => HandleState::Ready,
            2 => HandleState::Failed,
            _ => HandleState::Uninitialized,
        }
    }
}

/// Backend plus the input/output buffers sized from its declared shapes
struct ExecutionContext {
    backend: BoxedBackend,
    input: Vec<f32>,
    output: Vec<f32>,
}

/// Tensor sizes declared by a ready model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorShape {
    pub input: usize,
    pub output: usize,
}

/// Handle to a single model runtime
pub struct ModelHandle {
    name: String,
    path: PathBuf,
    state: AtomicU8,
    shape: OnceLock<TensorShape>,
    context: Mutex<Option<ExecutionContext>>,
}

impl ModelHandle {
    /// Create an uninitialized handle for the artifact at `path`
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            state: AtomicU8::new(HandleState::Uninitialized as u8),
            shape: OnceLock::new(),
            context: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current lifecycle state
    pub fn state(&self) -> HandleState {
        HandleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Non-blocking readiness check
    pub fn is_ready(&self) -> bool {
        self.state() == HandleState::Ready
    }

    /// Declared tensor sizes, once ready
    pub fn shape(&self) -> Option<TensorShape> {
        self.shape.get().copied()
    }

    pub fn input_size(&self) -> Option<usize> {
        self.shape().map(|s| s.input)
    }

    pub fn output_size(&self) -> Option<usize> {
        self.shape().map(|s| s.output)
    }

    /// Load the artifact and build the execution context
    ///
    /// On any failure the handle moves to `Failed` and stays there.
    pub fn initialize(&self, loader: &dyn BackendLoader) -> EngineResult<()> {
        let mut context = self.lock_context();

        if self.state() != HandleState::Uninitialized {
            return Err(EngineError::init(
                &self.path,
                format!("handle is {:?}, initialization is one-shot", self.state()),
            ));
        }

        match Self::build_context(&self.path, loader) {
            Ok(ctx) => {
                let shape = TensorShape {
                    input: ctx.input.len(),
                    output: ctx.output.len(),
                };
                let description = ctx.backend.describe();
                *context = Some(ctx);
                let _ = self.shape.set(shape);
                self.state.store(HandleState::Ready as u8, Ordering::Release);
                tracing::info!(
                    "Model initialized: {} ({}) from {}",
                    self.name,
                    description,
                    self.path.display()
                );
                Ok(())
            }
            Err(e) => {
                self.state.store(HandleState::Failed as u8, Ordering::Release);
                tracing::error!("Failed to initialize model {}: {}", self.name, e);
                Err(e)
            }
        }
    }

    fn build_context(path: &Path, loader: &dyn BackendLoader) -> EngineResult<ExecutionContext> {
        let backend = loader
            .load(path)
            .map_err(|e| EngineError::init(path, format!("{:#}", e)))?;

        let (input_len, output_len) = (backend.input_len(), backend.output_len());
        if input_len == 0 || output_len == 0 {
            return Err(EngineError::init(
                path,
                format!("degenerate tensor shape {} -> {}", input_len, output_len),
            ));
        }

        Ok(ExecutionContext {
            backend,
            input: vec![0.0; input_len],
            output: vec![0.0; output_len],
        })
    }

    // Every run overwrites both buffers in full, so a context poisoned by a
    // panicking backend is still usable
    fn lock_context(&self) -> MutexGuard<'_, Option<ExecutionContext>> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one inference
    ///
    /// Concurrent callers block on the execution context until the
    /// in-flight run finishes.
    pub fn run(&self, input: &[f32]) -> EngineResult<Vec<f32>> {
        let shape = match (self.is_ready(), self.shape()) {
            (true, Some(shape)) => shape,
            _ => return Err(EngineError::NotInitialized(self.name.clone())),
        };

        if input.len() != shape.input {
            return Err(EngineError::ShapeMismatch {
                expected: shape.input,
                actual: input.len(),
            });
        }

        let mut guard = self.lock_context();
        let ExecutionContext {
            backend,
            input: input_buf,
            output: output_buf,
        } = guard
            .as_mut()
            .ok_or_else(|| EngineError::NotInitialized(self.name.clone()))?;

        let start = Instant::now();

        input_buf.copy_from_slice(input);
        backend
            .invoke(&input_buf[..], &mut output_buf[..])
            .map_err(|e| EngineError::RuntimeExecutionFailure(format!("{:#}", e)))?;
        let output = output_buf.clone();

        let elapsed = start.elapsed();
        tracing::debug!(
            model = %self.name,
            elapsed_us = elapsed.as_micros() as u64,
            "Inference completed in {:?}",
            elapsed
        );

        Ok(output)
    }
}

impl Drop for ModelHandle {
    fn drop(&mut self) {
        tracing::debug!("Releasing model runtime: {}", self.name);
    }
}
