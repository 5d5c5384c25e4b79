//! Execution backend contract
//!
//! The numeric kernels are a black box to the engine. A backend is loaded
//! once from a path, declares its tensor sizes, and runs one forward pass
//! from an input buffer into an output buffer.

use std::path::Path;

use anyhow::Result;

/// A loaded model ready to execute
///
/// `invoke` takes `&mut self`: the handle owning the backend guarantees
/// only one call is in flight at a time.
pub trait ModelBackend: Send {
    /// Number of `f32` elements in the input tensor
    fn input_len(&self) -> usize;

    /// Number of `f32` elements in the output tensor
    fn output_len(&self) -> usize;

    /// Run one forward pass
    ///
    /// `input` has exactly `input_len()` elements and `output` exactly
    /// `output_len()`.
    fn invoke(&mut self, input: &[f32], output: &mut [f32]) -> Result<()>;

    /// Short human-readable description (format, activation, ...)
    fn describe(&self) -> String {
        format!("{} -> {}", self.input_len(), self.output_len())
    }
}

/// Boxed backend as stored by a model handle
pub type BoxedBackend = Box<dyn ModelBackend>;

/// Builds backends from artifact paths
pub trait BackendLoader: Send + Sync {
    /// Load the artifact at `path`
    fn load(&self, path: &Path) -> Result<BoxedBackend>;
}
