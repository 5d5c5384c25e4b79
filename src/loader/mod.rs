//! Model loading utilities
//!
//! This module loads model artifacts from disk:
//! - JSON dense models (`.json`)
//! - YAML dense models (`.yaml`, `.yml`)
//!
//! `FileLoader` is the backend loader the registry uses by default.

mod detect;

pub use detect::{detect_model_source, find_model_files, ModelFormat, ModelSource};

use std::path::Path;

use anyhow::{Context, Result};

use crate::engine::{BackendLoader, BoxedBackend};
use crate::model::{DenseConfig, DenseModel};

/// Read and validate a dense model configuration
///
/// This function auto-detects the format from the path.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<(DenseConfig, ModelSource)> {
    let source = detect_model_source(path)?;
    let content = std::fs::read_to_string(&source.path)
        .with_context(|| format!("Failed to read {}", source.path.display()))?;

    let config: DenseConfig = match source.format {
        ModelFormat::Json => serde_json::from_str(&content)?,
        ModelFormat::Yaml => serde_yaml::from_str(&content)?,
    };
    config
        .validate()
        .with_context(|| format!("Invalid model {}", source.path.display()))?;

    Ok((config, source))
}

/// Load a dense model from any supported format
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<DenseModel> {
    let (config, source) = load_config(path)?;
    let model = DenseModel::new(config)?;
    tracing::debug!(
        "Loaded {} model {} ({} -> {})",
        source.format.as_str(),
        source.path.display(),
        model.config().input_size,
        model.config().output_size
    );
    Ok(model)
}

/// Loads dense models from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl BackendLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<BoxedBackend> {
        Ok(Box::new(load_model(path)?))
    }
}
