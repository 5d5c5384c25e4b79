//! Model registry
//!
//! Maps model names to exclusively owned handles. Handles are never handed
//! out; callers go through `run`, `snapshot` and `describe`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use super::backend::BackendLoader;
use super::error::{EngineError, EngineResult};
use super::handle::{HandleState, ModelHandle};
use crate::loader::FileLoader;

/// Readiness of one registered model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub name: String,
    pub ready: bool,
}

/// Detailed information about a registered model
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub path: PathBuf,
    pub state: HandleState,
    pub ready: bool,
    pub input_size: Option<usize>,
    pub output_size: Option<usize>,
}

impl ModelInfo {
    fn from_handle(handle: &ModelHandle) -> Self {
        Self {
            name: handle.name().to_string(),
            path: handle.path().to_path_buf(),
            state: handle.state(),
            ready: handle.is_ready(),
            input_size: handle.input_size(),
            output_size: handle.output_size(),
        }
    }
}

/// Registry of loaded models
///
/// Loading a name that is already present is rejected with
/// `DuplicateName`; `unload` first to replace a model.
pub struct ModelRegistry {
    /// Ready models by name
    models: RwLock<HashMap<String, Arc<ModelHandle>>>,
    /// Builds backends from artifact paths
    loader: Arc<dyn BackendLoader>,
}

impl ModelRegistry {
    /// Create a registry that loads dense model artifacts from disk
    pub fn new() -> Self {
        Self::with_loader(Arc::new(FileLoader))
    }

    /// Create a registry with a custom backend loader
    pub fn with_loader(loader: Arc<dyn BackendLoader>) -> Self {
        Self {
            models: RwLock::new(HashMap::new()),
            loader,
        }
    }

    /// Load and initialize a model under `name`
    ///
    /// Initialization runs outside the map lock; the entry only becomes
    /// visible once it is ready.
    pub async fn load(&self, name: &str, path: impl AsRef<Path>) -> EngineResult<()> {
        if self.models.read().await.contains_key(name) {
            return Err(EngineError::DuplicateName(name.to_string()));
        }

        let path = path.as_ref().to_path_buf();
        let handle = ModelHandle::new(name, path.clone());
        let loader = Arc::clone(&self.loader);

        let handle = tokio::task::spawn_blocking(move || {
            handle.initialize(loader.as_ref())?;
            Ok::<_, EngineError>(handle)
        })
        .await
        .map_err(|e| EngineError::init(&path, format!("loader task failed: {}", e)))??;

        let mut models = self.models.write().await;
        if models.contains_key(name) {
            return Err(EngineError::DuplicateName(name.to_string()));
        }
        models.insert(name.to_string(), Arc::new(handle));

        tracing::info!("Model loaded: {} ({})", name, path.display());
        Ok(())
    }

    /// Remove a model
    ///
    /// The runtime is released once any in-flight inference on it returns.
    pub async fn unload(&self, name: &str) -> EngineResult<()> {
        let mut models = self.models.write().await;
        match models.remove(name) {
            Some(_) => {
                tracing::info!("Model unloaded: {}", name);
                Ok(())
            }
            None => Err(EngineError::ModelNotFound(name.to_string())),
        }
    }

    /// Run inference on the named model
    ///
    /// The map lock is released before execution so different models run
    /// in parallel. Errors from the handle are returned unchanged.
    pub async fn run(&self, name: &str, input: Vec<f32>) -> EngineResult<Vec<f32>> {
        let handle = self
            .models
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::ModelNotFound(name.to_string()))?;

        tokio::task::spawn_blocking(move || handle.run(&input))
            .await
            .map_err(|e| {
                EngineError::RuntimeExecutionFailure(format!("inference task failed: {}", e))
            })?
    }

    /// Readiness of every model, sorted by name
    pub async fn snapshot(&self) -> Vec<ModelStatus> {
        let models = self.models.read().await;
        let mut statuses: Vec<ModelStatus> = models
            .iter()
            .map(|(name, handle)| ModelStatus {
                name: name.clone(),
                ready: handle.is_ready(),
            })
            .collect();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        statuses
    }

    /// Detailed information about every model, sorted by name
    pub async fn list(&self) -> Vec<ModelInfo> {
        let models = self.models.read().await;
        let mut infos: Vec<ModelInfo> = models
            .values()
            .map(|handle| ModelInfo::from_handle(handle))
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Detailed information about one model
    pub async fn describe(&self, name: &str) -> Option<ModelInfo> {
        let models = self.models.read().await;
        models
            .get(name)
            .map(|handle| ModelInfo::from_handle(handle))
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.models.read().await.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        self.models.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.models.read().await.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
