//! Configuration system for edgeai
//!
//! EdgeConfig groups the HTTP server, scheduler and preloaded model
//! settings. Files may be YAML or JSON; command-line flags override them.

mod scheduler;
mod server;

pub use scheduler::SchedulerConfig;
pub use server::ServerConfig;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A model to load at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntryConfig {
    /// Registry name
    pub name: String,
    /// Artifact path
    pub path: PathBuf,
}

impl ModelEntryConfig {
    /// Parse a `NAME=PATH` command-line value
    pub fn parse_assignment(value: &str) -> Result<Self> {
        let (name, path) = value
            .split_once('=')
            .ok_or_else(|| anyhow!("expected NAME=PATH, got '{}'", value))?;
        let (name, path) = (name.trim(), path.trim());
        if name.is_empty() || path.is_empty() {
            bail!("expected NAME=PATH, got '{}'", value);
        }
        Ok(Self {
            name: name.to_string(),
            path: PathBuf::from(path),
        })
    }
}

/// Edgeai configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Inference scheduler settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Models loaded at startup
    #[serde(default)]
    pub models: Vec<ModelEntryConfig>,
}

impl EdgeConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, picking the parser from the file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(path),
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            other => Err(anyhow!(
                "unsupported config format: {}",
                other.unwrap_or("<none>")
            )),
        }
        .with_context(|| format!("Failed to load config {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject duplicate model names and a zero queue capacity
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for entry in &self.models {
            if !seen.insert(entry.name.as_str()) {
                bail!("model '{}' listed more than once", entry.name);
            }
        }
        if self.scheduler.queue_capacity == Some(0) {
            bail!("scheduler.queue_capacity must be at least 1");
        }
        Ok(())
    }
}
