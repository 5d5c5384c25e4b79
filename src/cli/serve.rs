//! HTTP server command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{EdgeConfig, ModelEntryConfig};
use crate::engine::{InferenceScheduler, ModelRegistry};
use crate::server::{self, AppState};

/// Start the inference server
pub async fn serve(
    config: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    models: Vec<String>,
) -> Result<()> {
    let mut config = match config {
        Some(path) => EdgeConfig::from_path(&path)?,
        None => EdgeConfig::default(),
    };

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    for value in &models {
        config.models.push(ModelEntryConfig::parse_assignment(value)?);
    }
    config.validate()?;

    let registry = Arc::new(ModelRegistry::new());

    for entry in &config.models {
        tracing::info!("Pre-loading model: {} ({})", entry.name, entry.path.display());
        registry
            .load(&entry.name, &entry.path)
            .await
            .with_context(|| format!("Failed to load model '{}'", entry.name))?;
    }
    tracing::info!("{} model(s) loaded", registry.len().await);

    let scheduler = Arc::new(InferenceScheduler::from_config(
        Arc::clone(&registry),
        &config.scheduler,
    ));
    if config.scheduler.autostart {
        scheduler.start().await?;
    }

    let state = Arc::new(AppState::new(registry, Arc::clone(&scheduler)));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        tracing::info!("Shutting down");
    };

    let result = server::start(state, config.server, shutdown).await;
    scheduler.stop().await?;
    result
}
