//! Scheduler configuration settings

use serde::{Deserialize, Serialize};

/// Inference scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of queued tasks; unbounded if absent.
    /// Enqueue beyond the bound fails immediately with `QueueFull`.
    #[serde(default)]
    pub queue_capacity: Option<usize>,

    /// Start the worker when the server starts
    #[serde(default = "default_true")]
    pub autostart: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: None,
            autostart: true,
        }
    }
}
