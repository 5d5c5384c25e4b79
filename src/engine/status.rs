//! Status reporting
//!
//! Point-in-time, read-only view of the registry and the scheduler.

use std::sync::Arc;

use serde::Serialize;

use super::registry::{ModelRegistry, ModelStatus};
use super::scheduler::InferenceScheduler;

/// Aggregate status, recomputed on every query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub running: bool,
    pub model_count: usize,
    pub queue_depth: usize,
    pub models: Vec<ModelStatus>,
    pub completed: u64,
    pub failed: u64,
}

/// Builds status snapshots for external observers
#[derive(Clone)]
pub struct StatusReporter {
    registry: Arc<ModelRegistry>,
    scheduler: Arc<InferenceScheduler>,
}

impl StatusReporter {
    pub fn new(registry: Arc<ModelRegistry>, scheduler: Arc<InferenceScheduler>) -> Self {
        Self {
            registry,
            scheduler,
        }
    }

    /// Take a snapshot; reads only
    pub async fn report(&self) -> StatusSnapshot {
        let models = self.registry.snapshot().await;
        let stats = self.scheduler.stats();

        StatusSnapshot {
            running: self.scheduler.is_running(),
            model_count: models.len(),
            queue_depth: self.scheduler.queue_depth(),
            models,
            completed: stats.completed,
            failed: stats.failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::StubLoader;

    async fn setup() -> (Arc<ModelRegistry>, Arc<InferenceScheduler>, StatusReporter) {
        let registry = Arc::new(ModelRegistry::with_loader(Arc::new(StubLoader)));
        registry.load("m1", "identity-4x2").await.unwrap();
        let scheduler = Arc::new(InferenceScheduler::new(Arc::clone(&registry)));
        let reporter = StatusReporter::new(Arc::clone(&registry), Arc::clone(&scheduler));
        (registry, scheduler, reporter)
    }

    #[tokio::test]
    async fn test_end_to_end_drain() {
        let (_registry, scheduler, reporter) = setup().await;

        let (_, rx) = scheduler.submit("m1", vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let before = reporter.report().await;
        assert!(!before.running);
        assert_eq!(before.queue_depth, 1);

        scheduler.start().await.unwrap();
        assert_eq!(rx.await.unwrap().unwrap(), vec![1.0, 2.0]);

        let status = reporter.report().await;
        assert!(status.running);
        assert_eq!(status.queue_depth, 0);
        assert_eq!(status.model_count, 1);
        assert_eq!(
            status.models,
            vec![ModelStatus {
                name: "m1".to_string(),
                ready: true
            }]
        );
        assert_eq!(status.completed, 1);

        scheduler.stop().await.unwrap();
        assert!(!reporter.report().await.running);
    }

    #[tokio::test]
    async fn test_failed_run_leaves_status_unchanged() {
        let (registry, _scheduler, reporter) = setup().await;
        let before = reporter.report().await;

        let err = registry.run("m1", vec![1.0, 2.0, 3.0]).await.unwrap_err();
        assert_eq!(err.kind(), "shape_mismatch");

        assert_eq!(reporter.report().await, before);
    }

    #[tokio::test]
    async fn test_snapshot_json_shape() {
        let (_registry, _scheduler, reporter) = setup().await;
        let json = serde_json::to_value(reporter.report().await).unwrap();

        assert_eq!(json["running"], false);
        assert_eq!(json["model_count"], 1);
        assert_eq!(json["queue_depth"], 0);
        assert_eq!(json["models"][0]["name"], "m1");
        assert_eq!(json["models"][0]["ready"], true);
    }
}
