//! Inference scheduler
//!
//! Decouples submission from execution. Producers append tasks to a FIFO
//! queue; exactly one worker drains it against the model registry.
//!
//! Lifecycle is one-shot: `Idle -> Running -> Stopped`. Failed tasks are
//! logged and discarded, never retried.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use super::error::{EngineError, EngineResult};
use super::queue::{InferenceTask, QueuedTask, ReplyReceiver, ReplySender, TaskId, TaskQueue};
use super::registry::ModelRegistry;
use crate::config::SchedulerConfig;

/// Scheduler lifecycle state
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Idle = 0,
    Running = 1,
    Stopped = 2,
}

impl SchedulerState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SchedulerState::Running,
            2 => SchedulerState::Stopped,
            _ => SchedulerState::Idle,
        }
    }
}

/// Outcome counters of processed tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub completed: u64,
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Single-worker inference scheduler
pub struct InferenceScheduler {
    /// Models tasks are dispatched to
    registry: Arc<ModelRegistry>,
    /// Pending tasks
    queue: Arc<TaskQueue>,
    /// Completed / failed task counts
    counters: Arc<Counters>,
    /// Lifecycle state, readable without locking
    state: AtomicU8,
    /// Worker handle; held across start/stop so transitions are serialized
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl InferenceScheduler {
    /// Create a scheduler with an unbounded queue
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self::with_capacity(registry, None)
    }

    /// Create a scheduler whose queue rejects tasks beyond `capacity`
    pub fn with_capacity(registry: Arc<ModelRegistry>, capacity: Option<usize>) -> Self {
        Self {
            registry,
            queue: Arc::new(TaskQueue::new(capacity)),
            counters: Arc::new(Counters::default()),
            state: AtomicU8::new(SchedulerState::Idle as u8),
            worker: Mutex::new(None),
        }
    }

    /// Create a scheduler from configuration
    pub fn from_config(registry: Arc<ModelRegistry>, config: &SchedulerConfig) -> Self {
        Self::with_capacity(registry, config.queue_capacity)
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Number of tasks waiting (not counting the one in flight)
    pub fn queue_depth(&self) -> usize {
        self.queue.len()
    }

    /// Queue capacity bound, if any
    pub fn capacity(&self) -> Option<usize> {
        self.queue.capacity()
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Queue a task without a reply channel
    ///
    /// The outcome is only logged. Never blocks on execution.
    pub fn enqueue(&self, model: impl Into<String>, input: Vec<f32>) -> EngineResult<TaskId> {
        self.push(InferenceTask::new(model, input), None)
    }

    /// Queue a task and get a receiver for its outcome
    pub fn submit(
        &self,
        model: impl Into<String>,
        input: Vec<f32>,
    ) -> EngineResult<(TaskId, ReplyReceiver)> {
        let (tx, rx) = oneshot::channel();
        let id = self.push(InferenceTask::new(model, input), Some(tx))?;
        Ok((id, rx))
    }

    fn push(&self, task: InferenceTask, reply: Option<ReplySender>) -> EngineResult<TaskId> {
        if self.state() == SchedulerState::Stopped {
            return Err(EngineError::SchedulerStopped);
        }

        let id = task.id;
        tracing::debug!(task = %id, model = %task.model, "Queueing inference");
        self.queue.push(QueuedTask { task, reply })?;
        Ok(id)
    }

    /// Spawn the worker
    ///
    /// Only valid from `Idle`.
    pub async fn start(&self) -> EngineResult<()> {
        let mut worker = self.worker.lock().await;

        self.state
            .compare_exchange(
                SchedulerState::Idle as u8,
                SchedulerState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|current| {
                EngineError::InvalidState(format!(
                    "cannot start a scheduler that is {:?}",
                    SchedulerState::from_u8(current)
                ))
            })?;

        *worker = Some(tokio::spawn(worker_loop(
            Arc::clone(&self.registry),
            Arc::clone(&self.queue),
            Arc::clone(&self.counters),
        )));

        tracing::info!("Inference scheduler started");
        Ok(())
    }

    /// Stop the worker and wait for it to exit
    ///
    /// The in-flight task completes; queued tasks are left in place.
    pub async fn stop(&self) -> EngineResult<()> {
        let mut worker = self.worker.lock().await;

        let previous = SchedulerState::from_u8(
            self.state
                .swap(SchedulerState::Stopped as u8, Ordering::AcqRel),
        );
        self.queue.close();

        let joined = match worker.take() {
            Some(handle) => handle.await.map_err(|e| {
                EngineError::RuntimeExecutionFailure(format!("inference worker failed: {}", e))
            }),
            None => Ok(()),
        };

        // Tasks left behind will never run; resolve their submitters now
        for reply in self.queue.take_replies() {
            let _ = reply.send(Err(EngineError::SchedulerStopped));
        }
        joined?;

        if previous != SchedulerState::Stopped {
            tracing::info!(
                "Inference scheduler stopped ({} tasks left in queue)",
                self.queue.len()
            );
        }
        Ok(())
    }
}

impl Drop for InferenceScheduler {
    fn drop(&mut self) {
        // Lets a still-running worker exit after its current task
        self.queue.close();
    }
}

async fn worker_loop(registry: Arc<ModelRegistry>, queue: Arc<TaskQueue>, counters: Arc<Counters>) {
    tracing::debug!("Inference worker running");

    while let Some(QueuedTask { task, reply }) = queue.next().await {
        let waited = task.enqueued_at.elapsed();
        let start = Instant::now();
        let result = registry.run(&task.model, task.input).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(output) => {
                counters.completed.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    task = %task.id,
                    model = %task.model,
                    elapsed_us = elapsed.as_micros() as u64,
                    queued_us = waited.as_micros() as u64,
                    output_len = output.len(),
                    "Queued inference completed for {} in {:?}",
                    task.model,
                    elapsed
                );
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    task = %task.id,
                    model = %task.model,
                    kind = e.kind(),
                    elapsed_us = elapsed.as_micros() as u64,
                    "Queued inference failed for {}: {}",
                    task.model,
                    e
                );
            }
        }

        if let Some(reply) = reply {
            // Submitter may have gone away
            let _ = reply.send(result);
        }
    }

    tracing::debug!("Inference worker exiting");
}
