//! FIFO inference queue
//!
//! Shared by any number of producers and the single scheduler worker.
//! Pushes take the lock only for the append and never wait on execution;
//! the worker suspends on a `Notify` until a task arrives or the queue is
//! closed.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, Notify};
use uuid::Uuid;

use super::error::{EngineError, EngineResult};

/// Correlation id assigned to every queued task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One pending inference
#[derive(Debug, Clone)]
pub struct InferenceTask {
    pub id: TaskId,
    pub model: String,
    pub input: Vec<f32>,
    pub enqueued_at: Instant,
}

impl InferenceTask {
    pub fn new(model: impl Into<String>, input: Vec<f32>) -> Self {
        Self {
            id: TaskId::new(),
            model: model.into(),
            input,
            enqueued_at: Instant::now(),
        }
    }
}

/// Channel the worker uses to hand a result back to the submitter
pub type ReplySender = oneshot::Sender<EngineResult<Vec<f32>>>;

/// Receiving side of a task's reply channel
pub type ReplyReceiver = oneshot::Receiver<EngineResult<Vec<f32>>>;

/// A task plus its optional reply channel
pub(crate) struct QueuedTask {
    pub task: InferenceTask,
    pub reply: Option<ReplySender>,
}

pub(crate) struct TaskQueue {
    tasks: Mutex<VecDeque<QueuedTask>>,
    notify: Notify,
    closed: AtomicBool,
    capacity: Option<usize>,
}

impl TaskQueue {
    /// `capacity: None` means unbounded
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
            capacity,
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append to the tail
    pub fn push(&self, queued: QueuedTask) -> EngineResult<()> {
        {
            let mut tasks = self.lock();
            if self.is_closed() {
                return Err(EngineError::SchedulerStopped);
            }
            if let Some(capacity) = self.capacity {
                if tasks.len() >= capacity {
                    return Err(EngineError::QueueFull { capacity });
                }
            }
            tasks.push_back(queued);
        }
        self.notify.notify_one();
        Ok(())
    }

    /// Pop the head without waiting
    pub fn try_pop(&self) -> Option<QueuedTask> {
        self.lock().pop_front()
    }

    /// Wait for the next task
    ///
    /// Returns `None` once the queue is closed, even if tasks remain.
    pub async fn next(&self) -> Option<QueuedTask> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a push or close in between is not missed
            notified.as_mut().enable();

            if self.is_closed() {
                return None;
            }
            if let Some(queued) = self.try_pop() {
                return Some(queued);
            }

            notified.await;
        }
    }

    /// Stop handing out tasks and wake the consumer
    pub fn close(&self) {
        {
            let _tasks = self.lock();
            self.closed.store(true, Ordering::Release);
        }
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Detach the reply channels of every pending task
    ///
    /// The tasks stay queued; only their reply senders are taken.
    pub fn take_replies(&self) -> Vec<ReplySender> {
        self.lock()
            .iter_mut()
            .filter_map(|queued| queued.reply.take())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<QueuedTask>> {
        // The critical sections never panic; recover the data if one did
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn task(model: &str, value: f32) -> QueuedTask {
        QueuedTask {
            task: InferenceTask::new(model, vec![value]),
            reply: None,
        }
    }

    #[test]
    fn test_fifo_order() {
        let queue = TaskQueue::new(None);
        for i in 0..5 {
            queue.push(task("m", i as f32)).unwrap();
        }
        assert_eq!(queue.len(), 5);

        let drained: Vec<f32> = std::iter::from_fn(|| queue.try_pop())
            .map(|q| q.task.input[0])
            .collect();
        assert_eq!(drained, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_capacity_bound() {
        let queue = TaskQueue::new(Some(2));
        queue.push(task("m", 0.0)).unwrap();
        queue.push(task("m", 1.0)).unwrap();

        let err = queue.push(task("m", 2.0)).unwrap_err();
        assert!(matches!(err, EngineError::QueueFull { capacity: 2 }));
        assert_eq!(queue.len(), 2);

        queue.try_pop().unwrap();
        queue.push(task("m", 3.0)).unwrap();
    }

    #[test]
    fn test_closed_queue_rejects_push() {
        let queue = TaskQueue::new(None);
        queue.push(task("m", 0.0)).unwrap();
        queue.close();

        assert!(matches!(
            queue.push(task("m", 1.0)),
            Err(EngineError::SchedulerStopped)
        ));
        // Pending tasks are kept, not dropped
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_take_replies_keeps_tasks() {
        let queue = TaskQueue::new(None);
        let (tx, _rx) = oneshot::channel();
        queue
            .push(QueuedTask {
                task: InferenceTask::new("m", vec![1.0]),
                reply: Some(tx),
            })
            .unwrap();
        queue.push(task("m", 2.0)).unwrap();

        assert_eq!(queue.take_replies().len(), 1);
        assert!(queue.take_replies().is_empty());
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn test_next_wakes_on_push() {
        let queue = Arc::new(TaskQueue::new(None));

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.next().await.map(|q| q.task.input[0]) })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        queue.push(task("m", 7.0)).unwrap();

        assert_eq!(consumer.await.unwrap(), Some(7.0));
    }

    #[tokio::test]
    async fn test_next_returns_none_after_close() {
        let queue = Arc::new(TaskQueue::new(None));

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.next().await.is_none() })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        queue.close();

        assert!(consumer.await.unwrap());
    }

    #[test]
    fn test_concurrent_producers_keep_per_producer_order() {
        let queue = Arc::new(TaskQueue::new(None));
        let producers = 4;
        let per_producer = 250;

        let handles: Vec<_> = (0..producers)
            .map(|p| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for i in 0..per_producer {
                        queue.push(task(&format!("p{}", p), i as f32)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(queue.len(), producers * per_producer);

        let mut last_seen = vec![-1.0f32; producers];
        let mut count = 0;
        while let Some(q) = queue.try_pop() {
            let p: usize = q.task.model[1..].parse().unwrap();
            assert!(q.task.input[0] > last_seen[p]);
            last_seen[p] = q.task.input[0];
            count += 1;
        }
        assert_eq!(count, producers * per_producer);
        assert!(last_seen.iter().all(|&v| v == (per_producer - 1) as f32));
    }
}
