//! Append-only task queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

use crate::error::{KernelError, KernelResult};
use crate::pool::QubitHandle;
use crate::task::{Task, TaskId, TaskInfo, TaskState};

/// Per-task cancellation signal.
#[derive(Debug, Default)]
pub(crate) struct CancelSignal {
    notify: Notify,
    cancelled: AtomicBool,
}

impl CancelSignal {
    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once `cancel` has been called.
    pub(crate) async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel is not missed.
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

#[derive(Debug)]
pub(crate) struct TaskRecord {
    pub(crate) task: Arc<Task>,
    pub(crate) state: TaskState,
    pub(crate) signal: Arc<CancelSignal>,
    pub(crate) assigned: Vec<QubitHandle>,
    pub(crate) error: Option<String>,
}

impl TaskRecord {
    fn new(task: Task) -> Self {
        Self {
            task: Arc::new(task),
            state: TaskState::Queued,
            signal: Arc::new(CancelSignal::default()),
            assigned: Vec::new(),
            error: None,
        }
    }

    pub(crate) fn info(&self, id: TaskId) -> TaskInfo {
        TaskInfo {
            id,
            state: self.state,
            priority: self.task.priority,
            num_operations: self.task.circuit.len(),
            noisy: self.task.noise.is_some_and(|n| !n.is_empty()),
            qubits: self.assigned.clone(),
            error: self.error.clone(),
        }
    }
}

/// Task records indexed by [`TaskId`].
///
/// Records are never removed, so a task's ID is its position.
#[derive(Debug)]
pub(crate) struct TaskQueue {
    records: Vec<TaskRecord>,
    max_depth: Option<usize>,
}

impl TaskQueue {
    pub(crate) fn new(max_depth: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            max_depth,
        }
    }

    /// Number of tasks that are queued or executing.
    pub(crate) fn active(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.state.is_terminal())
            .count()
    }

    pub(crate) fn push(&mut self, task: Task) -> KernelResult<TaskId> {
        match self.max_depth {
            Some(depth) if self.active() >= depth => {
                return Err(KernelError::Backpressure { depth });
            }
            _ => {}
        }
        let id = TaskId(self.records.len());
        self.records.push(TaskRecord::new(task));
        Ok(id)
    }

    pub(crate) fn get(&self, id: TaskId) -> KernelResult<&TaskRecord> {
        let len = self.records.len();
        self.records
            .get(id.0)
            .ok_or(KernelError::InvalidTaskId { id, len })
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> KernelResult<&mut TaskRecord> {
        let len = self.records.len();
        self.records
            .get_mut(id.0)
            .ok_or(KernelError::InvalidTaskId { id, len })
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Queued task IDs, highest priority first, FIFO within a priority.
    pub(crate) fn pending(&self) -> Vec<TaskId> {
        let mut pending: Vec<(i32, TaskId)> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.state == TaskState::Queued)
            .map(|(i, r)| (r.task.priority, TaskId(i)))
            .collect();
        pending.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        pending.into_iter().map(|(_, id)| id).collect()
    }
}
