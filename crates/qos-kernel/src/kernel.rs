//! The execution kernel.

use qos_hal::{AmplitudeVector, Counts, HalResult, SimulationBackend};
use qos_ir::{CompiledCircuit, IrError, apply_noise_profile, qubit_range};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use crate::config::KernelConfig;
use crate::error::{KernelError, KernelResult};
use crate::pool::{LeaseId, Owner, QubitLease, QubitPool};
use crate::queue::{CancelSignal, TaskQueue};
use crate::task::{Task, TaskId, TaskInfo, TaskState};

/// Task queue plus qubit pool in front of a simulation backend.
///
/// All operations take `&self`; share a kernel between tasks with `Arc`.
/// Lock order is queue, then pool.
pub struct Kernel {
    backend: Arc<dyn SimulationBackend>,
    config: KernelConfig,
    queue: Mutex<TaskQueue>,
    pool: Mutex<QubitPool>,
}

impl Kernel {
    /// Create a kernel with the default configuration.
    pub fn new(backend: Arc<dyn SimulationBackend>) -> Self {
        Self::build(backend, KernelConfig::default())
    }

    /// Create a kernel with a validated configuration.
    pub fn with_config(
        backend: Arc<dyn SimulationBackend>,
        config: KernelConfig,
    ) -> KernelResult<Self> {
        config.validate()?;
        Ok(Self::build(backend, config))
    }

    fn build(backend: Arc<dyn SimulationBackend>, config: KernelConfig) -> Self {
        Self {
            queue: Mutex::new(TaskQueue::new(config.max_queue_depth)),
            pool: Mutex::new(QubitPool::new(config.pool_size)),
            backend,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Name of the backend tasks are dispatched to.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn queue(&self) -> MutexGuard<'_, TaskQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pool(&self) -> MutexGuard<'_, QubitPool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a task to the queue.
    ///
    /// The task's qubit source and circuit width are checked here, so a
    /// returned ID can be executed straight away.
    #[instrument(skip(self, task), fields(operations = task.circuit.len()))]
    pub fn submit_task(&self, task: Task) -> KernelResult<TaskId> {
        if let Some(duration) = task.layer_duration {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(IrError::InvalidNoise {
                    field: "layer_duration",
                    value: duration,
                }
                .into());
            }
        }

        let mut queue = self.queue();
        {
            let pool = self.pool();
            let width = if let Some(lease) = task.lease {
                pool.lease_width(lease)?
            } else if !task.qubits.is_empty() {
                pool.check_handles(&task.qubits)?;
                task.qubits.len()
            } else {
                if task.num_qubits.is_none() {
                    task.circuit.check_width(pool.size() as u32)?;
                }
                let n = task.num_qubits.unwrap_or_else(|| task.circuit.num_qubits()) as usize;
                if n > pool.size() {
                    return Err(KernelError::InsufficientResources {
                        requested: n,
                        available: pool.size(),
                    });
                }
                n
            };
            task.circuit.check_width(width as u32)?;
        }

        let id = queue.push(task)?;
        info!(%id, "task submitted");
        Ok(id)
    }

    /// Execute a queued task and return its final state vector.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn execute_task(&self, id: TaskId) -> KernelResult<AmplitudeVector> {
        let run = self.start(id)?;
        let result = self
            .dispatch(&run, self.backend.simulate(&run.circuit, run.width))
            .await;
        run.finish(&result);
        result
    }

    /// Execute a queued task and sample `shots` measurements.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn execute_task_sampled(&self, id: TaskId, shots: u32) -> KernelResult<Counts> {
        if shots == 0 {
            return Err(KernelError::InvalidShots(shots));
        }
        let run = self.start(id)?;
        let result = self
            .dispatch(&run, self.backend.run(&run.circuit, run.width, shots))
            .await;
        run.finish(&result);
        result
    }

    /// Move a task to `Executing`, acquire its qubits and build the circuit
    /// to dispatch.
    fn start(&self, id: TaskId) -> KernelResult<Running<'_>> {
        let mut queue = self.queue();
        let record = queue.get_mut(id)?;
        if record.state != TaskState::Queued {
            return Err(KernelError::TaskNotRunnable {
                id,
                state: record.state,
            });
        }
        let task = Arc::clone(&record.task);

        let acquired = {
            let mut pool = self.pool();
            let owner = Owner::Task(id);
            if let Some(lease) = task.lease {
                pool.transfer_lease(lease, id)
            } else if !task.qubits.is_empty() {
                pool.acquire_specific(&task.qubits, owner)
                    .map(|()| task.qubits.clone())
            } else {
                let n = task.num_qubits.unwrap_or_else(|| task.circuit.num_qubits());
                pool.acquire(n as usize, owner)
            }
        };
        let handles = match acquired {
            Ok(handles) => handles,
            Err(err) => {
                // A released lease or a malformed handle list never recovers;
                // busy qubits and an exhausted pool are transient.
                if matches!(
                    err,
                    KernelError::UnknownLease(_)
                        | KernelError::DuplicateHandle(_)
                        | KernelError::InvalidHandle(_)
                ) {
                    record.state = TaskState::Failed;
                    record.error = Some(err.to_string());
                }
                return Err(err);
            }
        };

        if let Err(err) = task.circuit.check_width(handles.len() as u32) {
            self.pool().release_owner(Owner::Task(id));
            record.state = TaskState::Failed;
            record.error = Some(err.to_string());
            return Err(err.into());
        }

        record.state = TaskState::Executing;
        record.assigned = handles.clone();
        let signal = Arc::clone(&record.signal);
        drop(queue);

        let width = handles.len() as u32;
        let circuit = match &task.noise {
            Some(profile) => apply_noise_profile(
                &task.circuit,
                profile,
                &qubit_range(width),
                task.layer_duration.unwrap_or(self.config.layer_duration),
            ),
            None => task.circuit.clone(),
        };
        debug!(%id, ?handles, operations = circuit.len(), "task executing");

        Ok(Running {
            kernel: self,
            id,
            circuit,
            width,
            signal,
            settled: false,
        })
    }

    /// Await a backend call under the dispatch timeout and the task's
    /// cancellation signal.
    async fn dispatch<T>(
        &self,
        run: &Running<'_>,
        call: impl Future<Output = HalResult<T>>,
    ) -> KernelResult<T> {
        let id = run.id;
        let bounded = async move {
            match self.config.dispatch_timeout() {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result.map_err(KernelError::from),
                    Err(_) => Err(KernelError::Timeout {
                        id,
                        limit_ms: limit.as_millis() as u64,
                    }),
                },
                None => call.await.map_err(KernelError::from),
            }
        };

        tokio::select! {
            biased;
            () = run.signal.cancelled() => Err(KernelError::Cancelled(id)),
            result = bounded => result,
        }
    }

    /// Lease `count` free qubits to the caller.
    ///
    /// Fails without touching the pool if fewer than `count` are free.
    pub fn allocate_qubits(&self, count: usize) -> KernelResult<QubitLease> {
        let lease = self.pool().lease(count)?;
        debug!(lease = %lease.id, handles = ?lease.handles, "qubits allocated");
        Ok(lease)
    }

    /// Return a lease's qubits to the pool.
    pub fn release_qubits(&self, lease: LeaseId) -> KernelResult<()> {
        let handles = self.pool().release_lease(lease)?;
        debug!(%lease, freed = handles.len(), "qubits released");
        Ok(())
    }

    /// Cancel a task.
    ///
    /// A queued task becomes `Cancelled` immediately and its lease, if any,
    /// is released. An executing task is interrupted at its dispatch await.
    pub fn cancel_task(&self, id: TaskId) -> KernelResult<()> {
        let mut queue = self.queue();
        let record = queue.get_mut(id)?;
        match record.state {
            TaskState::Queued => {
                record.state = TaskState::Cancelled;
                record.error = Some(KernelError::Cancelled(id).to_string());
                record.signal.cancel();
                if let Some(lease) = record.task.lease {
                    self.pool().release_lease(lease).ok();
                }
                info!(%id, "queued task cancelled");
                Ok(())
            }
            TaskState::Executing => {
                record.signal.cancel();
                info!(%id, "cancellation requested");
                Ok(())
            }
            state => Err(KernelError::TaskNotRunnable { id, state }),
        }
    }

    /// Current state of a task.
    pub fn task_status(&self, id: TaskId) -> KernelResult<TaskState> {
        Ok(self.queue().get(id)?.state)
    }

    pub fn task_info(&self, id: TaskId) -> KernelResult<TaskInfo> {
        Ok(self.queue().get(id)?.info(id))
    }

    /// Queued tasks, highest priority first.
    pub fn pending_tasks(&self) -> Vec<TaskId> {
        self.queue().pending()
    }

    /// Number of tasks ever submitted.
    pub fn queue_len(&self) -> usize {
        self.queue().len()
    }

    pub fn pool_size(&self) -> usize {
        self.pool().size()
    }

    pub fn free_qubits(&self) -> usize {
        self.pool().free_count()
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A task between `start` and its final state.
///
/// Dropping it without `finish` (for example when the caller's future is
/// dropped) records the task as cancelled. Either way its qubits go back to
/// the pool.
struct Running<'k> {
    kernel: &'k Kernel,
    id: TaskId,
    circuit: CompiledCircuit,
    width: u32,
    signal: Arc<CancelSignal>,
    settled: bool,
}

impl Running<'_> {
    fn finish<T>(mut self, result: &KernelResult<T>) {
        match result {
            Ok(_) => {
                info!(id = %self.id, "task completed");
                self.settle(TaskState::Completed, None);
            }
            Err(err @ KernelError::Cancelled(_)) => {
                info!(id = %self.id, "task cancelled");
                self.settle(TaskState::Cancelled, Some(err.to_string()));
            }
            Err(err) => {
                warn!(id = %self.id, error = %err, "task failed");
                self.settle(TaskState::Failed, Some(err.to_string()));
            }
        }
    }

    fn settle(&mut self, state: TaskState, error: Option<String>) {
        self.settled = true;
        let mut queue = self.kernel.queue();
        if let Ok(record) = queue.get_mut(self.id) {
            record.state = state;
            record.error = error;
            record.assigned.clear();
        }
        let freed = self.kernel.pool().release_owner(Owner::Task(self.id));
        debug!(id = %self.id, freed, "task qubits released");
    }
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.settle(
                TaskState::Cancelled,
                Some(KernelError::Cancelled(self.id).to_string()),
            );
        }
    }
}
