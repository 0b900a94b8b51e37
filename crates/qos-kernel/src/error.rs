//! Error handling for the execution kernel.

use qos_hal::HalError;
use qos_ir::IrError;
use thiserror::Error;

use crate::pool::{LeaseId, QubitHandle};
use crate::task::{TaskId, TaskState};

/// Result type for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;

/// Broad error classes, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself is malformed.
    Validation,
    /// A task, lease or qubit could not be found or obtained.
    Resource,
    /// The simulation backend failed.
    Backend,
    /// Kernel configuration is invalid.
    Config,
}

/// Errors that can occur during kernel operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum KernelError {
    /// Circuit or instruction is invalid.
    #[error("Validation error: {0}")]
    Validation(#[from] IrError),

    /// Shot count is invalid.
    #[error("Invalid shots: {0}")]
    InvalidShots(u32),

    /// Task ID was never issued.
    #[error("Invalid task ID {id} (queue length {len})")]
    InvalidTaskId { id: TaskId, len: usize },

    /// Task is not in a state that allows the operation.
    #[error("Task {id} is {state}")]
    TaskNotRunnable { id: TaskId, state: TaskState },

    /// Not enough free qubits in the pool.
    #[error("Insufficient resources: requested {requested} qubits, {available} available")]
    InsufficientResources { requested: usize, available: usize },

    /// Qubit handle is owned by someone else.
    #[error("Qubit {0} is busy")]
    QubitBusy(QubitHandle),

    /// Qubit handle appears twice in one task.
    #[error("Qubit {0} is listed more than once")]
    DuplicateHandle(QubitHandle),

    /// Qubit handle is outside the pool.
    #[error("Qubit {0} is not part of the pool")]
    InvalidHandle(QubitHandle),

    /// Lease does not exist or was already released.
    #[error("Unknown lease: {0}")]
    UnknownLease(LeaseId),

    /// Queue has reached its configured depth.
    #[error("Queue full: {depth} active tasks")]
    Backpressure { depth: usize },

    /// Backend failed while executing a task.
    #[error("Backend execution failed: {0}")]
    BackendExecution(#[from] HalError),

    /// Dispatch did not finish in time.
    #[error("Task {id} timed out after {limit_ms} ms")]
    Timeout { id: TaskId, limit_ms: u64 },

    /// Task was cancelled.
    #[error("Task {0} cancelled")]
    Cancelled(TaskId),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KernelError {
    /// The broad class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            KernelError::Validation(_)
            | KernelError::InvalidShots(_)
            | KernelError::DuplicateHandle(_) => ErrorCategory::Validation,
            KernelError::InvalidTaskId { .. }
            | KernelError::TaskNotRunnable { .. }
            | KernelError::InsufficientResources { .. }
            | KernelError::QubitBusy(_)
            | KernelError::InvalidHandle(_)
            | KernelError::UnknownLease(_)
            | KernelError::Backpressure { .. }
            | KernelError::Cancelled(_) => ErrorCategory::Resource,
            KernelError::BackendExecution(_) | KernelError::Timeout { .. } => {
                ErrorCategory::Backend
            }
            KernelError::Config(_) => ErrorCategory::Config,
        }
    }
}
