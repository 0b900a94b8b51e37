//! QOS Execution Kernel
//!
//! The kernel owns the task queue and the qubit pool, and drives tasks
//! through a [`qos_hal::SimulationBackend`]:
//!
//! ```text
//! Task ──submit_task──▶ Queued ──execute_task──▶ Executing ──▶ Completed
//!                         │                          ├───────▶ Failed
//!                         └──────cancel_task─────────┴───────▶ Cancelled
//! ```
//!
//! Executing a task acquires its qubits (from a lease, explicit handles, or
//! the lowest free handles), appends the task's noise snapshot through
//! [`qos_ir::apply_noise_profile`], dispatches once to the backend and
//! returns the qubits to the pool however the dispatch ends.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qos_adapter_sim::StatevectorBackend;
//! use qos_ir::{CompiledCircuit, GateSpec, Operation, QubitId};
//! use qos_kernel::{Kernel, Task};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let kernel = Kernel::new(Arc::new(StatevectorBackend::new()));
//!
//! let mut circuit = CompiledCircuit::new();
//! circuit.push(Operation::gate(GateSpec::H, [QubitId(0)])?);
//! circuit.push(Operation::gate(GateSpec::CNOT, [QubitId(0), QubitId(1)])?);
//!
//! let id = kernel.submit_task(Task::new(circuit))?;
//! let state = kernel.execute_task(id).await?;
//! assert_eq!(state.len(), 4);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod kernel;
pub mod pool;
mod queue;
pub mod task;

pub use config::{DEFAULT_POOL_SIZE, KernelConfig};
pub use error::{ErrorCategory, KernelError, KernelResult};
pub use kernel::Kernel;
pub use pool::{LeaseId, QubitHandle, QubitLease};
pub use task::{Task, TaskId, TaskInfo, TaskState};
