//! Tasks and their lifecycle.

use qos_device::VirtualDevice;
use qos_ir::{CompiledCircuit, NoiseProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pool::{LeaseId, QubitHandle, QubitLease};

/// Position of a task in the queue.
///
/// IDs are dense, zero-based and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub usize);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Queued,
    Executing,
    Completed,
    Failed,
    Cancelled,
}

impl TaskState {
    /// Check if the state is final.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Cancelled
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Queued => "queued",
            TaskState::Executing => "executing",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A unit of work for the kernel.
///
/// Qubits come from one of three places, in order of precedence: a lease
/// (`on_lease`), explicit handles (`with_qubits`), or auto-allocation at
/// execution time.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub(crate) circuit: CompiledCircuit,
    pub(crate) qubits: Vec<QubitHandle>,
    pub(crate) num_qubits: Option<u32>,
    pub(crate) priority: i32,
    pub(crate) noise: Option<NoiseProfile>,
    pub(crate) layer_duration: Option<f64>,
    pub(crate) lease: Option<LeaseId>,
}

impl Task {
    /// Create a noiseless task with auto-allocated qubits.
    pub fn new(circuit: CompiledCircuit) -> Self {
        Self {
            circuit,
            qubits: Vec::new(),
            num_qubits: None,
            priority: 0,
            noise: None,
            layer_duration: None,
            lease: None,
        }
    }

    /// Create a task that runs on the handles of `lease`.
    ///
    /// The handles return to the pool when the task finishes.
    pub fn on_lease(circuit: CompiledCircuit, lease: &QubitLease) -> Self {
        Self {
            lease: Some(lease.id),
            ..Self::new(circuit)
        }
    }

    /// Create a task sized to `device` with a snapshot of its noise profile
    /// and layer duration.
    pub fn for_device(circuit: CompiledCircuit, device: &VirtualDevice) -> Self {
        let noise = device.noise();
        let task = Self::new(circuit).with_num_qubits(device.num_qubits());
        if noise.is_empty() {
            task
        } else {
            task.with_noise(*noise)
                .with_layer_duration(device.layer_duration())
        }
    }

    /// Run on these exact handles.
    pub fn with_qubits(mut self, qubits: Vec<QubitHandle>) -> Self {
        self.qubits = qubits;
        self
    }

    /// Auto-allocate this many handles instead of the circuit width.
    pub fn with_num_qubits(mut self, n: u32) -> Self {
        self.num_qubits = Some(n);
        self
    }

    /// Set the priority (higher runs first in [`crate::Kernel::pending_tasks`]).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Attach a noise profile.
    pub fn with_noise(mut self, noise: NoiseProfile) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Span noise layers over `duration` instead of the kernel's configured
    /// layer duration.
    pub fn with_layer_duration(mut self, duration: f64) -> Self {
        self.layer_duration = Some(duration);
        self
    }

    pub fn circuit(&self) -> &CompiledCircuit {
        &self.circuit
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn noise(&self) -> Option<&NoiseProfile> {
        self.noise.as_ref()
    }

    pub fn lease(&self) -> Option<LeaseId> {
        self.lease
    }
}

/// Snapshot of a task's bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: TaskId,
    pub state: TaskState,
    pub priority: i32,
    pub num_operations: usize,
    pub noisy: bool,
    /// Handles held while executing.
    pub qubits: Vec<QubitHandle>,
    /// Failure message for failed or cancelled tasks.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use qos_device::DeviceKind;
    use qos_ir::{GateSpec, Operation, QubitId};

    fn x_circuit() -> CompiledCircuit {
        CompiledCircuit::from_operations(vec![
            Operation::gate(GateSpec::X, [QubitId(0)]).unwrap(),
        ])
    }

    #[test]
    fn test_task_defaults() {
        let task = Task::new(x_circuit());
        assert_eq!(task.priority(), 0);
        assert!(task.noise().is_none());
        assert!(task.lease().is_none());
    }

    #[test]
    fn test_for_device_snapshots_noise() {
        let mut device = VirtualDevice::new("dev", DeviceKind::GateBased, 3).unwrap();
        device.set_noise_model(Some(50.0), None, None).unwrap();

        device.set_layer_duration(0.25).unwrap();

        let task = Task::for_device(x_circuit(), &device);
        device.set_noise_model(Some(5.0), Some(2.0), None).unwrap();
        device.set_layer_duration(4.0).unwrap();

        assert_eq!(task.num_qubits, Some(3));
        assert_eq!(task.layer_duration, Some(0.25));
        assert_eq!(task.noise().unwrap().t1(), Some(50.0));
        assert_eq!(task.noise().unwrap().t2(), None);
    }

    #[test]
    fn test_for_noiseless_device() {
        let device = VirtualDevice::new("dev", DeviceKind::GateBased, 2).unwrap();
        assert!(Task::for_device(x_circuit(), &device).noise().is_none());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TaskState::Executing.to_string(), "executing");
        assert!(TaskState::Cancelled.is_terminal());
        assert!(!TaskState::Queued.is_terminal());
    }
}
