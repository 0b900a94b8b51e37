//! Backend-agnostic compiled circuit.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::GateSpec;
use crate::instruction::check_targets;
use crate::noise::NoiseChannel;
use crate::qubit::QubitId;

/// What a circuit operation does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OperationKind {
    /// A unitary gate.
    Gate(GateSpec),
    /// A non-unitary noise channel.
    Noise(NoiseChannel),
}

impl OperationKind {
    /// Name used in listings and the persisted format.
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Gate(g) => g.name(),
            OperationKind::Noise(n) => n.name(),
        }
    }

    /// Number of target qubits the kind requires.
    pub fn arity(&self) -> usize {
        match self {
            OperationKind::Gate(g) => g.arity(),
            OperationKind::Noise(_) => 1,
        }
    }
}

/// A single circuit operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The operation kind.
    pub kind: OperationKind,
    /// Target qubits, in order.
    pub targets: Vec<QubitId>,
}

impl Operation {
    /// Create a gate operation, checking arity.
    pub fn gate(gate: GateSpec, targets: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let targets: Vec<_> = targets.into_iter().collect();
        check_targets(&gate, &targets)?;
        Ok(Self {
            kind: OperationKind::Gate(gate),
            targets,
        })
    }

    /// Create a noise channel on one qubit.
    pub fn noise(channel: NoiseChannel, qubit: QubitId) -> Self {
        Self {
            kind: OperationKind::Noise(channel),
            targets: vec![qubit],
        }
    }

    /// The gate, if this is a gate operation.
    pub fn as_gate(&self) -> Option<&GateSpec> {
        match &self.kind {
            OperationKind::Gate(g) => Some(g),
            OperationKind::Noise(_) => None,
        }
    }

    /// Check if this is a noise channel.
    pub fn is_noise(&self) -> bool {
        matches!(self.kind, OperationKind::Noise(_))
    }

    /// Operation name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// An ordered sequence of operations.
///
/// The order is the execution order; nothing in this crate reorders it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledCircuit {
    operations: Vec<Operation>,
}

impl CompiledCircuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing operation list.
    pub fn from_operations(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Append an operation.
    pub fn push(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// Append every operation of `other`.
    pub fn extend(&mut self, other: impl IntoIterator<Item = Operation>) {
        self.operations.extend(other);
    }

    /// Operations in order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Iterate over operations.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Consume the circuit, returning its operations.
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Width: one more than the highest qubit index referenced, or zero.
    ///
    /// Saturates at `u32::MAX`.
    pub fn num_qubits(&self) -> u32 {
        self.operations
            .iter()
            .flat_map(|op| op.targets.iter())
            .map(|q| q.0.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Fail with [`IrError::QubitOutOfRange`] on the first target at or
    /// beyond `width`.
    pub fn check_width(&self, width: u32) -> IrResult<()> {
        for op in &self.operations {
            if let Some(q) = op.targets.iter().find(|q| q.0 >= width) {
                return Err(IrError::QubitOutOfRange {
                    qubit: *q,
                    num_qubits: width,
                    gate_name: op.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Number of gate operations (noise channels excluded).
    pub fn gate_count(&self) -> usize {
        self.operations.iter().filter(|op| !op.is_noise()).count()
    }

    /// Circuit depth: the longest chain of operations sharing a wire.
    pub fn depth(&self) -> usize {
        let mut wire_depth: FxHashMap<QubitId, usize> = FxHashMap::default();
        let mut depth = 0;
        for op in &self.operations {
            let layer = op
                .targets
                .iter()
                .map(|q| wire_depth.get(q).copied().unwrap_or(0))
                .max()
                .unwrap_or(0)
                + 1;
            for q in &op.targets {
                wire_depth.insert(*q, layer);
            }
            depth = depth.max(layer);
        }
        depth
    }
}

impl<'a> IntoIterator for &'a CompiledCircuit {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

impl IntoIterator for CompiledCircuit {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell() -> CompiledCircuit {
        let mut circuit = CompiledCircuit::new();
        circuit.push(Operation::gate(GateSpec::H, [QubitId(0)]).unwrap());
        circuit.push(Operation::gate(GateSpec::CNOT, [QubitId(0), QubitId(1)]).unwrap());
        circuit
    }

    #[test]
    fn test_empty_circuit() {
        let circuit = CompiledCircuit::new();
        assert!(circuit.is_empty());
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_width_and_depth() {
        let mut circuit = bell();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.depth(), 2);

        // Parallel gate on a fresh wire does not add depth.
        circuit.push(Operation::gate(GateSpec::X, [QubitId(3)]).unwrap());
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_extreme_index_does_not_overflow() {
        let mut circuit = CompiledCircuit::new();
        circuit.push(Operation::noise(
            NoiseChannel::PhaseDamping { gamma: 0.5 },
            QubitId(u32::MAX),
        ));
        assert_eq!(circuit.num_qubits(), u32::MAX);
        assert_eq!(circuit.depth(), 1);

        assert!(matches!(
            Operation::gate(GateSpec::X, [QubitId(u32::MAX)]),
            Err(IrError::QubitOutOfRange { .. })
        ));
    }

    #[test]
    fn test_check_width() {
        let circuit = bell();
        assert!(circuit.check_width(2).is_ok());
        assert!(matches!(
            circuit.check_width(1),
            Err(IrError::QubitOutOfRange { qubit: QubitId(1), num_qubits: 1, .. })
        ));
    }

    #[test]
    fn test_gate_rejects_bad_arity() {
        assert!(Operation::gate(GateSpec::Swap, [QubitId(0)]).is_err());
    }

    #[test]
    fn test_gate_count_skips_noise() {
        let mut circuit = bell();
        circuit.push(Operation::noise(
            NoiseChannel::AmplitudeDamping { gamma: 0.1 },
            QubitId(0),
        ));
        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.gate_count(), 2);
    }
}
