//! Persisted circuit format.
//!
//! A circuit is stored as a JSON array of entries, one per operation, in
//! execution order:
//!
//! ```json
//! [
//!   { "gate": "h", "targets": [0] },
//!   { "gate": "cnot", "targets": [0, 1] },
//!   { "gate": "rz", "targets": [1], "params": [0.5] }
//! ]
//! ```
//!
//! Noise channels persist as `amplitude_damp` / `phase_damp` with their
//! probability as the single parameter. Loading checks every name against
//! the catalog, every entry against its arity, every index against
//! [`MAX_QUBITS`](crate::MAX_QUBITS) and every probability against `[0, 1]`.

use serde::{Deserialize, Serialize};

use crate::circuit::{CompiledCircuit, Operation, OperationKind};
use crate::error::{IrError, IrResult};
use crate::gate::GateSpec;
use crate::noise::NoiseChannel;
use crate::qubit::{QubitId, check_bound};

/// One persisted operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedOp {
    /// Gate or channel name.
    pub gate: String,
    /// Target qubit indices.
    pub targets: Vec<u32>,
    /// Positional parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl From<&Operation> for PersistedOp {
    fn from(op: &Operation) -> Self {
        let params = match &op.kind {
            OperationKind::Gate(g) => g.parameter().into_iter().collect(),
            OperationKind::Noise(n) => vec![n.gamma()],
        };
        Self {
            gate: op.name().to_string(),
            targets: op.targets.iter().map(|q| q.0).collect(),
            params,
        }
    }
}

impl TryFrom<PersistedOp> for Operation {
    type Error = IrError;

    fn try_from(entry: PersistedOp) -> IrResult<Self> {
        let targets: Vec<QubitId> = entry.targets.into_iter().map(QubitId).collect();
        for &q in &targets {
            check_bound(q, &entry.gate)?;
        }

        if let Some(channel) = entry
            .params
            .first()
            .and_then(|&gamma| NoiseChannel::from_name(&entry.gate, gamma))
        {
            if targets.len() != 1 {
                return Err(IrError::ArityMismatch {
                    gate_name: channel.name().to_string(),
                    expected: 1,
                    got: targets.len(),
                });
            }
            channel.check()?;
            return Ok(Operation::noise(channel, targets[0]));
        }

        let gate = GateSpec::from_name_positional(&entry.gate, &entry.params).map_err(|e| match e {
            IrError::InvalidGateKind(name) => IrError::UnsupportedGate(name),
            other => other,
        })?;
        Operation::gate(gate, targets)
    }
}

/// Serialize a circuit to the persisted JSON form.
pub fn to_json(circuit: &CompiledCircuit) -> IrResult<String> {
    let entries: Vec<PersistedOp> = circuit.iter().map(PersistedOp::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Load a circuit from the persisted JSON form.
///
/// Fails with [`IrError::UnsupportedGate`] on the first unknown name; no
/// partial circuit is returned.
pub fn from_json(source: &str) -> IrResult<CompiledCircuit> {
    let entries: Vec<PersistedOp> = serde_json::from_str(source)?;
    let operations = entries
        .into_iter()
        .map(Operation::try_from)
        .collect::<IrResult<Vec<_>>>()?;
    Ok(CompiledCircuit::from_operations(operations))
}
