//! Declarative gate instructions.
//!
//! An [`Instruction`] is the compiler's input: a gate kind plus the qubits
//! it targets. Construction checks the arity and target uniqueness, so any
//! `Instruction` value is well formed. Device bounds are checked later, at
//! compile time, since an instruction is device-agnostic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{IrError, IrResult};
use crate::gate::GateSpec;
use crate::qubit::{QubitId, check_bound};

/// An immutable gate instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    kind: GateSpec,
    targets: Vec<QubitId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<BTreeMap<String, f64>>,
}

impl Instruction {
    /// Create an instruction from a catalog name.
    ///
    /// Fails with [`IrError::InvalidGateKind`] for names outside the catalog
    /// and with [`IrError::ArityMismatch`] when the target count is wrong.
    pub fn create(
        kind: &str,
        targets: impl IntoIterator<Item = QubitId>,
        parameters: Option<BTreeMap<String, f64>>,
    ) -> IrResult<Self> {
        let gate = GateSpec::from_name(kind, parameters.as_ref())?;
        Self::build(gate, targets.into_iter().collect(), parameters)
    }

    /// Create an instruction from a typed gate.
    pub fn new(kind: GateSpec, targets: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let parameters = kind
            .parameter_name()
            .zip(kind.parameter())
            .map(|(name, value)| BTreeMap::from([(name.to_string(), value)]));
        Self::build(kind, targets.into_iter().collect(), parameters)
    }

    /// Single-qubit instruction.
    pub fn single(kind: GateSpec, qubit: QubitId) -> IrResult<Self> {
        Self::new(kind, [qubit])
    }

    /// Two-qubit instruction.
    pub fn pair(kind: GateSpec, q1: QubitId, q2: QubitId) -> IrResult<Self> {
        Self::new(kind, [q1, q2])
    }

    fn build(
        kind: GateSpec,
        targets: Vec<QubitId>,
        parameters: Option<BTreeMap<String, f64>>,
    ) -> IrResult<Self> {
        check_targets(&kind, &targets)?;
        Ok(Self {
            kind,
            targets,
            parameters,
        })
    }

    /// The gate kind.
    pub fn kind(&self) -> &GateSpec {
        &self.kind
    }

    /// Target qubits, in order.
    pub fn targets(&self) -> &[QubitId] {
        &self.targets
    }

    /// Parameters the instruction was created with.
    pub fn parameters(&self) -> Option<&BTreeMap<String, f64>> {
        self.parameters.as_ref()
    }

    /// Gate name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Check target count and uniqueness for a gate.
pub(crate) fn check_targets(kind: &GateSpec, targets: &[QubitId]) -> IrResult<()> {
    if targets.len() != kind.arity() {
        return Err(IrError::ArityMismatch {
            gate_name: kind.name().to_string(),
            expected: kind.arity(),
            got: targets.len(),
        });
    }
    for (i, q) in targets.iter().enumerate() {
        check_bound(*q, kind.name())?;
        if targets[..i].contains(q) {
            return Err(IrError::DuplicateQubit {
                qubit: *q,
                gate_name: kind.name().to_string(),
            });
        }
    }
    Ok(())
}
