//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building or loading IR values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate name is not part of the catalog.
    #[error("Invalid gate kind: '{0}'")]
    InvalidGateKind(String),

    /// Gate requires a different number of target qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    ArityMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Parametrized gate was created without its parameter.
    #[error("Gate '{gate_name}' requires parameter '{parameter}'")]
    MissingParameter {
        /// Name of the gate.
        gate_name: String,
        /// Name of the missing parameter.
        parameter: String,
    },

    /// The same qubit appears twice in one operation.
    #[error("Duplicate qubit {qubit} in operation (gate: {gate_name})")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Gate name for context.
        gate_name: String,
    },

    /// Gate name is syntactically valid but not supported in this context.
    #[error("Unsupported gate: '{0}'")]
    UnsupportedGate(String),

    /// Qubit index is outside the device or pool bounds.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit target (gate: {gate_name})")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of addressable qubits.
        num_qubits: u32,
        /// Gate name for context.
        gate_name: String,
    },

    /// Noise value is out of range or not a number.
    #[error("Invalid noise parameter '{field}': {value}")]
    InvalidNoise {
        /// Profile field name (`T1`, `T2`, `dephasing`) or channel `gamma`.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Persisted circuit could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IrError::ArityMismatch {
            gate_name: "cnot".into(),
            expected: 2,
            got: 1,
        };
        assert_eq!(err.to_string(), "Gate 'cnot' requires 2 qubits, got 1");

        let err = IrError::QubitOutOfRange {
            qubit: QubitId(4),
            num_qubits: 4,
            gate_name: "cz".into(),
        };
        assert_eq!(
            err.to_string(),
            "Qubit q4 out of range for 4-qubit target (gate: cz)"
        );
    }
}
