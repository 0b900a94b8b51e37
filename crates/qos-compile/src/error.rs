//! Error types for the compilation crate.

use qos_ir::QubitId;
use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qos_ir::IrError),

    /// Gate is outside the compiler's supported gate set.
    #[error("Gate '{0}' not in target gate set")]
    UnsupportedGate(String),

    /// Target index is not addressable on the compile target.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit device (gate: {gate_name})")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits on the device.
        num_qubits: u32,
        /// Gate name for context.
        gate_name: String,
    },

    /// Pass execution failed.
    #[error("Pass '{name}' failed: {reason}")]
    PassFailed { name: String, reason: String },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
