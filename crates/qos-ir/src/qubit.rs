//! Qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Exclusive upper bound on qubit indices an operation may name.
pub const MAX_QUBITS: u32 = 1 << 16;

/// Logical qubit index within a circuit or device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Index as `usize`, for addressing amplitude bits.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Reject an index at or beyond [`MAX_QUBITS`].
pub(crate) fn check_bound(qubit: QubitId, gate_name: &str) -> IrResult<()> {
    if qubit.0 >= MAX_QUBITS {
        return Err(IrError::QubitOutOfRange {
            qubit,
            num_qubits: MAX_QUBITS,
            gate_name: gate_name.to_string(),
        });
    }
    Ok(())
}

/// Build the ordered qubit range `[0, n)`.
pub fn qubit_range(n: u32) -> Vec<QubitId> {
    (0..n).map(QubitId).collect()
}
