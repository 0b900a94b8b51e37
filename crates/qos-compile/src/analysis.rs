//! Static circuit analysis.
//!
//! Summarizes a compiled circuit (depth, width, gate histogram) and flags
//! shapes that are expensive to simulate.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::instrument;

use qos_ir::CompiledCircuit;

/// Depth above which a circuit is flagged.
pub const DEPTH_WARNING_THRESHOLD: usize = 1000;

/// Two-qubit gate count above which a circuit is flagged.
pub const TWO_QUBIT_WARNING_THRESHOLD: usize = 50;

/// Summary of a compiled circuit.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitAnalysis {
    /// Circuit depth.
    pub depth: usize,
    /// Circuit width.
    pub num_qubits: u32,
    /// Operation count per name, noise channels included.
    pub gate_counts: FxHashMap<&'static str, usize>,
    /// Number of two-qubit gates.
    pub two_qubit_gates: usize,
    /// Number of noise channels.
    pub noise_operations: usize,
    /// Potential issues, human readable.
    pub issues: Vec<String>,
}

impl CircuitAnalysis {
    /// Gate counts sorted by name.
    pub fn sorted_gate_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<_> = self.gate_counts.iter().map(|(k, v)| (*k, *v)).collect();
        counts.sort_unstable();
        counts
    }

    /// Check if any issue was flagged.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Analyze a compiled circuit.
#[instrument(skip(circuit), fields(operations = circuit.len()))]
pub fn analyze(circuit: &CompiledCircuit) -> CircuitAnalysis {
    let mut gate_counts: FxHashMap<&'static str, usize> = FxHashMap::default();
    let mut two_qubit_gates = 0;
    let mut noise_operations = 0;

    for op in circuit {
        *gate_counts.entry(op.name()).or_default() += 1;
        if op.is_noise() {
            noise_operations += 1;
        } else if op.targets.len() == 2 {
            two_qubit_gates += 1;
        }
    }

    let depth = circuit.depth();
    let mut issues = Vec::new();
    if depth > DEPTH_WARNING_THRESHOLD {
        issues.push(format!(
            "Circuit depth {depth} exceeds {DEPTH_WARNING_THRESHOLD}; consider optimizing"
        ));
    }
    if two_qubit_gates > TWO_QUBIT_WARNING_THRESHOLD {
        issues.push(format!(
            "{two_qubit_gates} two-qubit gates exceed {TWO_QUBIT_WARNING_THRESHOLD}; high error accumulation expected"
        ));
    }

    CircuitAnalysis {
        depth,
        num_qubits: circuit.num_qubits(),
        gate_counts,
        two_qubit_gates,
        noise_operations,
        issues,
    }
}
