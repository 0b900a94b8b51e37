//! Simulation backend trait.
//!
//! A [`SimulationBackend`] evaluates a [`CompiledCircuit`] on a register of
//! `num_qubits` qubits starting in `|0…0⟩`. Noise channels are part of the
//! circuit, so noisy and ideal evaluation go through the same two calls:
//!
//! | Method | Kind | Returns |
//! |--------|------|---------|
//! | `name()` | sync | `&str` |
//! | `max_qubits()` | sync | `u32` |
//! | `simulate()` | async | `HalResult<AmplitudeVector>` |
//! | `run()` | async | `HalResult<Counts>` |
//! | `check_circuit()` | sync, provided | `HalResult<()>` |

use async_trait::async_trait;

use qos_ir::CompiledCircuit;

use crate::error::{HalError, HalResult};
use crate::result::{AmplitudeVector, Counts};

/// Trait for numeric simulation backends.
///
/// # Contract
///
/// - `simulate()` returns exactly `2^num_qubits` amplitudes.
/// - `run()` returns a histogram whose counts sum to `shots`; `shots == 0`
///   is rejected with [`HalError::InvalidShots`].
/// - A circuit touching a qubit `>= num_qubits`, or a register wider than
///   `max_qubits()`, is rejected before any work is done.
/// - Neither call mutates the circuit.
#[async_trait]
pub trait SimulationBackend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Widest register this backend accepts.
    fn max_qubits(&self) -> u32;

    /// Evaluate the circuit and return the final state.
    async fn simulate(
        &self,
        circuit: &CompiledCircuit,
        num_qubits: u32,
    ) -> HalResult<AmplitudeVector>;

    /// Evaluate the circuit `shots` times, measuring every qubit.
    async fn run(&self, circuit: &CompiledCircuit, num_qubits: u32, shots: u32)
    -> HalResult<Counts>;

    /// Check a circuit against the register width and backend limits.
    fn check_circuit(&self, circuit: &CompiledCircuit, num_qubits: u32) -> HalResult<()> {
        if num_qubits > self.max_qubits() {
            return Err(HalError::CircuitTooLarge(format!(
                "Register has {num_qubits} qubits but {} only supports {}",
                self.name(),
                self.max_qubits()
            )));
        }
        for (position, op) in circuit.iter().enumerate() {
            if op.targets.len() != op.kind.arity() {
                return Err(HalError::InvalidCircuit(format!(
                    "operation {position} ({}) has {} targets, expected {}",
                    op.name(),
                    op.targets.len(),
                    op.kind.arity()
                )));
            }
            if let Some(q) = op.targets.iter().find(|q| q.0 >= num_qubits) {
                return Err(HalError::InvalidCircuit(format!(
                    "operation {position} ({}) targets {q} outside a {num_qubits}-qubit register",
                    op.name()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use qos_ir::{GateSpec, Operation, OperationKind, QubitId};

    /// Backend that returns `|0…0⟩` regardless of the circuit.
    struct ZeroBackend;

    #[async_trait]
    impl SimulationBackend for ZeroBackend {
        fn name(&self) -> &str {
            "zero"
        }

        fn max_qubits(&self) -> u32 {
            4
        }

        async fn simulate(
            &self,
            circuit: &CompiledCircuit,
            num_qubits: u32,
        ) -> HalResult<AmplitudeVector> {
            self.check_circuit(circuit, num_qubits)?;
            let mut amps = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
            amps[0] = Complex64::new(1.0, 0.0);
            Ok(AmplitudeVector::new(amps))
        }

        async fn run(
            &self,
            circuit: &CompiledCircuit,
            num_qubits: u32,
            shots: u32,
        ) -> HalResult<Counts> {
            self.check_circuit(circuit, num_qubits)?;
            let mut counts = Counts::new();
            counts.insert("0".repeat(num_qubits as usize), u64::from(shots));
            Ok(counts)
        }
    }

    #[tokio::test]
    async fn test_check_circuit_bounds() {
        let backend = ZeroBackend;
        let mut circuit = CompiledCircuit::new();
        circuit.push(Operation::gate(GateSpec::CNOT, [QubitId(0), QubitId(2)]).unwrap());

        assert!(backend.simulate(&circuit, 3).await.is_ok());
        assert!(matches!(
            backend.simulate(&circuit, 2).await,
            Err(HalError::InvalidCircuit(_))
        ));
        assert!(matches!(
            backend.simulate(&circuit, 5).await,
            Err(HalError::CircuitTooLarge(_))
        ));
    }

    #[tokio::test]
    async fn test_check_circuit_arity() {
        let backend = ZeroBackend;
        let mut circuit = CompiledCircuit::new();
        circuit.push(Operation {
            kind: OperationKind::Gate(GateSpec::Swap),
            targets: vec![QubitId(0)],
        });
        assert!(matches!(
            backend.run(&circuit, 2, 10).await,
            Err(HalError::InvalidCircuit(_))
        ));
    }
}
