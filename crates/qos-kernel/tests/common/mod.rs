//! Backends that misbehave on purpose, shared by the kernel tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use num_complex::Complex64;
use qos_hal::{AmplitudeVector, Counts, HalError, HalResult, SimulationBackend};
use qos_ir::CompiledCircuit;

/// Backend that sleeps before returning `|0…0⟩`.
pub struct SlowBackend {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimulationBackend for SlowBackend {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "slow-test"
    }

    fn max_qubits(&self) -> u32 {
        16
    }

    async fn simulate(
        &self,
        circuit: &CompiledCircuit,
        num_qubits: u32,
    ) -> HalResult<AmplitudeVector> {
        self.check_circuit(circuit, num_qubits)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(AmplitudeVector::new(amplitudes))
    }

    async fn run(
        &self,
        circuit: &CompiledCircuit,
        num_qubits: u32,
        shots: u32,
    ) -> HalResult<Counts> {
        self.check_circuit(circuit, num_qubits)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let mut counts = Counts::new();
        counts.insert("0".repeat(num_qubits as usize), u64::from(shots));
        Ok(counts)
    }
}

/// Backend that always fails.
#[derive(Default)]
pub struct FailingBackend {
    calls: AtomicUsize,
}

impl FailingBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimulationBackend for FailingBackend {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "failing-test"
    }

    fn max_qubits(&self) -> u32 {
        16
    }

    async fn simulate(&self, _: &CompiledCircuit, _: u32) -> HalResult<AmplitudeVector> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(HalError::Backend("device on fire".into()))
    }

    async fn run(&self, _: &CompiledCircuit, _: u32, _: u32) -> HalResult<Counts> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(HalError::Backend("device on fire".into()))
    }
}
