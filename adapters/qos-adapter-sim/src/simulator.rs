//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};

use qos_hal::{AmplitudeVector, Counts, HalError, HalResult, SimulationBackend};
use qos_ir::CompiledCircuit;

use crate::statevector::Statevector;

/// Default register limit.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Local statevector simulator.
///
/// Exact for unitary circuits. Noise channels are realized as quantum
/// trajectories: each evaluation samples one Kraus branch per channel, so
/// `simulate` on a noisy circuit returns one pure-state realization and
/// `run` re-samples the trajectory for every shot.
///
/// Evolution runs on the blocking thread pool. Dropping the returned future
/// stops it at the next operation boundary, so callers can bound a run with
/// `tokio::time::timeout` or abandon it.
pub struct StatevectorBackend {
    name: String,
    max_qubits: u32,
    rng: Arc<Mutex<StdRng>>,
}

impl StatevectorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            name: "statevector".to_string(),
            max_qubits,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Seed the sampling RNG for reproducible trajectories and histograms.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
            ..self
        }
    }

    /// Run `work` on the blocking pool with this backend's RNG.
    ///
    /// `work` sees an abort flag that is raised once the awaiting future is
    /// dropped; it returns `None` when it stopped early.
    async fn offload<T, F>(&self, work: F) -> HalResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut StdRng, &AtomicBool) -> Option<T> + Send + 'static,
    {
        let rng = Arc::clone(&self.rng);
        let guard = AbortOnDrop(Arc::new(AtomicBool::new(false)));
        let abort = Arc::clone(&guard.0);

        let outcome = tokio::task::spawn_blocking(move || {
            let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
            work(&mut rng, &abort)
        })
        .await
        .map_err(|e| HalError::Backend(format!("Simulation task failed: {e}")))?;

        outcome.ok_or_else(|| HalError::Backend("Simulation aborted".into()))
    }
}

/// Raises its flag when dropped.
struct AbortOnDrop(Arc<AtomicBool>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

fn evolve(
    circuit: &CompiledCircuit,
    num_qubits: u32,
    rng: &mut StdRng,
    abort: &AtomicBool,
) -> Option<Statevector> {
    let mut sv = Statevector::new(num_qubits as usize);
    for op in circuit {
        if abort.load(Ordering::Relaxed) {
            return None;
        }
        sv.apply(op, rng);
    }
    Some(sv)
}

fn sample_counts(
    circuit: &CompiledCircuit,
    num_qubits: u32,
    shots: u32,
    rng: &mut StdRng,
    abort: &AtomicBool,
) -> Option<Counts> {
    let mut counts = Counts::new();
    let noisy = circuit.iter().any(|op| op.is_noise());

    if noisy {
        for shot in 0..shots {
            let sv = evolve(circuit, num_qubits, rng, abort)?;
            let outcome = sv.sample(&mut *rng);
            counts.insert(sv.outcome_to_bitstring(outcome), 1);

            if shot > 0 && shot % 1000 == 0 {
                debug!("Completed {} trajectories", shot);
            }
        }
    } else {
        // A unitary circuit has one final state; sample it repeatedly.
        let sv = evolve(circuit, num_qubits, rng, abort)?;
        for _ in 0..shots {
            let outcome = sv.sample(&mut *rng);
            counts.insert(sv.outcome_to_bitstring(outcome), 1);
        }
    }
    Some(counts)
}

impl Default for StatevectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SimulationBackend for StatevectorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    #[instrument(skip(self, circuit), fields(ops = circuit.len()))]
    async fn simulate(
        &self,
        circuit: &CompiledCircuit,
        num_qubits: u32,
    ) -> HalResult<AmplitudeVector> {
        self.check_circuit(circuit, num_qubits)?;
        let start = Instant::now();

        let circuit = circuit.clone();
        let sv = self
            .offload(move |rng, abort| evolve(&circuit, num_qubits, rng, abort))
            .await?;

        debug!("Simulation completed in {:?}", start.elapsed());
        Ok(AmplitudeVector::new(sv.into_amplitudes()))
    }

    #[instrument(skip(self, circuit), fields(ops = circuit.len()))]
    async fn run(
        &self,
        circuit: &CompiledCircuit,
        num_qubits: u32,
        shots: u32,
    ) -> HalResult<Counts> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        self.check_circuit(circuit, num_qubits)?;
        let start = Instant::now();

        let circuit = circuit.clone();
        let counts = self
            .offload(move |rng, abort| sample_counts(&circuit, num_qubits, shots, rng, abort))
            .await?;

        debug!(
            "Sampled {} shots ({} distinct) in {:?}",
            shots,
            counts.len(),
            start.elapsed()
        );
        Ok(counts)
    }
}
