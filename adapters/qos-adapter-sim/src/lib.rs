//! QOS Local Statevector Simulator
//!
//! This crate provides the local [`SimulationBackend`](qos_hal::SimulationBackend)
//! used by the kernel and the CLI. It keeps the full statevector, so it is
//! exact but limited to ~20-25 qubits.
//!
//! # Features
//!
//! - **Exact Simulation**: `simulate` returns the final amplitudes
//! - **Whole Catalog**: every gate in `qos-ir`, including `ZPow`
//! - **Noise**: amplitude and phase damping as quantum trajectories
//! - **Reproducible**: [`StatevectorBackend::with_seed`]
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 25 | ~512 MB | Slow |
//!
//! # Example
//!
//! ```ignore
//! use qos_adapter_sim::StatevectorBackend;
//! use qos_hal::SimulationBackend;
//!
//! let backend = StatevectorBackend::new().with_seed(7);
//! let state = backend.simulate(&circuit, 2).await?;
//! println!("P(|11⟩) = {:.3}", state.probabilities()[3]);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, StatevectorBackend};
