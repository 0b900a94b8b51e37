//! QOS Simulation Backend Abstraction
//!
//! This crate defines the contract between the execution kernel and the
//! numeric engines that evaluate circuits. The kernel depends only on
//! [`SimulationBackend`]; any engine satisfying it (exact statevector,
//! density matrix, a remote executor) is interchangeable.
//!
//! # Example: Implementing a Backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use qos_hal::{AmplitudeVector, Counts, HalResult, SimulationBackend};
//! use qos_ir::CompiledCircuit;
//!
//! struct MyBackend;
//!
//! #[async_trait]
//! impl SimulationBackend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!     fn max_qubits(&self) -> u32 { 16 }
//!
//!     async fn simulate(&self, circuit: &CompiledCircuit, num_qubits: u32)
//!         -> HalResult<AmplitudeVector> {
//!         // Evaluate the circuit...
//!         todo!()
//!     }
//!
//!     async fn run(&self, circuit: &CompiledCircuit, num_qubits: u32, shots: u32)
//!         -> HalResult<Counts> {
//!         // Sample the circuit...
//!         todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod error;
pub mod result;

pub use backend::SimulationBackend;
pub use error::{HalError, HalResult};
pub use result::{AmplitudeVector, Counts};
