//! QOS Instruction Model
//!
//! This crate provides the core value types of the QOS execution pipeline:
//! the closed gate catalog, declarative instructions, the backend-agnostic
//! compiled circuit, noise profiles, and the persisted circuit format.
//!
//! # Core Components
//!
//! - **Gates**: [`GateSpec`], a closed enum with a static kind → arity table
//! - **Instructions**: [`Instruction`], validated at construction
//! - **Circuits**: [`CompiledCircuit`], an ordered list of [`Operation`]s
//! - **Noise**: [`NoiseProfile`] and [`apply_noise_profile`], the single
//!   routine used to noise-augment circuits
//! - **Format**: [`format::to_json`] / [`format::from_json`]
//!
//! # Example: Bell pair with T1 noise
//!
//! ```rust
//! use qos_ir::{
//!     apply_noise_profile, qubit_range, CompiledCircuit, GateSpec, NoiseProfile, Operation,
//!     QubitId, DEFAULT_LAYER_DURATION,
//! };
//!
//! let mut circuit = CompiledCircuit::new();
//! circuit.push(Operation::gate(GateSpec::H, [QubitId(0)]).unwrap());
//! circuit.push(Operation::gate(GateSpec::CNOT, [QubitId(0), QubitId(1)]).unwrap());
//!
//! let profile = NoiseProfile::with_t1(50.0).unwrap();
//! let noisy = apply_noise_profile(&circuit, &profile, &qubit_range(2), DEFAULT_LAYER_DURATION);
//!
//! assert_eq!(circuit.len(), 2);
//! assert_eq!(noisy.len(), 4);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Parameter |
//! |------|--------|-----------|
//! | `h`, `x`, `y`, `z`, `t`, `s` | 1 | none |
//! | `cnot` (`cx`), `cz`, `swap` | 2 | none |
//! | `rx`, `ry`, `rz` | 1 | `theta` |
//! | `zpow` | 1 | `exponent` |

pub mod circuit;
pub mod error;
pub mod format;
pub mod gate;
pub mod instruction;
pub mod noise;
pub mod qubit;

pub use circuit::{CompiledCircuit, Operation, OperationKind};
pub use error::{IrError, IrResult};
pub use gate::{CATALOG, GateSpec};
pub use instruction::Instruction;
pub use noise::{
    DEFAULT_LAYER_DURATION, NoiseChannel, NoiseProfile, apply_noise_profile, damping_probability,
};
pub use qubit::{MAX_QUBITS, QubitId, qubit_range};
