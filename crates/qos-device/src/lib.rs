//! QOS Virtual Devices
//!
//! A [`VirtualDevice`] is a named simulated device: a qubit count, an
//! execution model ([`DeviceKind`]) and a mutable [`NoiseProfile`]
//! (re-exported from `qos-ir`). Noise is applied through the same routine
//! the kernel uses, [`qos_ir::apply_noise_profile`].
//!
//! # Example
//!
//! ```rust
//! use qos_device::{DeviceKind, DeviceRegistry};
//! use qos_ir::{CompiledCircuit, GateSpec, Operation, QubitId};
//!
//! let mut registry = DeviceRegistry::new();
//! let device = registry.create_device("lab", DeviceKind::GateBased, 2).unwrap();
//! device.set_noise_model(Some(50.0), None, None).unwrap();
//!
//! let mut circuit = CompiledCircuit::new();
//! circuit.push(Operation::gate(GateSpec::H, [QubitId(0)]).unwrap());
//!
//! let noisy = registry.get_device("lab").unwrap().apply_noise(&circuit);
//! assert_eq!(noisy.len(), 3);
//! ```

pub mod device;
pub mod error;
pub mod registry;

pub use device::{DeviceKind, VirtualDevice};
pub use error::{DeviceError, DeviceResult};
pub use qos_ir::NoiseProfile;
pub use registry::DeviceRegistry;
