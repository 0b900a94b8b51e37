//! QOS Instruction Compiler
//!
//! This crate turns declarative [`Instruction`](qos_ir::Instruction) lists
//! into [`CompiledCircuit`](qos_ir::CompiledCircuit)s, checks circuits
//! against a target, and optimizes them with a pass-based peephole
//! optimizer.
//!
//! # Example
//!
//! ```rust
//! use qos_compile::Compiler;
//! use qos_ir::{GateSpec, Instruction, QubitId};
//!
//! let program = vec![
//!     Instruction::single(GateSpec::H, QubitId(0)).unwrap(),
//!     Instruction::pair(GateSpec::CNOT, QubitId(0), QubitId(1)).unwrap(),
//! ];
//!
//! let compiler = Compiler::for_device(2);
//! let circuit = compiler.compile_program(&program).unwrap();
//! assert!(compiler.validate_circuit(&circuit));
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes Included |
//! |-------|-----------------|
//! | 0 | None |
//! | 1 | [`passes::CancelInversePairs`] |
//! | 2 | + [`passes::MergeRotations`] (default) |
//!
//! Noise channels are barriers for every pass.

pub mod analysis;
pub mod compiler;
pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod validate;

pub use analysis::{CircuitAnalysis, analyze};
pub use compiler::{Compiler, GateSet};
pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use validate::ValidationReport;
