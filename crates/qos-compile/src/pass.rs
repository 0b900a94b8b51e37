//! Pass trait and types for compilation passes.

use qos_ir::CompiledCircuit;

use crate::error::CompileResult;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the circuit.
    Analysis,
    /// Transformation pass that rewrites the circuit.
    Transformation,
}

/// A compilation pass that operates on a compiled circuit.
///
/// Transformation passes must keep the circuit functionally equivalent:
/// the rewritten circuit produces the same final state as the input.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given circuit.
    fn run(&self, circuit: &mut CompiledCircuit) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _circuit: &CompiledCircuit) -> bool {
        true
    }
}
