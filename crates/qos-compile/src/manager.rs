//! Pass manager for orchestrating optimization.

use tracing::{debug, info, instrument};

use qos_ir::CompiledCircuit;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{CancelInversePairs, MergeRotations, VerifyOperations};

/// Highest supported optimization level.
pub const MAX_OPTIMIZATION_LEVEL: u8 = 2;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit))]
    pub fn run(&self, circuit: &mut CompiledCircuit) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} operations",
            self.passes.len(),
            circuit.len()
        );

        for pass in &self.passes {
            if pass.should_run(circuit) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit)?;
                debug!("Pass {} completed, ops: {}", pass.name(), circuit.len());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            circuit.depth(),
            circuit.len()
        );

        Ok(())
    }

    /// Names of the configured passes, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    /// Optimization level (0-2).
    optimization_level: u8,
}

impl PassManagerBuilder {
    /// Create a new builder at the default level.
    pub fn new() -> Self {
        Self {
            optimization_level: MAX_OPTIMIZATION_LEVEL,
        }
    }

    /// Set the optimization level.
    ///
    /// - Level 0: No optimization
    /// - Level 1: Cancel adjacent self-inverse pairs
    /// - Level 2: Also merge rotations (default)
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(MAX_OPTIMIZATION_LEVEL);
        self
    }

    /// Build the pass manager.
    pub fn build(self) -> PassManager {
        let mut pm = PassManager::new();

        if self.optimization_level >= 1 {
            pm.add_pass(CancelInversePairs);
        }

        if self.optimization_level >= 2 {
            pm.add_pass(MergeRotations);
            // Merging can expose new inverse pairs (S·S → Z next to Z).
            pm.add_pass(CancelInversePairs);
        }

        // Final structural check whenever anything was rewritten.
        if self.optimization_level >= 1 {
            pm.add_pass(VerifyOperations);
        }

        pm
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qos_ir::{GateSpec, Operation, QubitId};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_pass_manager_run() {
        let pm = PassManager::new();
        let mut circuit = CompiledCircuit::new();
        circuit.push(Operation::gate(GateSpec::H, [QubitId(0)]).unwrap());
        circuit.push(Operation::gate(GateSpec::CNOT, [QubitId(0), QubitId(1)]).unwrap());

        pm.run(&mut circuit).unwrap();
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_builder_levels() {
        assert!(PassManagerBuilder::new()
            .with_optimization_level(0)
            .build()
            .is_empty());
        assert_eq!(
            PassManagerBuilder::new()
                .with_optimization_level(1)
                .build()
                .pass_names(),
            vec!["CancelInversePairs", "VerifyOperations"]
        );
        assert_eq!(
            PassManagerBuilder::new().build().pass_names(),
            vec![
                "CancelInversePairs",
                "MergeRotations",
                "CancelInversePairs",
                "VerifyOperations"
            ]
        );
        // Levels above the maximum clamp.
        assert_eq!(
            PassManagerBuilder::new()
                .with_optimization_level(7)
                .build()
                .len(),
            4
        );
    }
}
