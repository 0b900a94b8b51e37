//! Post-optimization structural check.

use qos_ir::CompiledCircuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};

/// Fails if any operation's target list no longer matches its arity or
/// names a qubit twice.
pub struct VerifyOperations;

impl Pass for VerifyOperations {
    fn name(&self) -> &'static str {
        "VerifyOperations"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut CompiledCircuit) -> CompileResult<()> {
        for (position, op) in circuit.iter().enumerate() {
            let arity = op.kind.arity();
            if op.targets.len() != arity {
                return Err(CompileError::PassFailed {
                    name: self.name().to_string(),
                    reason: format!(
                        "operation {position} ({}) has {} targets, expected {arity}",
                        op.name(),
                        op.targets.len()
                    ),
                });
            }
            for (i, q) in op.targets.iter().enumerate() {
                if op.targets[..i].contains(q) {
                    return Err(CompileError::PassFailed {
                        name: self.name().to_string(),
                        reason: format!("operation {position} ({}) repeats {q}", op.name()),
                    });
                }
            }
        }
        Ok(())
    }
}
