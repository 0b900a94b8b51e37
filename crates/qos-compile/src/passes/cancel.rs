//! Inverse-pair cancellation.

use qos_ir::{CompiledCircuit, GateSpec, Operation};
use tracing::debug;

use super::Peephole;
use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};

/// Cancels adjacent pairs of identical self-inverse gates.
///
/// `H·H`, `X·X`, `Y·Y`, `Z·Z`, `CZ·CZ` and `SWAP·SWAP` cancel regardless of
/// target order; `CNOT·CNOT` only with the same control and target.
/// Cancellation cascades, so `H X X H` disappears in one run.
pub struct CancelInversePairs;

fn cancels(prev: &Operation, next: &Operation) -> bool {
    let (Some(a), Some(b)) = (prev.as_gate(), next.as_gate()) else {
        return false;
    };
    if a != b || !a.is_self_inverse() {
        return false;
    }
    match a {
        GateSpec::CZ | GateSpec::Swap => true,
        _ => prev.targets == next.targets,
    }
}

impl Pass for CancelInversePairs {
    fn name(&self) -> &'static str {
        "CancelInversePairs"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut CompiledCircuit) -> CompileResult<()> {
        let mut buffer = Peephole::for_circuit(circuit);
        let mut removed = 0usize;

        for op in std::mem::take(circuit) {
            let prev = buffer
                .adjacent(&op.targets)
                .filter(|&idx| buffer.get(idx).is_some_and(|prev| cancels(prev, &op)));
            match prev {
                Some(idx) => {
                    buffer.remove(idx);
                    removed += 2;
                }
                None => buffer.push(op),
            }
        }

        debug!("CancelInversePairs removed {removed} operations");
        *circuit = buffer.finish();
        Ok(())
    }
}
