//! Rotation merging.

use qos_ir::{CompiledCircuit, GateSpec, Operation, OperationKind};
use tracing::debug;

use super::{EPSILON, Peephole};
use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};

/// Merges adjacent single-qubit gates about the same axis.
///
/// `Rx(a)·Rx(b) = Rx(a+b)` (likewise `Ry`, `Rz`, `ZPow`), `T·T = S` and
/// `S·S = Z`. Angles are summed without wrapping, so the result is exact
/// including global phase; a sum of zero drops the gate.
pub struct MergeRotations;

enum Merged {
    Gate(GateSpec),
    Identity,
}

fn rotation(build: fn(f64) -> GateSpec, sum: f64) -> Merged {
    if sum.abs() < EPSILON {
        Merged::Identity
    } else {
        Merged::Gate(build(sum))
    }
}

fn combine(prev: &GateSpec, next: &GateSpec) -> Option<Merged> {
    let merged = match (prev, next) {
        (GateSpec::Rx(a), GateSpec::Rx(b)) => rotation(GateSpec::Rx, a + b),
        (GateSpec::Ry(a), GateSpec::Ry(b)) => rotation(GateSpec::Ry, a + b),
        (GateSpec::Rz(a), GateSpec::Rz(b)) => rotation(GateSpec::Rz, a + b),
        (GateSpec::ZPow(a), GateSpec::ZPow(b)) => rotation(GateSpec::ZPow, a + b),
        (GateSpec::T, GateSpec::T) => Merged::Gate(GateSpec::S),
        (GateSpec::S, GateSpec::S) => Merged::Gate(GateSpec::Z),
        _ => return None,
    };
    Some(merged)
}

impl MergeRotations {
    /// Push `op`, folding it into the previous operation on its wire for as
    /// long as the pair combines.
    fn fold(buffer: &mut Peephole, mut op: Operation) -> usize {
        let mut merges = 0;
        loop {
            let step = op.as_gate().and_then(|next| {
                let idx = buffer.adjacent(&op.targets)?;
                let prev = buffer.get(idx)?.as_gate()?;
                combine(prev, next).map(|m| (idx, m))
            });
            match step {
                None => {
                    buffer.push(op);
                    return merges;
                }
                Some((idx, Merged::Identity)) => {
                    buffer.remove(idx);
                    return merges + 1;
                }
                Some((idx, Merged::Gate(gate))) => {
                    buffer.remove(idx);
                    op = Operation {
                        kind: OperationKind::Gate(gate),
                        targets: op.targets,
                    };
                    merges += 1;
                }
            }
        }
    }
}

impl Pass for MergeRotations {
    fn name(&self) -> &'static str {
        "MergeRotations"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut CompiledCircuit) -> CompileResult<()> {
        let mut buffer = Peephole::for_circuit(circuit);
        let mut merges = 0usize;

        for op in std::mem::take(circuit) {
            merges += Self::fold(&mut buffer, op);
        }

        debug!("MergeRotations performed {merges} merges");
        *circuit = buffer.finish();
        Ok(())
    }
}
