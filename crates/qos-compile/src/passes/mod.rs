//! Built-in compilation passes.
//!
//! The optimization passes are peephole rewrites over the operation list.
//! Two operations are adjacent when each is the other's neighbour on every
//! wire they touch; noise channels occupy their wire like any other
//! operation, so nothing is cancelled or merged across them.

mod cancel;
mod merge;
mod verify;

#[cfg(test)]
mod tests;

use qos_ir::{CompiledCircuit, Operation, QubitId};
use rustc_hash::FxHashMap;

pub use cancel::CancelInversePairs;
pub use merge::MergeRotations;
pub use verify::VerifyOperations;

/// Tolerance for angle comparisons.
pub(crate) const EPSILON: f64 = 1e-10;

/// Rewrite buffer that tracks, per wire, the operations still in the output.
struct Peephole {
    out: Vec<Option<Operation>>,
    wires: FxHashMap<QubitId, Vec<usize>>,
}

impl Peephole {
    fn for_circuit(circuit: &CompiledCircuit) -> Self {
        Self {
            out: Vec::with_capacity(circuit.len()),
            wires: FxHashMap::default(),
        }
    }

    /// Index of the latest kept operation if it is the last operation on
    /// every one of `targets` and touches no other wire.
    fn adjacent(&self, targets: &[QubitId]) -> Option<usize> {
        let (first, rest) = targets.split_first()?;
        let idx = *self.wires.get(first)?.last()?;
        if rest
            .iter()
            .any(|q| self.wires.get(q).and_then(|w| w.last()) != Some(&idx))
        {
            return None;
        }
        let prev = self.out[idx].as_ref()?;
        (prev.targets.len() == targets.len()).then_some(idx)
    }

    fn get(&self, idx: usize) -> Option<&Operation> {
        self.out.get(idx).and_then(Option::as_ref)
    }

    /// Drop a kept operation. Only valid for an index returned by
    /// [`Peephole::adjacent`].
    fn remove(&mut self, idx: usize) -> Option<Operation> {
        let op = self.out.get_mut(idx)?.take()?;
        for q in &op.targets {
            if let Some(wire) = self.wires.get_mut(q) {
                wire.pop();
            }
        }
        Some(op)
    }

    fn push(&mut self, op: Operation) {
        let idx = self.out.len();
        for q in &op.targets {
            self.wires.entry(*q).or_default().push(idx);
        }
        self.out.push(Some(op));
    }

    fn finish(self) -> CompiledCircuit {
        CompiledCircuit::from_operations(self.out.into_iter().flatten().collect())
    }
}
