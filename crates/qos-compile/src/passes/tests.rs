//! Tests for optimization passes.

use std::f64::consts::PI;

use qos_ir::{CompiledCircuit, GateSpec, NoiseChannel, Operation, OperationKind, QubitId};

use crate::error::CompileError;
use crate::pass::Pass;

use super::{CancelInversePairs, MergeRotations, VerifyOperations};

fn circuit(ops: &[(GateSpec, &[u32])]) -> CompiledCircuit {
    CompiledCircuit::from_operations(
        ops.iter()
            .map(|(g, qs)| Operation::gate(*g, qs.iter().map(|&q| QubitId(q))).unwrap())
            .collect(),
    )
}

fn gates(circuit: &CompiledCircuit) -> Vec<GateSpec> {
    circuit.iter().filter_map(|op| op.as_gate().copied()).collect()
}

#[test]
fn test_cancel_hh() {
    let mut c = circuit(&[(GateSpec::H, &[0]), (GateSpec::H, &[0])]);
    CancelInversePairs.run(&mut c).unwrap();
    assert!(c.is_empty());
}

#[test]
fn test_cancel_cascades() {
    let mut c = circuit(&[
        (GateSpec::H, &[0]),
        (GateSpec::X, &[0]),
        (GateSpec::X, &[0]),
        (GateSpec::H, &[0]),
    ]);
    CancelInversePairs.run(&mut c).unwrap();
    assert!(c.is_empty());
}

#[test]
fn test_cancel_cnot_same_orientation_only() {
    let mut same = circuit(&[(GateSpec::CNOT, &[0, 1]), (GateSpec::CNOT, &[0, 1])]);
    CancelInversePairs.run(&mut same).unwrap();
    assert!(same.is_empty());

    let mut flipped = circuit(&[(GateSpec::CNOT, &[0, 1]), (GateSpec::CNOT, &[1, 0])]);
    CancelInversePairs.run(&mut flipped).unwrap();
    assert_eq!(flipped.len(), 2);
}

#[test]
fn test_cancel_symmetric_two_qubit() {
    let mut c = circuit(&[(GateSpec::CZ, &[0, 1]), (GateSpec::CZ, &[1, 0])]);
    CancelInversePairs.run(&mut c).unwrap();
    assert!(c.is_empty());

    let mut c = circuit(&[(GateSpec::Swap, &[2, 1]), (GateSpec::Swap, &[1, 2])]);
    CancelInversePairs.run(&mut c).unwrap();
    assert!(c.is_empty());
}

#[test]
fn test_cancel_blocked_by_intervening_gate() {
    let mut c = circuit(&[
        (GateSpec::CNOT, &[0, 1]),
        (GateSpec::H, &[0]),
        (GateSpec::CNOT, &[0, 1]),
    ]);
    CancelInversePairs.run(&mut c).unwrap();
    assert_eq!(c.len(), 3);
}

#[test]
fn test_cancel_across_unrelated_wire() {
    let mut c = circuit(&[(GateSpec::X, &[0]), (GateSpec::H, &[1]), (GateSpec::X, &[0])]);
    CancelInversePairs.run(&mut c).unwrap();
    assert_eq!(gates(&c), vec![GateSpec::H]);
}

#[test]
fn test_cancel_partial_overlap_kept() {
    // CNOT(0,1) then H(0) H(0) then CNOT(0,1): inner pair cancels, then the
    // outer pair becomes adjacent.
    let mut c = circuit(&[
        (GateSpec::CNOT, &[0, 1]),
        (GateSpec::H, &[0]),
        (GateSpec::H, &[0]),
        (GateSpec::CNOT, &[0, 1]),
    ]);
    CancelInversePairs.run(&mut c).unwrap();
    assert!(c.is_empty());

    // A single-qubit gate is not adjacent to a two-qubit gate's pair.
    let mut c = circuit(&[(GateSpec::CZ, &[0, 1]), (GateSpec::Z, &[0]), (GateSpec::Z, &[1])]);
    CancelInversePairs.run(&mut c).unwrap();
    assert_eq!(c.len(), 3);
}

#[test]
fn test_noise_is_barrier() {
    let mut c = circuit(&[(GateSpec::X, &[0])]);
    c.push(Operation::noise(
        NoiseChannel::AmplitudeDamping { gamma: 0.2 },
        QubitId(0),
    ));
    c.push(Operation::gate(GateSpec::X, [QubitId(0)]).unwrap());
    let before = c.clone();

    CancelInversePairs.run(&mut c).unwrap();
    MergeRotations.run(&mut c).unwrap();
    assert_eq!(c, before);
}

#[test]
fn test_sparse_wires_with_extreme_index() {
    let mut c = circuit(&[(GateSpec::H, &[0])]);
    c.push(Operation::noise(
        NoiseChannel::PhaseDamping { gamma: 0.1 },
        QubitId(u32::MAX),
    ));
    c.push(Operation::gate(GateSpec::H, [QubitId(0)]).unwrap());

    CancelInversePairs.run(&mut c).unwrap();
    assert_eq!(c.len(), 1);
    assert!(c.operations()[0].is_noise());
}

#[test]
fn test_non_self_inverse_not_cancelled() {
    let mut c = circuit(&[(GateSpec::T, &[0]), (GateSpec::T, &[0])]);
    CancelInversePairs.run(&mut c).unwrap();
    assert_eq!(c.len(), 2);
}

#[test]
fn test_merge_rotations() {
    let mut c = circuit(&[
        (GateSpec::Rz(0.25), &[0]),
        (GateSpec::Rz(0.5), &[0]),
        (GateSpec::Rx(1.0), &[1]),
        (GateSpec::Ry(1.0), &[1]),
    ]);
    MergeRotations.run(&mut c).unwrap();
    assert_eq!(
        gates(&c),
        vec![GateSpec::Rz(0.75), GateSpec::Rx(1.0), GateSpec::Ry(1.0)]
    );
}

#[test]
fn test_merge_to_zero_drops() {
    let mut c = circuit(&[(GateSpec::Ry(PI / 3.0), &[0]), (GateSpec::Ry(-PI / 3.0), &[0])]);
    MergeRotations.run(&mut c).unwrap();
    assert!(c.is_empty());

    let mut c = circuit(&[(GateSpec::ZPow(0.5), &[0]), (GateSpec::ZPow(-0.5), &[0])]);
    MergeRotations.run(&mut c).unwrap();
    assert!(c.is_empty());
}

#[test]
fn test_merge_full_turn_kept() {
    // Rz(π)·Rz(π) = Rz(2π) = -I: a global phase the amplitudes still see.
    let mut c = circuit(&[(GateSpec::Rz(PI), &[0]), (GateSpec::Rz(PI), &[0])]);
    MergeRotations.run(&mut c).unwrap();
    assert_eq!(gates(&c), vec![GateSpec::Rz(2.0 * PI)]);
}

#[test]
fn test_merge_phase_ladder() {
    let mut c = circuit(&[
        (GateSpec::S, &[0]),
        (GateSpec::T, &[0]),
        (GateSpec::T, &[0]),
    ]);
    MergeRotations.run(&mut c).unwrap();
    assert_eq!(gates(&c), vec![GateSpec::Z]);
}

#[test]
fn test_merge_then_cancel() {
    let mut c = circuit(&[(GateSpec::Z, &[0]), (GateSpec::S, &[0]), (GateSpec::S, &[0])]);
    MergeRotations.run(&mut c).unwrap();
    CancelInversePairs.run(&mut c).unwrap();
    assert!(c.is_empty());
}

#[test]
fn test_verify_rejects_bad_arity() {
    let mut c = CompiledCircuit::new();
    c.push(Operation {
        kind: OperationKind::Gate(GateSpec::CNOT),
        targets: vec![QubitId(0)],
    });
    assert!(matches!(
        VerifyOperations.run(&mut c),
        Err(CompileError::PassFailed { .. })
    ));

    let mut c = CompiledCircuit::new();
    c.push(Operation {
        kind: OperationKind::Gate(GateSpec::Swap),
        targets: vec![QubitId(1), QubitId(1)],
    });
    assert!(VerifyOperations.run(&mut c).is_err());
}

#[test]
fn test_verify_accepts_well_formed() {
    let mut c = circuit(&[(GateSpec::H, &[0]), (GateSpec::CNOT, &[0, 1])]);
    assert!(VerifyOperations.run(&mut c).is_ok());
}
