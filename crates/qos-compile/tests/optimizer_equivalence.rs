//! Property tests: optimized circuits evolve to the same state as their
//! source circuits.

use proptest::prelude::*;
use qos_adapter_sim::StatevectorBackend;
use qos_compile::{CompileError, Compiler, analyze};
use qos_hal::SimulationBackend;
use qos_ir::{CompiledCircuit, GateSpec, Instruction, QubitId};

const NUM_QUBITS: u32 = 3;

/// Gates biased toward cancellable and mergeable neighbours.
fn arb_gate() -> impl Strategy<Value = GateSpec> {
    prop_oneof![
        Just(GateSpec::H),
        Just(GateSpec::X),
        Just(GateSpec::Y),
        Just(GateSpec::Z),
        Just(GateSpec::T),
        Just(GateSpec::S),
        Just(GateSpec::CNOT),
        Just(GateSpec::CZ),
        Just(GateSpec::Swap),
        (-3.0f64..3.0).prop_map(GateSpec::Rx),
        (-3.0f64..3.0).prop_map(GateSpec::Ry),
        (-3.0f64..3.0).prop_map(GateSpec::Rz),
        (-1.0f64..1.0).prop_map(GateSpec::ZPow),
    ]
}

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    (arb_gate(), 0..NUM_QUBITS, 1..NUM_QUBITS).prop_map(|(gate, a, offset)| {
        let targets = if gate.arity() == 1 {
            vec![QubitId(a)]
        } else {
            vec![QubitId(a), QubitId((a + offset) % NUM_QUBITS)]
        };
        Instruction::new(gate, targets).unwrap()
    })
}

fn amplitudes(circuit: &CompiledCircuit) -> Vec<num_complex::Complex64> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime
        .block_on(StatevectorBackend::new().simulate(circuit, NUM_QUBITS))
        .unwrap()
        .into_inner()
}

proptest! {
    #[test]
    fn test_optimized_circuit_is_equivalent(
        program in prop::collection::vec(arb_instruction(), 0..30),
        level in 0_u8..=2,
    ) {
        let compiler = Compiler::for_device(NUM_QUBITS).with_optimization_level(level);
        let circuit = compiler.compile_program(&program).unwrap();
        let optimized = compiler.optimize_circuit(&circuit).unwrap();

        prop_assert!(optimized.len() <= circuit.len());
        prop_assert!(compiler.validate_circuit(&optimized));

        let before = amplitudes(&circuit);
        let after = amplitudes(&optimized);
        for (a, b) in before.iter().zip(&after) {
            prop_assert!((a - b).norm() < 1e-9, "{a} != {b}");
        }
    }

    #[test]
    fn test_compile_is_one_to_one(
        program in prop::collection::vec(arb_instruction(), 0..30),
    ) {
        let circuit = Compiler::new().compile_program(&program).unwrap();
        prop_assert_eq!(circuit.len(), program.len());
        for (op, inst) in circuit.iter().zip(&program) {
            prop_assert_eq!(op.as_gate(), Some(inst.kind()));
            prop_assert_eq!(op.targets.as_slice(), inst.targets());
        }
        prop_assert_eq!(analyze(&circuit).depth, circuit.depth());
    }
}

const SINGLE_QUBIT_KINDS: [GateSpec; 6] = [
    GateSpec::H,
    GateSpec::X,
    GateSpec::Y,
    GateSpec::Z,
    GateSpec::T,
    GateSpec::S,
];

const TWO_QUBIT_KINDS: [GateSpec; 3] = [GateSpec::CNOT, GateSpec::CZ, GateSpec::Swap];

#[test]
fn test_adjacent_pairs_compile_until_bound() {
    // Adjacent pairs (i, i+1) are accepted for every i + 1 < N and the first
    // out-of-range pair is rejected explicitly.
    let n = 5;
    let compiler = Compiler::for_device(n);
    for gate in TWO_QUBIT_KINDS {
        for i in 0..n {
            let program = vec![Instruction::pair(gate, QubitId(i), QubitId(i + 1)).unwrap()];
            let result = compiler.compile_program(&program);
            if i + 1 < n {
                let circuit = result.unwrap();
                assert_eq!(circuit.len(), 1);
                assert_eq!(circuit.operations()[0].as_gate(), Some(&gate));
                assert_eq!(
                    circuit.operations()[0].targets,
                    vec![QubitId(i), QubitId(i + 1)]
                );
            } else {
                assert!(matches!(
                    result,
                    Err(CompileError::QubitOutOfRange { num_qubits: 5, .. })
                ));
            }
        }
    }
}

#[test]
fn test_single_qubit_compile() {
    let compiler = Compiler::for_device(4);
    for gate in SINGLE_QUBIT_KINDS {
        for q in 0..4 {
            let program = vec![Instruction::single(gate, QubitId(q)).unwrap()];
            let circuit = compiler.compile_program(&program).unwrap();
            assert_eq!(circuit.len(), 1);
            assert_eq!(circuit.operations()[0].as_gate(), Some(&gate));
            assert_eq!(circuit.operations()[0].targets, vec![QubitId(q)]);
        }
    }
}
