//! Property tests for device noise application.

use proptest::prelude::*;
use qos_device::{DeviceKind, VirtualDevice};
use qos_ir::{CompiledCircuit, GateSpec, Operation, QubitId};

fn arb_circuit(num_qubits: u32) -> impl Strategy<Value = CompiledCircuit> {
    let op = prop_oneof![
        (0..num_qubits).prop_map(|q| Operation::gate(GateSpec::H, [QubitId(q)]).unwrap()),
        (0..num_qubits).prop_map(|q| Operation::gate(GateSpec::T, [QubitId(q)]).unwrap()),
        (0..num_qubits, -3.0f64..3.0)
            .prop_map(|(q, t)| Operation::gate(GateSpec::Rx(t), [QubitId(q)]).unwrap()),
    ];
    prop::collection::vec(op, 0..15).prop_map(CompiledCircuit::from_operations)
}

proptest! {
    /// Applying noise twice yields equal circuits and never changes the
    /// input.
    #[test]
    fn test_apply_noise_is_referentially_transparent(
        num_qubits in 1_u32..6,
        seed_circuit in arb_circuit(1),
        t1 in prop::option::of(0.0f64..100.0),
        t2 in prop::option::of(0.0f64..100.0),
        dephasing in prop::option::of(0.0f64..1.0),
    ) {
        let mut device = VirtualDevice::new("p", DeviceKind::GateBased, num_qubits).unwrap();
        device.set_noise_model(t1, t2, dephasing).unwrap();

        let snapshot = seed_circuit.clone();
        let first = device.apply_noise(&seed_circuit);
        let second = device.apply_noise(&seed_circuit);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&seed_circuit, &snapshot);
        prop_assert_eq!(&first.operations()[..seed_circuit.len()], seed_circuit.operations());
    }

    /// Invalid updates are rejected as a whole.
    #[test]
    fn test_invalid_update_is_atomic(
        t1 in 0.0f64..100.0,
        bad in -100.0f64..-0.001,
    ) {
        let mut device = VirtualDevice::new("p", DeviceKind::GateBased, 2).unwrap();
        device.set_noise_model(Some(t1), None, None).unwrap();
        let before = *device.noise();

        prop_assert!(device.set_noise_model(Some(t1 + 1.0), Some(bad), None).is_err());
        prop_assert_eq!(*device.noise(), before);
    }
}
