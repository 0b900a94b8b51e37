//! Instruction compiler.

use rustc_hash::FxHashSet;
use tracing::{debug, instrument, warn};

use qos_ir::{CATALOG, CompiledCircuit, GateSpec, Instruction, IrError, Operation, OperationKind};

use crate::error::{CompileError, CompileResult};
use crate::manager::{MAX_OPTIMIZATION_LEVEL, PassManagerBuilder};
use crate::validate::ValidationReport;

/// The set of gate kinds a compile target accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSet {
    names: FxHashSet<&'static str>,
}

impl GateSet {
    /// Every gate in the catalog.
    pub fn all() -> Self {
        Self {
            names: CATALOG.iter().copied().collect(),
        }
    }

    /// The unparametrized base catalog.
    pub fn base() -> Self {
        Self {
            names: ["h", "x", "y", "z", "t", "s", "cnot", "cz", "swap"]
                .into_iter()
                .collect(),
        }
    }

    /// Build a set from catalog names. Unknown names are rejected.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> CompileResult<Self> {
        let mut set = FxHashSet::default();
        for name in names {
            let lowered = name.to_ascii_lowercase();
            let canonical = if lowered == "cx" { "cnot" } else { lowered.as_str() };
            let known = CATALOG
                .iter()
                .find(|c| **c == canonical)
                .ok_or_else(|| IrError::InvalidGateKind(name.to_string()))?;
            set.insert(*known);
        }
        Ok(Self { names: set })
    }

    /// Check whether a gate kind is in the set.
    pub fn contains(&self, gate: &GateSpec) -> bool {
        self.names.contains(gate.name())
    }

    /// Number of gate kinds in the set.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for GateSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Translates instruction lists into compiled circuits.
///
/// A compiler carries the supported gate set, an optional device bound and
/// the optimization level used by [`Compiler::optimize_circuit`].
#[derive(Debug, Clone)]
pub struct Compiler {
    gate_set: GateSet,
    num_qubits: Option<u32>,
    optimization_level: u8,
}

impl Compiler {
    /// Compiler for the whole catalog with no device bound.
    pub fn new() -> Self {
        Self {
            gate_set: GateSet::all(),
            num_qubits: None,
            optimization_level: MAX_OPTIMIZATION_LEVEL,
        }
    }

    /// Compiler bounded to a device with `num_qubits` qubits.
    pub fn for_device(num_qubits: u32) -> Self {
        Self::new().with_num_qubits(num_qubits)
    }

    /// Set the device bound.
    #[must_use]
    pub fn with_num_qubits(mut self, num_qubits: u32) -> Self {
        self.num_qubits = Some(num_qubits);
        self
    }

    /// Restrict the supported gate set.
    #[must_use]
    pub fn with_gate_set(mut self, gate_set: GateSet) -> Self {
        self.gate_set = gate_set;
        self
    }

    /// Set the optimization level (0-2).
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(MAX_OPTIMIZATION_LEVEL);
        self
    }

    /// The device bound, if any.
    pub fn num_qubits(&self) -> Option<u32> {
        self.num_qubits
    }

    /// The supported gate set.
    pub fn gate_set(&self) -> &GateSet {
        &self.gate_set
    }

    /// Compile a program into a circuit with one operation per instruction,
    /// in input order.
    ///
    /// Fails on the first unsupported gate or out-of-range target; no
    /// partial circuit is returned.
    #[instrument(skip(self, program), fields(instructions = program.len()))]
    pub fn compile_program(&self, program: &[Instruction]) -> CompileResult<CompiledCircuit> {
        let mut circuit = CompiledCircuit::new();

        for inst in program {
            if !self.gate_set.contains(inst.kind()) {
                return Err(CompileError::UnsupportedGate(inst.name().to_string()));
            }
            if let Some(bound) = self.num_qubits {
                if let Some(q) = inst.targets().iter().find(|q| q.0 >= bound) {
                    return Err(CompileError::QubitOutOfRange {
                        qubit: *q,
                        num_qubits: bound,
                        gate_name: inst.name().to_string(),
                    });
                }
            }
            circuit.push(Operation::gate(*inst.kind(), inst.targets().iter().copied())?);
        }

        debug!(
            "Compiled {} instructions into circuit of depth {}",
            program.len(),
            circuit.depth()
        );
        Ok(circuit)
    }

    /// Return an optimized, functionally equivalent copy of `circuit`.
    #[instrument(skip(self, circuit), fields(level = self.optimization_level))]
    pub fn optimize_circuit(&self, circuit: &CompiledCircuit) -> CompileResult<CompiledCircuit> {
        let pm = PassManagerBuilder::new()
            .with_optimization_level(self.optimization_level)
            .build();
        let mut optimized = circuit.clone();
        pm.run(&mut optimized)?;
        Ok(optimized)
    }

    /// Check a circuit against this compiler's gate set and device bound.
    ///
    /// Never fails; problems are logged at `warn` and reported as `false`.
    pub fn validate_circuit(&self, circuit: &CompiledCircuit) -> bool {
        self.validate_report(circuit).is_valid()
    }

    /// Check a circuit and collect every problem found.
    pub fn validate_report(&self, circuit: &CompiledCircuit) -> ValidationReport {
        let mut report = ValidationReport::default();

        for (position, op) in circuit.iter().enumerate() {
            let name = op.name();
            let arity = op.kind.arity();
            if op.targets.len() != arity {
                report.push(format!(
                    "operation {position} ({name}) has {} targets, expected {arity}",
                    op.targets.len()
                ));
            }
            match &op.kind {
                OperationKind::Gate(gate) => {
                    if !self.gate_set.contains(gate) {
                        report.push(format!("operation {position} ({name}) is not supported"));
                    }
                }
                OperationKind::Noise(channel) => {
                    if let Err(err) = channel.check() {
                        report.push(format!("operation {position} ({name}): {err}"));
                    }
                }
            }
            if let Some(bound) = self.num_qubits {
                for q in op.targets.iter().filter(|q| q.0 >= bound) {
                    report.push(format!(
                        "operation {position} ({name}) targets {q}, device has {bound} qubits"
                    ));
                }
            }
        }

        for reason in report.reasons() {
            warn!("Circuit validation: {reason}");
        }
        report
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qos_ir::{NoiseChannel, QubitId};
    use std::collections::BTreeMap;

    fn bell_program() -> Vec<Instruction> {
        vec![
            Instruction::single(GateSpec::H, QubitId(0)).unwrap(),
            Instruction::pair(GateSpec::CNOT, QubitId(0), QubitId(1)).unwrap(),
        ]
    }

    #[test]
    fn test_compile_preserves_order() {
        let circuit = Compiler::new().compile_program(&bell_program()).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.operations()[0].as_gate(), Some(&GateSpec::H));
        assert_eq!(
            circuit.operations()[1].targets,
            vec![QubitId(0), QubitId(1)]
        );
    }

    #[test]
    fn test_compile_empty_program() {
        let circuit = Compiler::new().compile_program(&[]).unwrap();
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_compile_out_of_range() {
        let program = vec![
            Instruction::single(GateSpec::H, QubitId(0)).unwrap(),
            Instruction::pair(GateSpec::CNOT, QubitId(3), QubitId(4)).unwrap(),
        ];
        let err = Compiler::for_device(4).compile_program(&program);
        assert!(matches!(
            err,
            Err(CompileError::QubitOutOfRange { qubit: QubitId(4), num_qubits: 4, .. })
        ));
    }

    #[test]
    fn test_compile_unsupported_gate() {
        let params = BTreeMap::from([("theta".to_string(), 0.1)]);
        let program = vec![Instruction::create("rx", [QubitId(0)], Some(params)).unwrap()];
        let compiler = Compiler::new().with_gate_set(GateSet::base());
        assert!(matches!(
            compiler.compile_program(&program),
            Err(CompileError::UnsupportedGate(name)) if name == "rx"
        ));
    }

    #[test]
    fn test_gate_set_from_names() {
        let set = GateSet::from_names(["H", "cx"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&GateSpec::CNOT));
        assert!(!set.contains(&GateSpec::X));

        assert!(matches!(
            GateSet::from_names(["h", "toffoli"]),
            Err(CompileError::Ir(IrError::InvalidGateKind(_)))
        ));
    }

    #[test]
    fn test_validate() {
        let compiler = Compiler::for_device(2);
        let circuit = compiler.compile_program(&bell_program()).unwrap();
        assert!(compiler.validate_circuit(&circuit));

        let mut wide = circuit.clone();
        wide.push(Operation::gate(GateSpec::X, [QubitId(5)]).unwrap());
        let report = compiler.validate_report(&wide);
        assert!(!report.is_valid());
        assert_eq!(report.reasons().len(), 1);

        let mut broken = circuit;
        broken.push(Operation {
            kind: OperationKind::Gate(GateSpec::CZ),
            targets: vec![QubitId(0)],
        });
        assert!(!compiler.validate_circuit(&broken));
    }

    #[test]
    fn test_validate_noise_probability() {
        let compiler = Compiler::new();
        let mut circuit = CompiledCircuit::new();
        circuit.push(Operation::noise(NoiseChannel::PhaseDamping { gamma: 0.2 }, QubitId(0)));
        assert!(compiler.validate_circuit(&circuit));

        circuit.push(Operation::noise(
            NoiseChannel::AmplitudeDamping { gamma: 5.0 },
            QubitId(0),
        ));
        let report = compiler.validate_report(&circuit);
        assert_eq!(report.reasons().len(), 1);
        assert!(report.reasons()[0].contains("gamma"));
    }

    #[test]
    fn test_optimize_does_not_mutate_input() {
        let mut circuit = CompiledCircuit::new();
        circuit.push(Operation::gate(GateSpec::X, [QubitId(0)]).unwrap());
        circuit.push(Operation::gate(GateSpec::X, [QubitId(0)]).unwrap());

        let optimized = Compiler::new().optimize_circuit(&circuit).unwrap();
        assert!(optimized.is_empty());
        assert_eq!(circuit.len(), 2);

        let untouched = Compiler::new()
            .with_optimization_level(0)
            .optimize_circuit(&circuit)
            .unwrap();
        assert_eq!(untouched, circuit);
    }
}
