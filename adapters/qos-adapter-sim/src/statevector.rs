//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;

use qos_ir::{GateSpec, NoiseChannel, Operation, OperationKind};

/// A statevector representing a quantum state.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Consume the statevector, returning its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Apply one circuit operation. Noise channels draw their Kraus branch
    /// from `rng`.
    ///
    /// Targets must already be checked against the register width and the
    /// operation's arity.
    pub fn apply(&mut self, op: &Operation, rng: &mut impl Rng) {
        let qubits: Vec<usize> = op.targets.iter().map(|q| q.index()).collect();
        match &op.kind {
            OperationKind::Gate(gate) => self.apply_gate(gate, &qubits),
            OperationKind::Noise(channel) => self.apply_channel(channel, qubits[0], rng),
        }
    }

    /// Apply a gate to specific qubits.
    pub fn apply_gate(&mut self, gate: &GateSpec, qubits: &[usize]) {
        match gate {
            GateSpec::H => self.apply_h(qubits[0]),
            GateSpec::X => self.apply_x(qubits[0]),
            GateSpec::Y => self.apply_y(qubits[0]),
            GateSpec::Z => self.apply_phase(qubits[0], PI),
            GateSpec::S => self.apply_phase(qubits[0], PI / 2.0),
            GateSpec::T => self.apply_phase(qubits[0], PI / 4.0),
            GateSpec::Rx(theta) => self.apply_rx(qubits[0], *theta),
            GateSpec::Ry(theta) => self.apply_ry(qubits[0], *theta),
            GateSpec::Rz(theta) => self.apply_rz(qubits[0], *theta),
            GateSpec::ZPow(t) => self.apply_phase(qubits[0], PI * t),
            GateSpec::CNOT => self.apply_cx(qubits[0], qubits[1]),
            GateSpec::CZ => self.apply_cz(qubits[0], qubits[1]),
            GateSpec::Swap => self.apply_swap(qubits[0], qubits[1]),
        }
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    /// Multiply the `|1⟩` component by `e^{iθ}`.
    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, q1: usize, q2: usize) {
        let mask = (1 << q1) | (1 << q2);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // Noise channels (one quantum trajectory)
    // =========================================================================

    /// Probability of measuring `qubit` in `|1⟩`.
    fn excited_population(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Apply a damping channel by sampling one of its two Kraus operators.
    ///
    /// Both channels share `K0 = diag(1, sqrt(1-γ))`. The jump operator is
    /// `|0⟩⟨1|·sqrt(γ)` for amplitude damping and `|1⟩⟨1|·sqrt(γ)` for phase
    /// damping; either fires with probability `γ·P(|1⟩)`.
    pub fn apply_channel(&mut self, channel: &NoiseChannel, qubit: usize, rng: &mut impl Rng) {
        let gamma = channel.gamma().clamp(0.0, 1.0);
        if gamma == 0.0 {
            return;
        }
        let mask = 1 << qubit;
        let jump_probability = gamma * self.excited_population(qubit);

        if jump_probability > 0.0 && rng.r#gen::<f64>() < jump_probability {
            match channel {
                NoiseChannel::AmplitudeDamping { .. } => {
                    for i in 0..self.amplitudes.len() {
                        if i & mask != 0 {
                            let j = i & !mask;
                            self.amplitudes[j] = self.amplitudes[i];
                            self.amplitudes[i] = Complex64::new(0.0, 0.0);
                        }
                    }
                }
                NoiseChannel::PhaseDamping { .. } => {
                    for (i, amp) in self.amplitudes.iter_mut().enumerate() {
                        if i & mask == 0 {
                            *amp = Complex64::new(0.0, 0.0);
                        }
                    }
                }
            }
        } else {
            let decay = (1.0 - gamma).sqrt();
            for (i, amp) in self.amplitudes.iter_mut().enumerate() {
                if i & mask != 0 {
                    *amp *= decay;
                }
            }
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        let norm = self
            .amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Sample a measurement outcome.
    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Rounding can leave the cumulative sum just below 1.
        self.amplitudes.len() - 1
    }

    /// Convert measurement outcome to a bitstring, qubit 0 first.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        (0..self.num_qubits)
            .map(|q| if (outcome >> q) & 1 == 1 { '1' } else { '0' })
            .collect()
    }
}
