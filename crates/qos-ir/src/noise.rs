//! Noise profiles and the noise-augmentation routine.
//!
//! A [`NoiseProfile`] describes non-ideal qubit behavior with up to three
//! independent parameters (T1 relaxation, T2 dephasing, extra dephasing).
//! It is realized by [`apply_noise_profile`], which appends noise layers to
//! a copy of a circuit. Virtual devices and the kernel both go through this
//! one routine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::circuit::{CompiledCircuit, Operation, OperationKind};
use crate::error::{IrError, IrResult};
use crate::gate::GateSpec;
use crate::qubit::QubitId;

/// Duration of one noise layer, in the same time unit as T1 and T2.
pub const DEFAULT_LAYER_DURATION: f64 = 1.0;

/// A single-qubit noise channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoiseChannel {
    /// Amplitude damping: energy relaxation (T1 decay).
    AmplitudeDamping {
        /// Decay probability (0.0 to 1.0).
        gamma: f64,
    },
    /// Phase damping: dephasing without energy loss (T2 decay).
    PhaseDamping {
        /// Dephasing probability (0.0 to 1.0).
        gamma: f64,
    },
}

impl NoiseChannel {
    /// Name used in listings and the persisted format.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseChannel::AmplitudeDamping { .. } => "amplitude_damp",
            NoiseChannel::PhaseDamping { .. } => "phase_damp",
        }
    }

    /// The channel's probability parameter.
    pub fn gamma(&self) -> f64 {
        match self {
            NoiseChannel::AmplitudeDamping { gamma } | NoiseChannel::PhaseDamping { gamma } => {
                *gamma
            }
        }
    }

    /// Check that the probability is finite and within `[0, 1]`.
    pub fn check(&self) -> IrResult<()> {
        let gamma = self.gamma();
        if !(0.0..=1.0).contains(&gamma) {
            return Err(IrError::InvalidNoise {
                field: "gamma",
                value: gamma,
            });
        }
        Ok(())
    }

    /// Resolve a persisted channel name.
    pub fn from_name(name: &str, gamma: f64) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "amplitude_damp" => Some(NoiseChannel::AmplitudeDamping { gamma }),
            "phase_damp" => Some(NoiseChannel::PhaseDamping { gamma }),
            _ => None,
        }
    }
}

impl fmt::Display for NoiseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(γ={:.4})", self.name(), self.gamma())
    }
}

/// Noise parameters of a device or task.
///
/// Every field is independently optional; present values are finite and
/// non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NoiseProfileFields")]
pub struct NoiseProfile {
    #[serde(rename = "T1", skip_serializing_if = "Option::is_none")]
    t1: Option<f64>,
    #[serde(rename = "T2", skip_serializing_if = "Option::is_none")]
    t2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dephasing: Option<f64>,
}

#[derive(Deserialize)]
struct NoiseProfileFields {
    #[serde(rename = "T1", default)]
    t1: Option<f64>,
    #[serde(rename = "T2", default)]
    t2: Option<f64>,
    #[serde(default)]
    dephasing: Option<f64>,
}

impl TryFrom<NoiseProfileFields> for NoiseProfile {
    type Error = IrError;

    fn try_from(raw: NoiseProfileFields) -> IrResult<Self> {
        NoiseProfile::new(raw.t1, raw.t2, raw.dephasing)
    }
}

impl NoiseProfile {
    /// Create a validated profile.
    pub fn new(t1: Option<f64>, t2: Option<f64>, dephasing: Option<f64>) -> IrResult<Self> {
        let mut profile = Self::default();
        profile.merge(t1, t2, dephasing)?;
        Ok(profile)
    }

    /// Profile with only T1 set.
    pub fn with_t1(t1: f64) -> IrResult<Self> {
        Self::new(Some(t1), None, None)
    }

    /// Merge the provided fields into this profile.
    ///
    /// Omitted fields keep their current value. If any provided value is
    /// invalid, nothing is changed.
    pub fn merge(
        &mut self,
        t1: Option<f64>,
        t2: Option<f64>,
        dephasing: Option<f64>,
    ) -> IrResult<()> {
        check_field("T1", t1)?;
        check_field("T2", t2)?;
        check_field("dephasing", dephasing)?;

        if t1.is_some() {
            self.t1 = t1;
        }
        if t2.is_some() {
            self.t2 = t2;
        }
        if dephasing.is_some() {
            self.dephasing = dephasing;
        }
        Ok(())
    }

    /// T1 relaxation time.
    pub fn t1(&self) -> Option<f64> {
        self.t1
    }

    /// T2 dephasing time.
    pub fn t2(&self) -> Option<f64> {
        self.t2
    }

    /// Extra per-qubit dephasing exponent.
    pub fn dephasing(&self) -> Option<f64> {
        self.dephasing
    }

    /// Check if no field is set.
    pub fn is_empty(&self) -> bool {
        self.t1.is_none() && self.t2.is_none() && self.dephasing.is_none()
    }
}

fn check_field(field: &'static str, value: Option<f64>) -> IrResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(IrError::InvalidNoise { field, value: v }),
        _ => Ok(()),
    }
}

/// Decay probability over `duration` for a process with time constant
/// `time_constant`: `1 - exp(-duration / time_constant)`.
///
/// A zero time constant means immediate decay.
pub fn damping_probability(duration: f64, time_constant: f64) -> f64 {
    if time_constant <= 0.0 {
        return 1.0;
    }
    (1.0 - (-duration / time_constant).exp()).clamp(0.0, 1.0)
}

/// Return a copy of `circuit` followed by the profile's noise layers.
///
/// Layers are appended on every qubit in `qubits`, in fixed order:
/// amplitude damping (T1), phase damping (T2), then a `Z^dephasing`
/// rotation. With an empty profile the result equals the input.
pub fn apply_noise_profile(
    circuit: &CompiledCircuit,
    profile: &NoiseProfile,
    qubits: &[QubitId],
    layer_duration: f64,
) -> CompiledCircuit {
    let mut noisy = circuit.clone();

    if let Some(t1) = profile.t1() {
        let gamma = damping_probability(layer_duration, t1);
        noisy.extend(
            qubits
                .iter()
                .map(|&q| Operation::noise(NoiseChannel::AmplitudeDamping { gamma }, q)),
        );
    }
    if let Some(t2) = profile.t2() {
        let gamma = damping_probability(layer_duration, t2);
        noisy.extend(
            qubits
                .iter()
                .map(|&q| Operation::noise(NoiseChannel::PhaseDamping { gamma }, q)),
        );
    }
    if let Some(exponent) = profile.dephasing() {
        noisy.extend(qubits.iter().map(|&q| Operation {
            kind: OperationKind::Gate(GateSpec::ZPow(exponent)),
            targets: vec![q],
        }));
    }

    noisy
}
