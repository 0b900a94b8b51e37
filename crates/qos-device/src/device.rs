//! Virtual devices.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use qos_ir::{
    CompiledCircuit, DEFAULT_LAYER_DURATION, NoiseProfile, QubitId, apply_noise_profile,
    qubit_range,
};

use crate::error::{DeviceError, DeviceResult};

/// The execution model a device emulates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    /// Gate-model device.
    #[default]
    GateBased,
    /// Annealing device.
    Annealing,
}

impl DeviceKind {
    /// Name used in listings and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::GateBased => "gate-based",
            DeviceKind::Annealing => "annealing",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeviceKind {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gate-based" | "gate" => Ok(DeviceKind::GateBased),
            "annealing" => Ok(DeviceKind::Annealing),
            other => Err(DeviceError::Config(format!(
                "unknown device kind '{other}' (expected gate-based or annealing)"
            ))),
        }
    }
}

/// A named simulated device with a fixed qubit count and a noise profile.
///
/// The device owns qubit indices `[0, num_qubits)`. Its layer duration is the
/// time one noise layer spans when the profile is turned into channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DeviceFields")]
pub struct VirtualDevice {
    name: String,
    kind: DeviceKind,
    num_qubits: u32,
    #[serde(default, skip_serializing_if = "NoiseProfile::is_empty")]
    noise: NoiseProfile,
    #[serde(skip_serializing_if = "is_default_duration")]
    layer_duration: f64,
    #[serde(skip)]
    qubits: Vec<QubitId>,
}

fn default_duration() -> f64 {
    DEFAULT_LAYER_DURATION
}

fn is_default_duration(duration: &f64) -> bool {
    *duration == DEFAULT_LAYER_DURATION
}

#[derive(Deserialize)]
struct DeviceFields {
    name: String,
    #[serde(default)]
    kind: DeviceKind,
    num_qubits: u32,
    #[serde(default)]
    noise: NoiseProfile,
    #[serde(default = "default_duration")]
    layer_duration: f64,
}

impl TryFrom<DeviceFields> for VirtualDevice {
    type Error = DeviceError;

    fn try_from(raw: DeviceFields) -> DeviceResult<Self> {
        let mut device = VirtualDevice::new(raw.name, raw.kind, raw.num_qubits)?;
        device.noise = raw.noise;
        device.set_layer_duration(raw.layer_duration)?;
        Ok(device)
    }
}

impl VirtualDevice {
    /// Create a noiseless device.
    ///
    /// Fails with [`DeviceError::Config`] when `num_qubits` is zero.
    pub fn new(name: impl Into<String>, kind: DeviceKind, num_qubits: u32) -> DeviceResult<Self> {
        let name = name.into();
        if num_qubits == 0 {
            return Err(DeviceError::Config(format!(
                "device '{name}' must have at least one qubit"
            )));
        }
        Ok(Self {
            name,
            kind,
            num_qubits,
            noise: NoiseProfile::default(),
            layer_duration: DEFAULT_LAYER_DURATION,
            qubits: qubit_range(num_qubits),
        })
    }

    /// Device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Device kind.
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Current noise profile.
    pub fn noise(&self) -> &NoiseProfile {
        &self.noise
    }

    /// Duration of one noise layer, in the unit of T1 and T2.
    pub fn layer_duration(&self) -> f64 {
        self.layer_duration
    }

    /// Set the noise layer duration. It must be positive and finite.
    pub fn set_layer_duration(&mut self, duration: f64) -> DeviceResult<()> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(DeviceError::Config(format!(
                "layer duration must be positive, got {duration}"
            )));
        }
        self.layer_duration = duration;
        Ok(())
    }

    /// The qubits this device owns, `[0, num_qubits)`.
    pub fn available_qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Update the noise model.
    ///
    /// Only the provided fields change. A negative or non-finite value
    /// fails with [`DeviceError::Config`] and leaves the profile untouched.
    pub fn set_noise_model(
        &mut self,
        t1: Option<f64>,
        t2: Option<f64>,
        dephasing: Option<f64>,
    ) -> DeviceResult<()> {
        self.noise.merge(t1, t2, dephasing)?;
        info!(
            "Device '{}' noise model: T1={:?} T2={:?} dephasing={:?}",
            self.name,
            self.noise.t1(),
            self.noise.t2(),
            self.noise.dephasing()
        );
        Ok(())
    }

    /// Return a noise-augmented copy of `circuit`.
    ///
    /// Noise layers cover every device qubit and span the device's layer
    /// duration. The input is not modified.
    pub fn apply_noise(&self, circuit: &CompiledCircuit) -> CompiledCircuit {
        let noisy = apply_noise_profile(circuit, &self.noise, &self.qubits, self.layer_duration);
        debug!(
            "Device '{}' added {} noise operations",
            self.name,
            noisy.len() - circuit.len()
        );
        noisy
    }
}
