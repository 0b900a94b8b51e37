//! `init-device` command.

use std::path::Path;

use anyhow::Result;
use console::style;
use tracing::info;

use qos_device::{DeviceKind, VirtualDevice};

use super::common::{load_registry, save_registry};

/// Parameters of a new device.
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub name: String,
    pub kind: DeviceKind,
    pub num_qubits: u32,
    pub t1: Option<f64>,
    pub t2: Option<f64>,
    pub dephasing: Option<f64>,
}

/// Register the device and persist the registry.
///
/// Nothing is written if the name is taken or a value is invalid.
pub fn init(state_dir: &Path, options: &InitOptions) -> Result<VirtualDevice> {
    let mut registry = load_registry(state_dir)?;
    let device = registry.create_device(options.name.clone(), options.kind, options.num_qubits)?;
    device.set_noise_model(options.t1, options.t2, options.dephasing)?;
    let device = device.clone();

    save_registry(state_dir, &registry)?;
    info!(name = %device.name(), "device saved");
    Ok(device)
}

/// Execute the init-device command.
pub fn execute(state_dir: &Path, options: &InitOptions) -> Result<()> {
    let device = init(state_dir, options)?;

    println!(
        "{} Created {} device {} with {} qubits",
        style("✓").green().bold(),
        device.kind(),
        style(device.name()).green(),
        device.num_qubits()
    );
    let noise = device.noise();
    if !noise.is_empty() {
        println!(
            "  Noise: T1={} T2={} dephasing={}",
            fmt_field(noise.t1()),
            fmt_field(noise.t2()),
            fmt_field(noise.dephasing())
        );
    }
    Ok(())
}

pub(crate) fn fmt_field(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
