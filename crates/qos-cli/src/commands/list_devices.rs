//! `list-devices` command.

use std::path::Path;

use anyhow::Result;
use console::style;

use super::common::load_registry;
use super::init_device::fmt_field;

/// Execute the list-devices command.
pub fn execute(state_dir: &Path) -> Result<()> {
    let registry = load_registry(state_dir)?;

    if registry.is_empty() {
        println!(
            "{} No devices. Create one with {}",
            style("!").yellow().bold(),
            style("qos init-device --num-qubits N").cyan()
        );
        return Ok(());
    }

    println!("{}", style("Devices:").bold());
    println!(
        "  {:<16} {:<12} {:>6}  {:>8} {:>8} {:>10}",
        "NAME", "KIND", "QUBITS", "T1", "T2", "DEPHASING"
    );
    for device in registry.iter() {
        let noise = device.noise();
        println!(
            "  {} {:<12} {:>6}  {:>8} {:>8} {:>10}",
            style(format!("{:<16}", device.name())).green(),
            device.kind().as_str(),
            device.num_qubits(),
            fmt_field(noise.t1()),
            fmt_field(noise.t2()),
            fmt_field(noise.dephasing())
        );
    }
    Ok(())
}
