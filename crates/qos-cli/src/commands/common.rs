//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;

use qos_device::DeviceRegistry;
use qos_hal::{AmplitudeVector, Counts};
use qos_ir::CompiledCircuit;
use qos_ir::format::{from_json, to_json};

/// File name of the persisted device registry.
pub const REGISTRY_FILE: &str = "devices.json";

/// Resolve the state directory: the explicit one if given, else `~/.qos/`.
pub fn state_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".qos"))
}

/// Load the device registry, or an empty one if none was saved yet.
pub fn load_registry(state_dir: &Path) -> Result<DeviceRegistry> {
    let path = state_dir.join(REGISTRY_FILE);
    if !path.exists() {
        return Ok(DeviceRegistry::new());
    }
    let source = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read registry: {}", path.display()))?;
    DeviceRegistry::from_json(&source)
        .with_context(|| format!("Corrupt registry: {}", path.display()))
}

/// Save the device registry, creating the state directory if needed.
pub fn save_registry(state_dir: &Path, registry: &DeviceRegistry) -> Result<()> {
    fs::create_dir_all(state_dir).with_context(|| {
        format!("Failed to create state directory: {}", state_dir.display())
    })?;
    let path = state_dir.join(REGISTRY_FILE);
    fs::write(&path, registry.to_json()?)
        .with_context(|| format!("Failed to write registry: {}", path.display()))
}

/// Load a circuit in the persisted JSON format.
pub fn load_circuit(path: &Path) -> Result<CompiledCircuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    from_json(&source).with_context(|| format!("Failed to load circuit: {}", path.display()))
}

/// Save a circuit in the persisted JSON format.
pub fn save_circuit(circuit: &CompiledCircuit, path: &Path) -> Result<()> {
    fs::write(path, to_json(circuit)?)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Print a measurement histogram.
pub fn print_counts(counts: &Counts) {
    let total = counts.total_shots();
    println!("\n{} Results ({} shots):", style("✓").green().bold(), total);

    for (bitstring, count) in counts.sorted().into_iter().take(16) {
        let prob = count as f64 / total as f64 * 100.0;
        let bar = "█".repeat((prob / 2.0).round() as usize);
        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }
    if counts.len() > 16 {
        println!("  ... and {} more outcomes", counts.len() - 16);
    }
}

/// Print the non-negligible amplitudes of a state.
pub fn print_state(state: &AmplitudeVector) {
    let n = state.num_qubits() as usize;
    println!(
        "\n{} Final state ({} qubits, {} amplitudes):",
        style("✓").green().bold(),
        n,
        state.len()
    );
    for (index, amp) in state.amplitudes().iter().enumerate() {
        let prob = amp.norm_sqr();
        if prob < 1e-12 {
            continue;
        }
        let label: String = (0..n)
            .map(|q| if (index >> q) & 1 == 1 { '1' } else { '0' })
            .collect();
        println!(
            "  |{}⟩: {:>+.6}{:>+.6}i  p={:.6}",
            style(label).cyan(),
            amp.re,
            amp.im,
            prob
        );
    }
}
