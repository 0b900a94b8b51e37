//! `compile` command.

use std::path::Path;

use anyhow::Result;
use console::style;

use qos_compile::Compiler;
use qos_ir::CompiledCircuit;
use qos_ir::format::to_json;

use super::common::{load_circuit, save_circuit};

/// Load and optimize a circuit file.
pub fn compile_file(
    path: &Path,
    optimization_level: u8,
    num_qubits: Option<u32>,
) -> Result<(CompiledCircuit, CompiledCircuit)> {
    let circuit = load_circuit(path)?;

    let mut compiler = Compiler::new().with_optimization_level(optimization_level);
    if let Some(n) = num_qubits {
        compiler = compiler.with_num_qubits(n);
    }

    let report = compiler.validate_report(&circuit);
    if !report.is_valid() {
        anyhow::bail!("Invalid circuit: {}", report.reasons().join("; "));
    }

    let optimized = compiler.optimize_circuit(&circuit)?;
    Ok((circuit, optimized))
}

/// Execute the compile command.
pub fn execute(
    input: &Path,
    optimization_level: u8,
    output: Option<&Path>,
    num_qubits: Option<u32>,
) -> Result<()> {
    let (original, optimized) = compile_file(input, optimization_level, num_qubits)?;

    match output {
        Some(path) => {
            save_circuit(&optimized, path)?;
            eprintln!(
                "{} Compiled {} (level {}): {} → {} ops, depth {} → {}",
                style("✓").green().bold(),
                style(input.display()).green(),
                optimization_level,
                original.len(),
                optimized.len(),
                original.depth(),
                optimized.depth()
            );
            eprintln!("  Output: {}", style(path.display()).green());
        }
        None => println!("{}", to_json(&optimized)?),
    }
    Ok(())
}
