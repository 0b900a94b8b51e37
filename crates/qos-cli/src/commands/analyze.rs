//! `analyze` command.

use std::path::Path;

use anyhow::Result;
use console::style;

use qos_compile::{CircuitAnalysis, analyze};

use super::common::load_circuit;

/// Analyze a circuit file.
pub fn analyze_file(path: &Path) -> Result<CircuitAnalysis> {
    let circuit = load_circuit(path)?;
    Ok(analyze(&circuit))
}

/// Execute the analyze command.
pub fn execute(input: &Path, json: bool) -> Result<()> {
    let report = analyze_file(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        style("Circuit analysis:").bold(),
        style(input.display()).green()
    );
    println!("  Qubits:          {}", report.num_qubits);
    println!("  Depth:           {}", report.depth);
    println!("  Two-qubit gates: {}", report.two_qubit_gates);
    println!("  Noise channels:  {}", report.noise_operations);
    println!("  Gate counts:");
    for (name, count) in report.sorted_gate_counts() {
        println!("    {:<16} {}", name, count);
    }

    if report.has_issues() {
        println!("\n{}", style("Potential issues:").yellow().bold());
        for issue in &report.issues {
            println!("  {} {}", style("!").yellow(), issue);
        }
    } else {
        println!("\n{} No issues found", style("✓").green().bold());
    }
    Ok(())
}
