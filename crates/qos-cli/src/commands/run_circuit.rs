//! `run-circuit` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use console::style;
use tracing::debug;

use qos_adapter_sim::StatevectorBackend;
use qos_compile::Compiler;
use qos_hal::{AmplitudeVector, Counts};
use qos_kernel::{Kernel, KernelConfig, Task};

use super::common::{load_circuit, load_registry, print_counts, print_state};

/// Parameters of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub file: PathBuf,
    pub device: String,
    pub shots: Option<u32>,
    pub optimization_level: u8,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub enum RunOutput {
    State(AmplitudeVector),
    Counts(Counts),
}

/// Load, check and execute a circuit on a registered device.
pub async fn run(state_dir: &Path, options: &RunOptions) -> Result<RunOutput> {
    let registry = load_registry(state_dir)?;
    let device = registry.require(&options.device)?;

    let mut circuit = load_circuit(&options.file)?;
    let compiler = Compiler::for_device(device.num_qubits())
        .with_optimization_level(options.optimization_level);

    let report = compiler.validate_report(&circuit);
    if !report.is_valid() {
        anyhow::bail!(
            "Circuit does not fit device '{}': {}",
            device.name(),
            report.reasons().join("; ")
        );
    }
    if options.optimization_level > 0 {
        circuit = compiler.optimize_circuit(&circuit)?;
    }

    let mut config = match &options.config {
        Some(path) => KernelConfig::from_file(path)?,
        None => KernelConfig::from_env()?,
    };
    let width = device.num_qubits() as usize;
    if config.pool_size < width {
        debug!(pool_size = config.pool_size, width, "growing pool to device width");
        config.pool_size = width;
    }

    let mut backend = StatevectorBackend::new();
    if let Some(seed) = options.seed {
        backend = backend.with_seed(seed);
    }
    let kernel = Kernel::with_config(Arc::new(backend), config)?;
    let id = kernel.submit_task(Task::for_device(circuit, device))?;

    let output = match options.shots {
        Some(shots) => RunOutput::Counts(kernel.execute_task_sampled(id, shots).await?),
        None => RunOutput::State(kernel.execute_task(id).await?),
    };
    Ok(output)
}

/// Execute the run-circuit command.
pub async fn execute(state_dir: &Path, options: &RunOptions) -> Result<()> {
    println!(
        "{} Running {} on {}",
        style("→").cyan().bold(),
        style(options.file.display()).green(),
        style(&options.device).yellow()
    );

    match run(state_dir, options).await? {
        RunOutput::State(state) => print_state(&state),
        RunOutput::Counts(counts) => print_counts(&counts),
    }
    Ok(())
}
