//! QOS Command-Line Interface

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use qos_cli::commands::{analyze, common, compile, init_device, list_devices, run_circuit};
use qos_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::InitDevice {
            num_qubits,
            name,
            kind,
            t1,
            t2,
            dephasing,
        } => {
            let state_dir = common::state_dir(cli.state_dir.as_deref())?;
            let options = init_device::InitOptions {
                name,
                kind,
                num_qubits,
                t1,
                t2,
                dephasing,
            };
            init_device::execute(&state_dir, &options)
        }

        Commands::RunCircuit {
            file,
            device,
            shots,
            optimization_level,
            config,
            seed,
        } => {
            let state_dir = common::state_dir(cli.state_dir.as_deref())?;
            let options = run_circuit::RunOptions {
                file,
                device,
                shots,
                optimization_level,
                config,
                seed,
            };
            run_circuit::execute(&state_dir, &options).await
        }

        Commands::ListDevices => {
            let state_dir = common::state_dir(cli.state_dir.as_deref())?;
            list_devices::execute(&state_dir)
        }

        Commands::Compile {
            file,
            optimization_level,
            output,
            num_qubits,
        } => compile::execute(&file, optimization_level, output.as_deref(), num_qubits),

        Commands::Analyze { file, json } => analyze::execute(&file, json),
    }
}
