//! Argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use qos_device::DeviceKind;

/// QOS - virtual quantum execution core
#[derive(Parser, Debug)]
#[command(name = "qos")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the device registry
    #[arg(long, env = "QOS_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a virtual device
    InitDevice {
        /// Number of qubits
        #[arg(long)]
        num_qubits: u32,

        /// Device name
        #[arg(long, default_value = "default")]
        name: String,

        /// Device kind (gate-based, annealing)
        #[arg(long, default_value = "gate-based")]
        kind: DeviceKind,

        /// T1 relaxation time
        #[arg(long)]
        t1: Option<f64>,

        /// T2 dephasing time
        #[arg(long)]
        t2: Option<f64>,

        /// Extra dephasing exponent
        #[arg(long)]
        dephasing: Option<f64>,
    },

    /// Run a circuit file on a device
    RunCircuit {
        /// Circuit file (JSON)
        file: PathBuf,

        /// Device to run on
        #[arg(short, long, default_value = "default")]
        device: String,

        /// Sample this many shots instead of printing the state
        #[arg(short, long)]
        shots: Option<u32>,

        /// Optimization level (0-2)
        #[arg(short = 'O', long, default_value = "0")]
        optimization_level: u8,

        /// Kernel configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for the simulator's random number generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List registered devices
    ListDevices,

    /// Optimize a circuit file
    Compile {
        /// Circuit file (JSON)
        file: PathBuf,

        /// Optimization level (0-2)
        #[arg(short = 'O', long, default_value = "2")]
        optimization_level: u8,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reject qubits at or beyond this bound
        #[arg(long)]
        num_qubits: Option<u32>,
    },

    /// Report depth, gate counts and potential issues
    Analyze {
        /// Circuit file (JSON)
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
