//! QOS command-line interface.
//!
//! The `qos` binary is a thin shell over the library crates. Device state
//! lives in `devices.json` under `$QOS_STATE_DIR` (default `~/.qos/`).

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
