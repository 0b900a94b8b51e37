//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod compile;
pub mod init_device;
pub mod list_devices;
pub mod run_circuit;
