//! Error types for the device crate.

use qos_ir::IrError;
use thiserror::Error;

/// Errors that can occur while creating or configuring devices.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeviceError {
    /// A device with this name is already registered.
    #[error("Device '{0}' already exists")]
    DuplicateName(String),

    /// No device with this name is registered.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Device or noise configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[source] IrError),

    /// Registry state could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<IrError> for DeviceError {
    fn from(err: IrError) -> Self {
        match err {
            IrError::InvalidNoise { .. } => DeviceError::Config(err.to_string()),
            other => DeviceError::Ir(other),
        }
    }
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;
