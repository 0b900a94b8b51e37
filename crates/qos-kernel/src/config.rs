//! Kernel configuration.
//!
//! Loaded from YAML, overridable through environment variables:
//!
//! ```yaml
//! pool_size: 16
//! max_queue_depth: 128
//! dispatch_timeout_ms: 30000
//! layer_duration: 1.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::error::{KernelError, KernelResult};

/// Default number of handles in the qubit pool.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Kernel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Number of qubit handles in the pool.
    pub pool_size: usize,

    /// Maximum number of queued or executing tasks. `None` means unbounded.
    pub max_queue_depth: Option<usize>,

    /// Upper bound on a single backend dispatch, in milliseconds.
    pub dispatch_timeout_ms: Option<u64>,

    /// Duration of one noise layer, in the unit of T1/T2.
    pub layer_duration: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            max_queue_depth: None,
            dispatch_timeout_ms: None,
            layer_duration: qos_ir::DEFAULT_LAYER_DURATION,
        }
    }
}

impl KernelConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(source: &str) -> KernelResult<Self> {
        let config: KernelConfig = serde_yaml_ng::from_str(source)
            .map_err(|e| KernelError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> KernelResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            KernelError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> KernelResult<Self> {
        let config = Self::default().with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `QOS_POOL_SIZE`, `QOS_MAX_QUEUE_DEPTH` and
    /// `QOS_DISPATCH_TIMEOUT_MS` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparsable values are ignored with a warning.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(size) = parse_var(&lookup, "QOS_POOL_SIZE") {
            self.pool_size = size;
        }
        if let Some(depth) = parse_var(&lookup, "QOS_MAX_QUEUE_DEPTH") {
            self.max_queue_depth = Some(depth);
        }
        if let Some(ms) = parse_var(&lookup, "QOS_DISPATCH_TIMEOUT_MS") {
            self.dispatch_timeout_ms = Some(ms);
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> KernelResult<()> {
        if self.pool_size == 0 {
            return Err(KernelError::Config("pool_size must be positive".into()));
        }
        if self.max_queue_depth == Some(0) {
            return Err(KernelError::Config(
                "max_queue_depth must be positive".into(),
            ));
        }
        if self.dispatch_timeout_ms == Some(0) {
            return Err(KernelError::Config(
                "dispatch_timeout_ms must be positive".into(),
            ));
        }
        if !self.layer_duration.is_finite() || self.layer_duration <= 0.0 {
            return Err(KernelError::Config(format!(
                "layer_duration must be positive, got {}",
                self.layer_duration
            )));
        }
        Ok(())
    }

    /// Dispatch timeout as a [`Duration`].
    pub fn dispatch_timeout(&self) -> Option<Duration> {
        self.dispatch_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}
