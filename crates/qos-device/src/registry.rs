//! Device registry.
//!
//! The [`DeviceRegistry`] maps names to [`VirtualDevice`]s and remembers
//! registration order. It serializes as an ordered device list, which is
//! how the command line keeps devices between invocations.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::device::{DeviceKind, VirtualDevice};
use crate::error::{DeviceError, DeviceResult};

/// Name → device map with stable listing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<VirtualDevice>", into = "Vec<VirtualDevice>")]
pub struct DeviceRegistry {
    devices: FxHashMap<String, VirtualDevice>,
    order: Vec<String>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a noiseless device.
    ///
    /// Fails with [`DeviceError::DuplicateName`] if the name is taken and
    /// with [`DeviceError::Config`] if `num_qubits` is zero; the registry is
    /// unchanged on failure.
    pub fn create_device(
        &mut self,
        name: impl Into<String>,
        kind: DeviceKind,
        num_qubits: u32,
    ) -> DeviceResult<&mut VirtualDevice> {
        let name = name.into();
        if self.devices.contains_key(&name) {
            return Err(DeviceError::DuplicateName(name));
        }
        let device = VirtualDevice::new(name, kind, num_qubits)?;
        self.insert(device)
    }

    /// Register an existing device under its own name.
    pub fn insert(&mut self, device: VirtualDevice) -> DeviceResult<&mut VirtualDevice> {
        let name = device.name().to_string();
        if self.devices.contains_key(&name) {
            return Err(DeviceError::DuplicateName(name));
        }
        debug!(
            "Registering device '{}' ({}, {} qubits)",
            name,
            device.kind(),
            device.num_qubits()
        );
        self.order.push(name.clone());
        Ok(self.devices.entry(name).or_insert(device))
    }

    /// Look up a device by name.
    pub fn get_device(&self, name: &str) -> Option<&VirtualDevice> {
        self.devices.get(name)
    }

    /// Look up a device by name for configuration.
    pub fn get_device_mut(&mut self, name: &str) -> Option<&mut VirtualDevice> {
        self.devices.get_mut(name)
    }

    /// Look up a device, failing with [`DeviceError::DeviceNotFound`].
    pub fn require(&self, name: &str) -> DeviceResult<&VirtualDevice> {
        self.get_device(name)
            .ok_or_else(|| DeviceError::DeviceNotFound(name.to_string()))
    }

    /// Device names in registration order.
    pub fn list_devices(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Devices in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &VirtualDevice> {
        self.order.iter().filter_map(|name| self.devices.get(name))
    }

    /// Check whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.devices.contains_key(name)
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no device is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Serialize the registry to pretty JSON.
    pub fn to_json(&self) -> DeviceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a registry from JSON produced by [`DeviceRegistry::to_json`].
    pub fn from_json(source: &str) -> DeviceResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

impl TryFrom<Vec<VirtualDevice>> for DeviceRegistry {
    type Error = DeviceError;

    fn try_from(devices: Vec<VirtualDevice>) -> DeviceResult<Self> {
        let mut registry = Self::new();
        for device in devices {
            registry.insert(device)?;
        }
        Ok(registry)
    }
}

impl From<DeviceRegistry> for Vec<VirtualDevice> {
    fn from(mut registry: DeviceRegistry) -> Self {
        registry
            .order
            .iter()
            .filter_map(|name| registry.devices.remove(name))
            .collect()
    }
}
