//! Runtime configuration
//!
//! Device enumeration is an external collaborator: the platform and device
//! capability numbers arrive here as already-known values, either from a
//! JSON descriptor file or from the built-in host defaults. The query layer
//! treats them as an immutable set after initialization.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use prism_core::{Error, NamedVersion, Result, Version};

use crate::device::DeviceKind;

/// Full runtime descriptor: one platform plus its devices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// The platform descriptor
    pub platform: PlatformConfig,
    /// Device descriptors, in discovery order
    pub devices: Vec<DeviceConfig>,
}

/// Platform descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platform name
    pub name: String,
    /// Platform vendor
    pub vendor: String,
    /// Supported profile
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Numeric platform version
    pub version: Version,
    /// Human-readable version line reported by the version property
    pub version_string: String,
    /// Extensions with the specification version each implements
    #[serde(default)]
    pub extensions: Vec<NamedVersion>,
    /// Host timer resolution in nanoseconds; absent when the host cannot
    /// report one (the property then returns `Unimplemented`)
    #[serde(default)]
    pub host_timer_resolution: Option<u64>,
}

/// Device descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device name
    pub name: String,
    /// Device vendor string
    pub vendor: String,
    /// Device category
    pub kind: DeviceKind,
    /// Parallel compute units
    pub compute_units: u32,
    /// Maximum clock frequency in MHz
    pub clock_mhz: u32,
    /// Global memory size in bytes
    pub global_memory: u64,
    /// Largest single allocation in bytes
    pub max_allocation: u64,
    /// Maximum work-item extent per dimension
    #[serde(default = "default_work_item_sizes")]
    pub work_item_sizes: Vec<u64>,
    /// Whether the device is currently available
    #[serde(default = "default_true")]
    pub available: bool,
    /// Whether this device shares a package with the host CPU; feeds the
    /// default-device fallback heuristic
    #[serde(default)]
    pub integrated: bool,
    /// Whether this device is the default device
    #[serde(default, rename = "default")]
    pub is_default: bool,
    /// Device extensions; `None` inherits the platform's list
    #[serde(default)]
    pub extensions: Option<Vec<NamedVersion>>,
}

fn default_profile() -> String {
    "FULL_PROFILE".to_string()
}

fn default_work_item_sizes() -> Vec<u64> {
    vec![1024, 1024, 64]
}

fn default_true() -> bool {
    true
}

impl RuntimeConfig {
    /// Load a descriptor from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse a descriptor from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RuntimeConfig =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in single-GPU descriptor set
    ///
    /// Fixed constants standing in for a real discovery pass, matching the
    /// shape of a unified-memory desktop GPU.
    pub fn host_default() -> Self {
        let v1 = Version::with_patch(1, 0, 0);
        let extensions = [
            "ext_3d_image_writes",
            "ext_byte_addressable_store",
            "ext_device_uuid",
            "ext_extended_versioning",
            "ext_fp16",
            "ext_fp64",
            "ext_il_program",
            "ext_subgroups",
            "ext_subgroup_ballot",
            "ext_subgroup_shuffle",
        ]
        .iter()
        .map(|name| NamedVersion::new(v1, *name))
        .collect::<Vec<_>>();

        RuntimeConfig {
            platform: PlatformConfig {
                name: "Prism".to_string(),
                vendor: "Prism Project".to_string(),
                profile: default_profile(),
                version: Version::with_patch(3, 0, 12),
                version_string: "Prism 3.0 (Sep 15 2022 21:00:00)".to_string(),
                extensions,
                host_timer_resolution: Some(41),
            },
            devices: vec![DeviceConfig {
                name: "Prism Unified GPU".to_string(),
                vendor: "Prism Project".to_string(),
                kind: DeviceKind::Gpu,
                compute_units: 8,
                clock_mhz: 1296,
                global_memory: 16 * 1024 * 1024 * 1024,
                max_allocation: 4 * 1024 * 1024 * 1024,
                work_item_sizes: default_work_item_sizes(),
                available: true,
                integrated: false,
                is_default: true,
                extensions: None,
            }],
        }
    }

    /// Check descriptor consistency
    ///
    /// At most one device may be flagged default; when none is, the runtime
    /// falls back to its best-candidate scan.
    pub fn validate(&self) -> Result<()> {
        if self.devices.is_empty() {
            return Err(Error::Config("no devices configured".to_string()));
        }
        let defaults = self.devices.iter().filter(|d| d.is_default).count();
        if defaults > 1 {
            return Err(Error::Config(format!(
                "{} devices flagged default, expected at most one",
                defaults
            )));
        }
        for device in &self.devices {
            if device.work_item_sizes.is_empty() {
                return Err(Error::Config(format!(
                    "device '{}' has no work-item sizes",
                    device.name
                )));
            }
        }
        Ok(())
    }
}
