//! Device entity and device-type selectors
//!
//! A `Device` is built once from its descriptor at initialization time and
//! is immutable afterwards; every property accessor is a pure read.
//! Reference counts live in the handle table, not here.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use prism_core::{NamedVersion, Version};

use crate::config::{DeviceConfig, PlatformConfig};

/// Device-category bit field used as the enumeration filter
///
/// `ALL` fills every bit and matches any category; do not treat it as a
/// distinct category of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceType(u64);

impl DeviceType {
    /// The default device
    pub const DEFAULT: DeviceType = DeviceType(1 << 0);
    /// Host CPU devices
    pub const CPU: DeviceType = DeviceType(1 << 1);
    /// GPU devices
    pub const GPU: DeviceType = DeviceType(1 << 2);
    /// Dedicated accelerators
    pub const ACCELERATOR: DeviceType = DeviceType(1 << 3);
    /// Vendor-custom devices
    pub const CUSTOM: DeviceType = DeviceType(1 << 4);
    /// Every category
    pub const ALL: DeviceType = DeviceType(0xFFFF_FFFF);

    /// The raw bit pattern
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Reconstruct a selector from raw bits
    #[inline]
    pub const fn from_bits(bits: u64) -> DeviceType {
        DeviceType(bits)
    }

    /// Whether every bit of `other` is set in `self`
    #[inline]
    pub const fn contains(self, other: DeviceType) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any bit of `other` is set in `self`
    #[inline]
    pub const fn intersects(self, other: DeviceType) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two selectors
    #[inline]
    pub const fn union(self, other: DeviceType) -> DeviceType {
        DeviceType(self.0 | other.0)
    }
}

/// Device category as written in descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Host CPU
    Cpu,
    /// GPU
    Gpu,
    /// Dedicated accelerator
    Accelerator,
    /// Vendor-custom device
    Custom,
}

impl DeviceKind {
    /// The selector bit for this category
    pub const fn device_type(self) -> DeviceType {
        match self {
            DeviceKind::Cpu => DeviceType::CPU,
            DeviceKind::Gpu => DeviceType::GPU,
            DeviceKind::Accelerator => DeviceType::ACCELERATOR,
            DeviceKind::Custom => DeviceType::CUSTOM,
        }
    }
}

/// Vendor classification for vendor-specific constants
///
/// Derived from the descriptor's vendor string; unrecognized vendors report
/// a zero vendor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    /// Intel
    Intel,
    /// AMD
    Amd,
    /// NVIDIA
    Nvidia,
    /// Apple
    Apple,
    /// Anything else
    Unknown,
}

impl Vendor {
    /// Classify a vendor string
    pub fn from_vendor_string(vendor: &str) -> Vendor {
        let lower = vendor.to_ascii_lowercase();
        if lower.contains("intel") {
            Vendor::Intel
        } else if lower.contains("amd") || lower.contains("advanced micro") {
            Vendor::Amd
        } else if lower.contains("nvidia") {
            Vendor::Nvidia
        } else if lower.contains("apple") {
            Vendor::Apple
        } else {
            Vendor::Unknown
        }
    }

    /// The PCI vendor id reported by the vendor-id property
    pub const fn vendor_id(self) -> u32 {
        match self {
            Vendor::Intel => 0x8086,
            Vendor::Amd => 0x1002,
            Vendor::Nvidia => 0x10DE,
            Vendor::Apple => 0x106B,
            Vendor::Unknown => 0,
        }
    }
}

/// A compute device exposed through the query API
///
/// Immutable after construction; the lazily-derived extension-name list is
/// memoized exactly once and reused.
pub struct Device {
    name: String,
    vendor: String,
    vendor_kind: Vendor,
    kind: DeviceKind,
    compute_units: u32,
    clock_mhz: u32,
    global_memory: u64,
    max_allocation: u64,
    work_item_sizes: Vec<u64>,
    available: bool,
    integrated: bool,
    profile: String,
    version_string: String,
    numeric_version: Version,
    extensions: Vec<NamedVersion>,
    extension_names: OnceCell<Vec<String>>,
}

impl Device {
    /// Build a device from its descriptor
    ///
    /// Profile, version, and (absent a device-specific list) extensions are
    /// inherited from the platform descriptor.
    pub fn from_config(config: &DeviceConfig, platform: &PlatformConfig) -> Device {
        Device {
            name: config.name.clone(),
            vendor: config.vendor.clone(),
            vendor_kind: Vendor::from_vendor_string(&config.vendor),
            kind: config.kind,
            compute_units: config.compute_units,
            clock_mhz: config.clock_mhz,
            global_memory: config.global_memory,
            max_allocation: config.max_allocation,
            work_item_sizes: config.work_item_sizes.clone(),
            available: config.available,
            integrated: config.integrated,
            profile: platform.profile.clone(),
            version_string: platform.version_string.clone(),
            numeric_version: platform.version,
            extensions: config
                .extensions
                .clone()
                .unwrap_or_else(|| platform.extensions.clone()),
            extension_names: OnceCell::new(),
        }
    }

    /// Device name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vendor string
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Vendor classification
    pub fn vendor_kind(&self) -> Vendor {
        self.vendor_kind
    }

    /// Device category
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Category selector bit for this device
    pub fn device_type(&self) -> DeviceType {
        self.kind.device_type()
    }

    /// Parallel compute units
    pub fn compute_units(&self) -> u32 {
        self.compute_units
    }

    /// Maximum clock frequency in MHz
    pub fn clock_mhz(&self) -> u32 {
        self.clock_mhz
    }

    /// Global memory size in bytes
    pub fn global_memory(&self) -> u64 {
        self.global_memory
    }

    /// Largest single allocation in bytes
    pub fn max_allocation(&self) -> u64 {
        self.max_allocation
    }

    /// Maximum work-item extent per dimension
    pub fn work_item_sizes(&self) -> &[u64] {
        &self.work_item_sizes
    }

    /// Number of work-item dimensions
    pub fn work_item_dimensions(&self) -> u32 {
        self.work_item_sizes.len() as u32
    }

    /// Largest single-dimension work-group extent
    pub fn max_work_group_size(&self) -> u64 {
        self.work_item_sizes.iter().copied().max().unwrap_or(1)
    }

    /// Whether the device is currently available
    pub fn available(&self) -> bool {
        self.available
    }

    /// Whether the device shares a package with the host CPU
    pub fn integrated(&self) -> bool {
        self.integrated
    }

    /// Supported profile
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Human-readable version line
    pub fn version_string(&self) -> &str {
        &self.version_string
    }

    /// Numeric version
    pub fn numeric_version(&self) -> Version {
        self.numeric_version
    }

    /// Extensions with their specification versions
    pub fn extensions_with_version(&self) -> &[NamedVersion] {
        &self.extensions
    }

    /// Extension names, memoized on first use
    pub fn extension_names(&self) -> &[String] {
        self.extension_names
            .get_or_init(|| self.extensions.iter().map(|e| e.name.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;

    fn test_device() -> Device {
        let config = RuntimeConfig::host_default();
        Device::from_config(&config.devices[0], &config.platform)
    }

    #[test]
    fn test_device_type_bits() {
        assert!(DeviceType::ALL.contains(DeviceType::GPU));
        assert!(DeviceType::ALL.contains(DeviceType::CUSTOM));
        assert!(!DeviceType::GPU.contains(DeviceType::CPU));
        assert!(DeviceType::GPU
            .union(DeviceType::DEFAULT)
            .intersects(DeviceType::DEFAULT));
        assert_eq!(DeviceType::from_bits(DeviceType::GPU.bits()), DeviceType::GPU);
    }

    #[test]
    fn test_device_kind_maps_to_selector() {
        assert_eq!(DeviceKind::Cpu.device_type(), DeviceType::CPU);
        assert_eq!(DeviceKind::Gpu.device_type(), DeviceType::GPU);
        assert_eq!(DeviceKind::Accelerator.device_type(), DeviceType::ACCELERATOR);
        assert_eq!(DeviceKind::Custom.device_type(), DeviceType::CUSTOM);
    }

    #[test]
    fn test_vendor_classification() {
        assert_eq!(Vendor::from_vendor_string("Intel Corporation"), Vendor::Intel);
        assert_eq!(Vendor::from_vendor_string("Advanced Micro Devices"), Vendor::Amd);
        assert_eq!(Vendor::from_vendor_string("NVIDIA"), Vendor::Nvidia);
        assert_eq!(Vendor::from_vendor_string("Apple"), Vendor::Apple);
        assert_eq!(Vendor::from_vendor_string("Acme GPUs"), Vendor::Unknown);
    }

    #[test]
    fn test_vendor_ids() {
        assert_eq!(Vendor::Intel.vendor_id(), 0x8086);
        assert_eq!(Vendor::Amd.vendor_id(), 0x1002);
        assert_eq!(Vendor::Nvidia.vendor_id(), 0x10DE);
        assert_eq!(Vendor::Apple.vendor_id(), 0x106B);
        assert_eq!(Vendor::Unknown.vendor_id(), 0);
    }

    #[test]
    fn test_device_inherits_platform_fields() {
        let device = test_device();
        assert_eq!(device.profile(), "FULL_PROFILE");
        assert_eq!(device.numeric_version(), Version::with_patch(3, 0, 12));
        assert!(!device.extensions_with_version().is_empty());
    }

    #[test]
    fn test_derived_work_group_fields() {
        let device = test_device();
        assert_eq!(device.work_item_dimensions(), 3);
        assert_eq!(device.max_work_group_size(), 1024);
    }

    #[test]
    fn test_extension_names_memoized() {
        let device = test_device();
        let first = device.extension_names().as_ptr();
        let second = device.extension_names().as_ptr();
        assert_eq!(first, second);
        assert!(device
            .extension_names()
            .iter()
            .any(|n| n == "ext_fp16"));
    }

    #[test]
    fn test_device_specific_extensions_override_platform() {
        let config = RuntimeConfig::host_default();
        let mut device_config = config.devices[0].clone();
        device_config.extensions = Some(vec![NamedVersion::new(
            Version::new(1, 0),
            "ext_only_here",
        )]);
        let device = Device::from_config(&device_config, &config.platform);
        assert_eq!(device.extension_names().to_vec(), vec!["ext_only_here".to_string()]);
    }
}
