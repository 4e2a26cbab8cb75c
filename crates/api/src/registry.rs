//! Capability registry
//!
//! Per entity kind, a fixed table built once at first use, mapping each
//! supported property identifier to a pure function of entity state. The
//! boundary layer maps an absent identifier to `InvalidValue`; no
//! distinction is made between "unsupported" and "unknown".
//!
//! Two lookups for the same identifier on the same entity produce
//! bit-identical values: every accessor reads immutable entity state.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use prism_core::{CapabilityValue, Error, Result};

use crate::device::Device;
use crate::platform::Platform;

/// Property identifiers
///
/// Raw `u32` identifiers, part of the ABI contract.
pub mod props {
    /// Platform profile string
    pub const PLATFORM_PROFILE: u32 = 0x0900;
    /// Platform version line
    pub const PLATFORM_VERSION: u32 = 0x0901;
    /// Platform name
    pub const PLATFORM_NAME: u32 = 0x0902;
    /// Platform vendor
    pub const PLATFORM_VENDOR: u32 = 0x0903;
    /// Platform extension names
    pub const PLATFORM_EXTENSIONS: u32 = 0x0904;
    /// Host timer resolution in nanoseconds
    pub const PLATFORM_HOST_TIMER_RESOLUTION: u32 = 0x0905;
    /// Packed numeric platform version
    pub const PLATFORM_NUMERIC_VERSION: u32 = 0x0906;
    /// Platform extensions as name/version records
    pub const PLATFORM_EXTENSIONS_WITH_VERSION: u32 = 0x0907;

    /// Device category bits
    pub const DEVICE_TYPE: u32 = 0x1000;
    /// PCI vendor id
    pub const DEVICE_VENDOR_ID: u32 = 0x1001;
    /// Parallel compute units
    pub const DEVICE_MAX_COMPUTE_UNITS: u32 = 0x1002;
    /// Number of work-item dimensions
    pub const DEVICE_MAX_WORK_ITEM_DIMENSIONS: u32 = 0x1003;
    /// Largest work-group extent
    pub const DEVICE_MAX_WORK_GROUP_SIZE: u32 = 0x1004;
    /// Maximum work-item extent per dimension
    pub const DEVICE_MAX_WORK_ITEM_SIZES: u32 = 0x1005;
    /// Maximum clock frequency in MHz
    pub const DEVICE_MAX_CLOCK_FREQUENCY: u32 = 0x100C;
    /// Largest single allocation in bytes
    pub const DEVICE_MAX_MEM_ALLOC_SIZE: u32 = 0x1010;
    /// Global memory size in bytes
    pub const DEVICE_GLOBAL_MEM_SIZE: u32 = 0x101F;
    /// Profiling timer resolution (unavailable on this host)
    pub const DEVICE_PROFILING_TIMER_RESOLUTION: u32 = 0x1025;
    /// Whether the device is available
    pub const DEVICE_AVAILABLE: u32 = 0x1027;
    /// Device name
    pub const DEVICE_NAME: u32 = 0x102B;
    /// Device vendor string
    pub const DEVICE_VENDOR: u32 = 0x102C;
    /// Device version line
    pub const DEVICE_VERSION: u32 = 0x102D;
    /// Device profile string
    pub const DEVICE_PROFILE: u32 = 0x102E;
    /// Device extension names
    pub const DEVICE_EXTENSIONS: u32 = 0x1030;
    /// Partitioning properties (unavailable on this host)
    pub const DEVICE_PARTITION_PROPERTIES: u32 = 0x1044;
    /// Packed numeric device version
    pub const DEVICE_NUMERIC_VERSION: u32 = 0x105E;
    /// Device extensions as name/version records
    pub const DEVICE_EXTENSIONS_WITH_VERSION: u32 = 0x1060;
}

/// A pure accessor producing a platform property value
pub type PlatformPropertyFn = fn(&Platform) -> Result<CapabilityValue>;

/// A pure accessor producing a device property value
pub type DevicePropertyFn = fn(&Device) -> Result<CapabilityValue>;

static PLATFORM_TABLE: Lazy<FxHashMap<u32, PlatformPropertyFn>> = Lazy::new(|| {
    let mut table: FxHashMap<u32, PlatformPropertyFn> = FxHashMap::default();
    table.insert(props::PLATFORM_PROFILE, |p| Ok(p.profile().into()));
    table.insert(props::PLATFORM_VERSION, |p| Ok(p.version_string().into()));
    table.insert(props::PLATFORM_NAME, |p| Ok(p.name().into()));
    table.insert(props::PLATFORM_VENDOR, |p| Ok(p.vendor().into()));
    table.insert(props::PLATFORM_EXTENSIONS, |p| {
        Ok(CapabilityValue::TextArray(p.extension_names().to_vec()))
    });
    table.insert(props::PLATFORM_HOST_TIMER_RESOLUTION, |p| {
        p.host_timer_resolution().map(CapabilityValue::U64)
    });
    table.insert(props::PLATFORM_NUMERIC_VERSION, |p| {
        Ok(CapabilityValue::U32(p.numeric_version().pack()))
    });
    table.insert(props::PLATFORM_EXTENSIONS_WITH_VERSION, |p| {
        Ok(CapabilityValue::NamedVersionArray(
            p.extensions_with_version().to_vec(),
        ))
    });
    table
});

static DEVICE_TABLE: Lazy<FxHashMap<u32, DevicePropertyFn>> = Lazy::new(|| {
    let mut table: FxHashMap<u32, DevicePropertyFn> = FxHashMap::default();
    table.insert(props::DEVICE_TYPE, |d| {
        Ok(CapabilityValue::U64(d.device_type().bits()))
    });
    table.insert(props::DEVICE_VENDOR_ID, |d| {
        Ok(CapabilityValue::U32(d.vendor_kind().vendor_id()))
    });
    table.insert(props::DEVICE_MAX_COMPUTE_UNITS, |d| {
        Ok(CapabilityValue::U32(d.compute_units()))
    });
    table.insert(props::DEVICE_MAX_WORK_ITEM_DIMENSIONS, |d| {
        Ok(CapabilityValue::U32(d.work_item_dimensions()))
    });
    table.insert(props::DEVICE_MAX_WORK_GROUP_SIZE, |d| {
        Ok(CapabilityValue::U64(d.max_work_group_size()))
    });
    table.insert(props::DEVICE_MAX_WORK_ITEM_SIZES, |d| {
        Ok(CapabilityValue::U64Array(d.work_item_sizes().to_vec()))
    });
    table.insert(props::DEVICE_MAX_CLOCK_FREQUENCY, |d| {
        Ok(CapabilityValue::U32(d.clock_mhz()))
    });
    table.insert(props::DEVICE_MAX_MEM_ALLOC_SIZE, |d| {
        Ok(CapabilityValue::U64(d.max_allocation()))
    });
    table.insert(props::DEVICE_GLOBAL_MEM_SIZE, |d| {
        Ok(CapabilityValue::U64(d.global_memory()))
    });
    table.insert(props::DEVICE_PROFILING_TIMER_RESOLUTION, |_| {
        Err(Error::Unimplemented("profiling timer resolution"))
    });
    table.insert(props::DEVICE_AVAILABLE, |d| {
        Ok(CapabilityValue::Bool(d.available()))
    });
    table.insert(props::DEVICE_NAME, |d| Ok(d.name().into()));
    table.insert(props::DEVICE_VENDOR, |d| Ok(d.vendor().into()));
    table.insert(props::DEVICE_VERSION, |d| Ok(d.version_string().into()));
    table.insert(props::DEVICE_PROFILE, |d| Ok(d.profile().into()));
    table.insert(props::DEVICE_EXTENSIONS, |d| {
        Ok(CapabilityValue::TextArray(d.extension_names().to_vec()))
    });
    table.insert(props::DEVICE_PARTITION_PROPERTIES, |_| {
        Err(Error::Unimplemented("device partitioning"))
    });
    table.insert(props::DEVICE_NUMERIC_VERSION, |d| {
        Ok(CapabilityValue::U32(d.numeric_version().pack()))
    });
    table.insert(props::DEVICE_EXTENSIONS_WITH_VERSION, |d| {
        Ok(CapabilityValue::NamedVersionArray(
            d.extensions_with_version().to_vec(),
        ))
    });
    table
});

/// Look up the accessor for a platform property identifier
pub fn platform_property(id: u32) -> Option<PlatformPropertyFn> {
    PLATFORM_TABLE.get(&id).copied()
}

/// Look up the accessor for a device property identifier
pub fn device_property(id: u32) -> Option<DevicePropertyFn> {
    DEVICE_TABLE.get(&id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use prism_core::Version;

    fn entities() -> (Platform, Device) {
        let config = RuntimeConfig::host_default();
        (
            Platform::from_config(&config.platform),
            Device::from_config(&config.devices[0], &config.platform),
        )
    }

    #[test]
    fn test_unknown_identifiers_are_absent() {
        assert!(platform_property(0xFFFF).is_none());
        assert!(device_property(0xFFFF).is_none());
        // Kind confusion: a device id is unknown to the platform table.
        assert!(platform_property(props::DEVICE_NAME).is_none());
        assert!(device_property(props::PLATFORM_NAME).is_none());
    }

    #[test]
    fn test_platform_text_properties() {
        let (platform, _) = entities();
        let f = platform_property(props::PLATFORM_NAME).unwrap();
        assert_eq!(f(&platform).unwrap(), CapabilityValue::from("Prism"));

        let f = platform_property(props::PLATFORM_PROFILE).unwrap();
        assert_eq!(f(&platform).unwrap(), CapabilityValue::from("FULL_PROFILE"));
    }

    #[test]
    fn test_platform_numeric_version_is_packed() {
        let (platform, _) = entities();
        let f = platform_property(props::PLATFORM_NUMERIC_VERSION).unwrap();
        assert_eq!(
            f(&platform).unwrap(),
            CapabilityValue::U32(Version::with_patch(3, 0, 12).pack())
        );
    }

    #[test]
    fn test_device_scalar_properties() {
        let (_, device) = entities();
        let f = device_property(props::DEVICE_MAX_COMPUTE_UNITS).unwrap();
        assert_eq!(f(&device).unwrap(), CapabilityValue::U32(8));

        let f = device_property(props::DEVICE_AVAILABLE).unwrap();
        assert_eq!(f(&device).unwrap(), CapabilityValue::Bool(true));

        let f = device_property(props::DEVICE_TYPE).unwrap();
        assert_eq!(
            f(&device).unwrap(),
            CapabilityValue::U64(crate::device::DeviceType::GPU.bits())
        );
    }

    #[test]
    fn test_device_array_properties() {
        let (_, device) = entities();
        let f = device_property(props::DEVICE_MAX_WORK_ITEM_SIZES).unwrap();
        assert_eq!(
            f(&device).unwrap(),
            CapabilityValue::U64Array(vec![1024, 1024, 64])
        );
    }

    #[test]
    fn test_unimplemented_properties_report_recoverably() {
        let (_, device) = entities();
        let f = device_property(props::DEVICE_PROFILING_TIMER_RESOLUTION).unwrap();
        assert!(matches!(f(&device), Err(Error::Unimplemented(_))));

        let f = device_property(props::DEVICE_PARTITION_PROPERTIES).unwrap();
        assert!(matches!(f(&device), Err(Error::Unimplemented(_))));
    }

    #[test]
    fn test_lookups_are_deterministic() {
        let (platform, device) = entities();
        let f = platform_property(props::PLATFORM_EXTENSIONS_WITH_VERSION).unwrap();
        assert_eq!(f(&platform).unwrap(), f(&platform).unwrap());

        let f = device_property(props::DEVICE_EXTENSIONS).unwrap();
        assert_eq!(f(&device).unwrap(), f(&device).unwrap());
    }
}
