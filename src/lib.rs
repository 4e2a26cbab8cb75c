//! Prism - capability introspection for compute platforms and devices
//!
//! Prism answers "what can this platform or device do" through a fixed,
//! ABI-stable query convention: probe a property's encoded size, then fetch
//! it into a caller buffer. Entities cross the boundary as opaque,
//! reference-counted handles.
//!
//! ## Architecture
//!
//! - `prism-core`: version codec, capability values, wire protocol, errors
//! - `prism-api`: entities, handle bridge, registry, runtime, entry points
//!
//! ## Example
//!
//! ```
//! use prism::{Runtime, RuntimeConfig};
//! use prism::props;
//!
//! let rt = Runtime::new(RuntimeConfig::host_default()).unwrap();
//!
//! let mut size = 0;
//! rt.platform_info(rt.platform_handle(), props::PLATFORM_NAME, None, Some(&mut size))
//!     .unwrap();
//! let mut buf = vec![0u8; size];
//! rt.platform_info(rt.platform_handle(), props::PLATFORM_NAME, Some(&mut buf), None)
//!     .unwrap();
//! assert_eq!(buf.last(), Some(&0u8));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use prism_api::registry::props;
pub use prism_api::{
    current, initialize, teardown, Device, DeviceConfig, DeviceKind, DeviceType, Handle,
    HandleTable, Platform, PlatformConfig, Runtime, RuntimeConfig, Vendor,
};
pub use prism_core::{
    status_of, write_value, CapabilityValue, Error, NamedVersion, Result, StatusCode,
    Version, BOOL_WIRE_SIZE, NAME_VERSION_MAX_NAME_SIZE, NAME_VERSION_STRIDE,
};
