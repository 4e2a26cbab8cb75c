//! Entities, handle bridge, and query entry points for Prism
//!
//! This crate glues the core wire protocol to concrete entities:
//! - Platform / Device: the introspectable entities
//! - Handle / HandleTable: the opaque, reference-counted boundary tokens
//! - registry: fixed property-identifier tables per entity kind
//! - Runtime: one-time discovery, lifecycle, and the query entry points
//! - RuntimeConfig: descriptor loading (JSON file or host defaults)
//!
//! ## Quick start
//!
//! ```ignore
//! use prism_api::{initialize, current, teardown, RuntimeConfig};
//! use prism_api::registry::props;
//!
//! initialize(RuntimeConfig::host_default())?;
//! let rt = current()?;
//!
//! // Probe the size, then fetch.
//! let mut size = 0;
//! rt.platform_info(rt.platform_handle(), props::PLATFORM_NAME, None, Some(&mut size))?;
//! let mut buf = vec![0u8; size];
//! rt.platform_info(rt.platform_handle(), props::PLATFORM_NAME, Some(&mut buf), None)?;
//! teardown();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod device;
pub mod handle;
pub mod platform;
pub mod query;
pub mod registry;
pub mod runtime;

// Re-export commonly used types at the crate root
pub use config::{DeviceConfig, PlatformConfig, RuntimeConfig};
pub use device::{Device, DeviceKind, DeviceType, Vendor};
pub use handle::{Handle, HandleTable};
pub use platform::Platform;
pub use runtime::{current, initialize, teardown, Runtime};
