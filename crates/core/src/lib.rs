//! Core types and wire protocol for Prism
//!
//! This crate defines the foundational pieces of the capability
//! introspection system:
//! - Version: three-part version with the packed 32-bit codec
//! - NamedVersion: version/name pair for fixed-stride wire records
//! - CapabilityValue: closed tagged union over every property value shape
//! - wire: the two-phase size-probe/fetch serialization contract
//! - Error / StatusCode: error hierarchy and the boundary code vocabulary
//! - limits: frozen wire-format constants

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod value;
pub mod version;
pub mod wire;

// Re-export commonly used types at the crate root
pub use error::{status_of, Error, Result, StatusCode};
pub use limits::{BOOL_WIRE_SIZE, NAME_VERSION_MAX_NAME_SIZE, NAME_VERSION_STRIDE};
pub use value::CapabilityValue;
pub use version::{NamedVersion, Version};
pub use wire::write_value;
