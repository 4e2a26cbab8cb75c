//! Capability value types
//!
//! This module defines `CapabilityValue`: the closed tagged union over every
//! value shape a property lookup can produce. Each variant knows its exact
//! encoded size; serialization lives in the `wire` module.
//!
//! ## Shape rules
//!
//! - Integers carry their storage width in the variant tag; wire size is the
//!   storage width, never a variable-length encoding.
//! - Booleans occupy a fixed 4 bytes on the wire regardless of host width.
//! - Text is UTF-8 plus one terminating zero byte.
//! - Arrays are contiguous and order-preserving.
//!
//! Values are produced fresh per query from entity state; a value's wire
//! size is a pure function of its content.

use crate::limits::{BOOL_WIRE_SIZE, NAME_VERSION_STRIDE};
use crate::version::NamedVersion;

/// The tagged result of a property lookup, self-describing its wire size
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityValue {
    /// Boolean (4 bytes on the wire)
    Bool(bool),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Unsigned 64-bit integer
    U64(u64),
    /// Signed 32-bit integer
    I32(i32),
    /// Signed 64-bit integer
    I64(i64),
    /// UTF-8 text, zero-terminated on the wire
    Text(String),
    /// Array of unsigned 32-bit integers
    U32Array(Vec<u32>),
    /// Array of unsigned 64-bit integers
    U64Array(Vec<u64>),
    /// Array of strings, space-joined and zero-terminated on the wire
    TextArray(Vec<String>),
    /// Array of fixed-stride name/version records
    NamedVersionArray(Vec<NamedVersion>),
}

impl CapabilityValue {
    /// The exact number of bytes the encoded value occupies
    ///
    /// Deterministic and side-effect-free; callers use this in size-probe
    /// mode to learn the buffer size to allocate.
    pub fn wire_size(&self) -> usize {
        match self {
            CapabilityValue::Bool(_) => BOOL_WIRE_SIZE,
            CapabilityValue::U32(_) | CapabilityValue::I32(_) => 4,
            CapabilityValue::U64(_) | CapabilityValue::I64(_) => 8,
            // Bytes plus the terminating zero.
            CapabilityValue::Text(s) => s.len() + 1,
            CapabilityValue::U32Array(v) => v.len() * 4,
            CapabilityValue::U64Array(v) => v.len() * 8,
            // One separator or terminator byte per element.
            CapabilityValue::TextArray(v) => v.iter().map(|s| s.len() + 1).sum(),
            CapabilityValue::NamedVersionArray(v) => v.len() * NAME_VERSION_STRIDE,
        }
    }

    /// Get the shape name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CapabilityValue::Bool(_) => "Bool",
            CapabilityValue::U32(_) => "U32",
            CapabilityValue::U64(_) => "U64",
            CapabilityValue::I32(_) => "I32",
            CapabilityValue::I64(_) => "I64",
            CapabilityValue::Text(_) => "Text",
            CapabilityValue::U32Array(_) => "U32Array",
            CapabilityValue::U64Array(_) => "U64Array",
            CapabilityValue::TextArray(_) => "TextArray",
            CapabilityValue::NamedVersionArray(_) => "NamedVersionArray",
        }
    }
}

impl From<bool> for CapabilityValue {
    fn from(v: bool) -> Self {
        CapabilityValue::Bool(v)
    }
}

impl From<u32> for CapabilityValue {
    fn from(v: u32) -> Self {
        CapabilityValue::U32(v)
    }
}

impl From<u64> for CapabilityValue {
    fn from(v: u64) -> Self {
        CapabilityValue::U64(v)
    }
}

impl From<i32> for CapabilityValue {
    fn from(v: i32) -> Self {
        CapabilityValue::I32(v)
    }
}

impl From<i64> for CapabilityValue {
    fn from(v: i64) -> Self {
        CapabilityValue::I64(v)
    }
}

impl From<&str> for CapabilityValue {
    fn from(v: &str) -> Self {
        CapabilityValue::Text(v.to_string())
    }
}

impl From<String> for CapabilityValue {
    fn from(v: String) -> Self {
        CapabilityValue::Text(v)
    }
}

impl From<Vec<String>> for CapabilityValue {
    fn from(v: Vec<String>) -> Self {
        CapabilityValue::TextArray(v)
    }
}

impl From<Vec<NamedVersion>> for CapabilityValue {
    fn from(v: Vec<NamedVersion>) -> Self {
        CapabilityValue::NamedVersionArray(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;

    #[test]
    fn test_scalar_wire_sizes() {
        assert_eq!(CapabilityValue::Bool(true).wire_size(), 4);
        assert_eq!(CapabilityValue::U32(0).wire_size(), 4);
        assert_eq!(CapabilityValue::I32(0).wire_size(), 4);
        assert_eq!(CapabilityValue::U64(0).wire_size(), 8);
        assert_eq!(CapabilityValue::I64(0).wire_size(), 8);
    }

    #[test]
    fn test_text_wire_size_includes_terminator() {
        assert_eq!(CapabilityValue::from("FULL_PROFILE").wire_size(), 13);
        assert_eq!(CapabilityValue::from("").wire_size(), 1);
    }

    #[test]
    fn test_array_wire_sizes() {
        assert_eq!(CapabilityValue::U32Array(vec![1, 2, 3]).wire_size(), 12);
        assert_eq!(CapabilityValue::U64Array(vec![1, 2, 3]).wire_size(), 24);
        assert_eq!(CapabilityValue::U64Array(vec![]).wire_size(), 0);
    }

    #[test]
    fn test_text_array_wire_size() {
        let v = CapabilityValue::TextArray(vec![
            "a".to_string(),
            "bb".to_string(),
            "ccc".to_string(),
        ]);
        // 1+1 + 2+1 + 3+1
        assert_eq!(v.wire_size(), 9);
        assert_eq!(CapabilityValue::TextArray(vec![]).wire_size(), 0);
    }

    #[test]
    fn test_name_version_array_wire_size() {
        let records = vec![
            NamedVersion::new(Version::new(1, 0), "ext_a"),
            NamedVersion::new(Version::new(1, 0), "ext_b"),
        ];
        assert_eq!(
            CapabilityValue::NamedVersionArray(records).wire_size(),
            2 * 68
        );
    }

    #[test]
    fn test_wire_size_is_pure() {
        let v = CapabilityValue::from("stable");
        assert_eq!(v.wire_size(), v.wire_size());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(CapabilityValue::Bool(true).type_name(), "Bool");
        assert_eq!(CapabilityValue::from(1u64).type_name(), "U64");
        assert_eq!(CapabilityValue::from("x").type_name(), "Text");
        assert_eq!(
            CapabilityValue::TextArray(vec![]).type_name(),
            "TextArray"
        );
    }
}
