//! Version types and the packed version codec
//!
//! A version is three parts: `major.minor.patch`, with the patch optional.
//! The wire form packs all three into a single `u32` bit field:
//!
//! ```text
//! bit 31            22 21            12 11             0
//!     +---------------+----------------+---------------+
//!     |  major (10b)  |   minor (10b)  |  patch (12b)  |
//!     +---------------+----------------+---------------+
//! ```
//!
//! ## Caller contract
//!
//! Field values exceeding their bit width are masked, not validated. Packing
//! a major greater than 1023, a minor greater than 1023, or a patch greater
//! than 4095 is a caller contract violation with unspecified (truncated)
//! results.
//!
//! ## Ordering
//!
//! Comparison is lexicographic over `(major, minor, patch)` with a missing
//! patch treated as 0. Equality, ordering, and hashing all use that same key
//! so `Ord` stays a lawful total order; `1.2` and `1.2.0` are equal. The
//! packed form cannot represent an absent patch, so `unpack(pack(v))` always
//! carries `patch = Some(_)`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

const MAJOR_BITS: u32 = 10;
const MINOR_BITS: u32 = 10;
const PATCH_BITS: u32 = 12;

const MAJOR_MASK: u32 = (1 << MAJOR_BITS) - 1;
const MINOR_MASK: u32 = (1 << MINOR_BITS) - 1;
const PATCH_MASK: u32 = (1 << PATCH_BITS) - 1;

/// A three-part version number
///
/// Value type: constructed on demand, never mutated after construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Version {
    /// Major component (10 bits on the wire)
    pub major: u32,
    /// Minor component (10 bits on the wire)
    pub minor: u32,
    /// Optional patch component (12 bits on the wire, absent packs as 0)
    pub patch: Option<u32>,
}

impl Version {
    /// Create a version without a patch component
    pub const fn new(major: u32, minor: u32) -> Self {
        Version {
            major,
            minor,
            patch: None,
        }
    }

    /// Create a version with a patch component
    pub const fn with_patch(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch: Some(patch),
        }
    }

    /// Pack into the 32-bit wire representation
    ///
    /// Fields are masked to 10/10/12 bits; oversized fields truncate.
    pub const fn pack(self) -> u32 {
        let patch = match self.patch {
            Some(p) => p,
            None => 0,
        };
        ((self.major & MAJOR_MASK) << (MINOR_BITS + PATCH_BITS))
            | ((self.minor & MINOR_MASK) << PATCH_BITS)
            | (patch & PATCH_MASK)
    }

    /// Unpack the 32-bit wire representation
    ///
    /// The patch is always populated: the packed form cannot distinguish an
    /// absent patch from 0.
    pub const fn unpack(packed: u32) -> Self {
        Version {
            major: (packed >> (MINOR_BITS + PATCH_BITS)) & MAJOR_MASK,
            minor: (packed >> PATCH_BITS) & MINOR_MASK,
            patch: Some(packed & PATCH_MASK),
        }
    }

    /// Comparison key: missing patch counts as 0
    #[inline]
    const fn key(self) -> (u32, u32, u32) {
        let patch = match self.patch {
            Some(p) => p,
            None => 0,
        };
        (self.major, self.minor, patch)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// A version paired with a name, e.g. an extension and the specification
/// version it implements
///
/// The name must be strictly shorter than
/// [`crate::limits::NAME_VERSION_MAX_NAME_SIZE`] bytes to fit the fixed-size
/// wire record; the wire layer reports a violation as `InvalidValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedVersion {
    /// The version component
    pub version: Version,
    /// The name component
    pub name: String,
}

impl NamedVersion {
    /// Create a named version
    pub fn new(version: Version, name: impl Into<String>) -> Self {
        NamedVersion {
            version,
            name: name.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
