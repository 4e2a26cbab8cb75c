//! Fixed wire-format constants
//!
//! These widths are part of the ABI contract shared with callers decoding
//! raw query buffers. They are FROZEN and cannot change without a major
//! version bump.

/// Maximum name length in a name/version record, including the terminating
/// zero byte
///
/// A record name must be strictly shorter than this; violations are reported
/// as `InvalidValue`, never truncated.
pub const NAME_VERSION_MAX_NAME_SIZE: usize = 64;

/// Byte stride of one name/version record: a 4-byte packed version followed
/// by the fixed-size name field
pub const NAME_VERSION_STRIDE: usize = 4 + NAME_VERSION_MAX_NAME_SIZE;

/// Wire width of a boolean
///
/// Booleans encode as a 4-byte `1`/`0`, not the host's 1-byte
/// representation.
pub const BOOL_WIRE_SIZE: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_stride_covers_version_and_name() {
        assert_eq!(NAME_VERSION_STRIDE, 68);
        assert_eq!(NAME_VERSION_STRIDE - NAME_VERSION_MAX_NAME_SIZE, 4);
    }
}
