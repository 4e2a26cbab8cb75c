//! Two-phase wire serialization for capability values
//!
//! Every query is answered through one contract, `write_value`:
//!
//! 1. The required size is computed from the value's content.
//! 2. If a size output is provided, the required size is written to it
//!    unconditionally, even when the destination is absent or too small.
//! 3. If a destination is provided, a capacity shorter than the required
//!    size fails with `InvalidValue` and writes nothing; otherwise the value
//!    encodes into exactly `required` bytes.
//! 4. Both outputs absent is `InvalidValue`: the call carries no useful
//!    output channel.
//! 5. A destination-less call with a size output is the size-probe mode and
//!    never mutates buffer memory.
//!
//! No shape partially writes on failure. Integers use native byte order.

use byteorder::{ByteOrder, NativeEndian};

use crate::error::{Error, Result};
use crate::limits::{NAME_VERSION_MAX_NAME_SIZE, NAME_VERSION_STRIDE};
use crate::value::CapabilityValue;
use crate::version::NamedVersion;

/// Serialize a capability value through the two-phase query contract
///
/// `dst.len()` is the caller's declared capacity. See the module docs for
/// the full contract.
pub fn write_value(
    value: &CapabilityValue,
    dst: Option<&mut [u8]>,
    out_size: Option<&mut usize>,
) -> Result<()> {
    if dst.is_none() && out_size.is_none() {
        return Err(Error::InvalidValue(
            "both destination and size output are absent".to_string(),
        ));
    }

    // Record names must fit their fixed-size field. Checked before any
    // output is produced so a failed call has no observable effect.
    if let CapabilityValue::NamedVersionArray(records) = value {
        for record in records {
            if record.name.len() >= NAME_VERSION_MAX_NAME_SIZE {
                return Err(Error::InvalidValue(format!(
                    "record name '{}' exceeds the {}-byte name field",
                    record.name, NAME_VERSION_MAX_NAME_SIZE
                )));
            }
        }
    }

    let required = value.wire_size();
    if let Some(out_size) = out_size {
        *out_size = required;
    }

    if let Some(buf) = dst {
        if buf.len() < required {
            return Err(Error::InvalidValue(format!(
                "buffer capacity {} is less than required size {}",
                buf.len(),
                required
            )));
        }
        encode(value, &mut buf[..required]);
    }
    Ok(())
}

/// Encode into a buffer of exactly `wire_size()` bytes
///
/// Capacity and record-name validation have already happened in
/// `write_value`.
fn encode(value: &CapabilityValue, buf: &mut [u8]) {
    match value {
        CapabilityValue::Bool(b) => {
            NativeEndian::write_u32(buf, u32::from(*b));
        }
        CapabilityValue::U32(v) => NativeEndian::write_u32(buf, *v),
        CapabilityValue::I32(v) => NativeEndian::write_i32(buf, *v),
        CapabilityValue::U64(v) => NativeEndian::write_u64(buf, *v),
        CapabilityValue::I64(v) => NativeEndian::write_i64(buf, *v),
        CapabilityValue::Text(s) => {
            buf[..s.len()].copy_from_slice(s.as_bytes());
            buf[s.len()] = 0;
        }
        CapabilityValue::U32Array(values) => {
            for (chunk, v) in buf.chunks_exact_mut(4).zip(values) {
                NativeEndian::write_u32(chunk, *v);
            }
        }
        CapabilityValue::U64Array(values) => {
            for (chunk, v) in buf.chunks_exact_mut(8).zip(values) {
                NativeEndian::write_u64(chunk, *v);
            }
        }
        CapabilityValue::TextArray(items) => encode_text_array(items, buf),
        CapabilityValue::NamedVersionArray(records) => {
            encode_name_version_array(records, buf)
        }
    }
}

/// Elements joined by single ASCII spaces, one trailing zero byte
fn encode_text_array(items: &[String], buf: &mut [u8]) {
    let mut cursor = 0;
    for item in items {
        buf[cursor..cursor + item.len()].copy_from_slice(item.as_bytes());
        buf[cursor + item.len()] = b' ';
        cursor += item.len() + 1;
    }
    // The final separator slot becomes the terminator.
    if !items.is_empty() {
        buf[cursor - 1] = 0;
    }
}

/// Fixed-stride records: 4-byte packed version, then the name field
///
/// The name field is zero-filled before the name is copied, so the bytes
/// after the terminator are deterministically zero.
fn encode_name_version_array(records: &[NamedVersion], buf: &mut [u8]) {
    for (chunk, record) in buf.chunks_exact_mut(NAME_VERSION_STRIDE).zip(records) {
        NativeEndian::write_u32(chunk, record.version.pack());
        let name_field = &mut chunk[4..];
        name_field.fill(0);
        name_field[..record.name.len()].copy_from_slice(record.name.as_bytes());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;

    fn probe(value: &CapabilityValue) -> usize {
        let mut size = 0;
        write_value(value, None, Some(&mut size)).unwrap();
        size
    }

    fn fetch(value: &CapabilityValue) -> Vec<u8> {
        let mut buf = vec![0u8; probe(value)];
        write_value(value, Some(&mut buf), None).unwrap();
        buf
    }

    #[test]
    fn test_both_outputs_absent_is_invalid() {
        let result = write_value(&CapabilityValue::U32(1), None, None);
        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    #[test]
    fn test_size_probe_reports_required_size() {
        assert_eq!(probe(&CapabilityValue::Bool(true)), 4);
        assert_eq!(probe(&CapabilityValue::from("Apple")), 6);
        assert_eq!(probe(&CapabilityValue::U64Array(vec![1, 2])), 16);
    }

    #[test]
    fn test_short_capacity_fails_without_writing() {
        let value = CapabilityValue::from("FULL_PROFILE");
        let mut buf = [0xABu8; 4];
        let mut size = 0;
        let result = write_value(&value, Some(&mut buf), Some(&mut size));
        assert!(matches!(result, Err(Error::InvalidValue(_))));
        // Size output is still populated on a short-capacity failure.
        assert_eq!(size, 13);
        assert_eq!(buf, [0xAB; 4]);
    }

    #[test]
    fn test_bool_encodes_as_four_byte_flag() {
        assert_eq!(fetch(&CapabilityValue::Bool(true)), 1u32.to_ne_bytes());
        assert_eq!(fetch(&CapabilityValue::Bool(false)), 0u32.to_ne_bytes());
    }

    #[test]
    fn test_integers_encode_at_native_order() {
        assert_eq!(fetch(&CapabilityValue::U32(0xDEAD)), 0xDEADu32.to_ne_bytes());
        assert_eq!(fetch(&CapabilityValue::I32(-7)), (-7i32).to_ne_bytes());
        assert_eq!(
            fetch(&CapabilityValue::U64(u64::MAX - 1)),
            (u64::MAX - 1).to_ne_bytes()
        );
        assert_eq!(fetch(&CapabilityValue::I64(-1)), (-1i64).to_ne_bytes());
    }

    #[test]
    fn test_text_encodes_with_terminator() {
        assert_eq!(fetch(&CapabilityValue::from("abc")), b"abc\0");
        assert_eq!(fetch(&CapabilityValue::from("")), b"\0");
    }

    #[test]
    fn test_integer_array_contiguous_in_order() {
        let encoded = fetch(&CapabilityValue::U32Array(vec![1, 2, 3]));
        assert_eq!(NativeEndian::read_u32(&encoded[0..4]), 1);
        assert_eq!(NativeEndian::read_u32(&encoded[4..8]), 2);
        assert_eq!(NativeEndian::read_u32(&encoded[8..12]), 3);
    }

    #[test]
    fn test_text_array_space_joined_zero_terminated() {
        let value = CapabilityValue::TextArray(vec![
            "a".to_string(),
            "bb".to_string(),
            "ccc".to_string(),
        ]);
        assert_eq!(probe(&value), 9);
        assert_eq!(fetch(&value), b"a bb ccc\0");
    }

    #[test]
    fn test_empty_text_array_writes_nothing() {
        let value = CapabilityValue::TextArray(vec![]);
        assert_eq!(probe(&value), 0);
        let mut buf = [0xABu8; 2];
        write_value(&value, Some(&mut buf[..0]), None).unwrap();
        assert_eq!(buf, [0xAB; 2]);
    }

    #[test]
    fn test_name_version_record_layout() {
        let value = CapabilityValue::NamedVersionArray(vec![
            NamedVersion::new(Version::with_patch(1, 0, 0), "ext_fp16"),
            NamedVersion::new(Version::with_patch(3, 0, 12), "ext_il_program"),
        ]);
        let encoded = fetch(&value);
        assert_eq!(encoded.len(), 2 * NAME_VERSION_STRIDE);

        let first = &encoded[..NAME_VERSION_STRIDE];
        assert_eq!(
            NativeEndian::read_u32(&first[0..4]),
            Version::with_patch(1, 0, 0).pack()
        );
        assert_eq!(&first[4..12], b"ext_fp16");
        // The name field is zero-filled past the terminator.
        assert!(first[12..].iter().all(|&b| b == 0));

        let second = &encoded[NAME_VERSION_STRIDE..];
        assert_eq!(
            NativeEndian::read_u32(&second[0..4]),
            Version::with_patch(3, 0, 12).pack()
        );
        assert_eq!(&second[4..18], b"ext_il_program");
    }

    #[test]
    fn test_oversize_record_name_is_rejected() {
        let long_name = "x".repeat(NAME_VERSION_MAX_NAME_SIZE);
        let value = CapabilityValue::NamedVersionArray(vec![NamedVersion::new(
            Version::new(1, 0),
            long_name,
        )]);
        let mut size = usize::MAX;
        let result = write_value(&value, None, Some(&mut size));
        assert!(matches!(result, Err(Error::InvalidValue(_))));
        // Rejected before the size output is touched.
        assert_eq!(size, usize::MAX);
    }

    #[test]
    fn test_longest_legal_record_name() {
        let name = "y".repeat(NAME_VERSION_MAX_NAME_SIZE - 1);
        let value = CapabilityValue::NamedVersionArray(vec![NamedVersion::new(
            Version::new(1, 0),
            name.clone(),
        )]);
        let encoded = fetch(&value);
        assert_eq!(&encoded[4..4 + name.len()], name.as_bytes());
        // Terminator is the last byte of the record.
        assert_eq!(encoded[NAME_VERSION_STRIDE - 1], 0);
    }

    #[test]
    fn test_oversized_buffer_is_accepted() {
        let mut buf = [0xABu8; 16];
        let mut size = 0;
        write_value(
            &CapabilityValue::U32(5),
            Some(&mut buf),
            Some(&mut size),
        )
        .unwrap();
        assert_eq!(size, 4);
        assert_eq!(buf[0..4], 5u32.to_ne_bytes());
        // Bytes past the encoded value are untouched.
        assert_eq!(&buf[4..], &[0xAB; 12]);
    }
}
