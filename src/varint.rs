//! Variable-length integer codec.
//!
//! Encoded layout, least-significant 7-bit group first:
//!
//! ```text
//! +---+---------+ +---+---------+     +---+---------+
//! | 1 | bits0-6 | | 1 | bits7-13| ... | 0 | bitsN-  |
//! +---+---------+ +---+---------+     +---+---------+
//!   continuation bit set on every byte except the last
//! ```
//!
//! Signed values are reinterpreted as their unsigned two's-complement bit
//! pattern before grouping, so negative values always occupy the maximum
//! byte count for their domain: 5 bytes for 32-bit, 10 bytes for 64-bit.
//! Both domains share one 64-bit accumulator parameterized only by the
//! maximum byte count; the 32-bit decoder truncates the result.

use crate::error::WireError;
use bytes::BufMut;
use std::io::{Read, Write};

/// Maximum encoded length of a 32-bit VarInt.
pub const MAX_VARINT32_LEN: usize = 5;

/// Maximum encoded length of a 64-bit VarInt.
pub const MAX_VARINT64_LEN: usize = 10;

const PAYLOAD_MASK: u8 = 0x7f;
const CONTINUE_BIT: u8 = 0x80;

/// Encodes a 32-bit value into a fresh buffer.
pub fn encode_i32(value: i32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MAX_VARINT32_LEN);
    put_i32(&mut buf, value);
    buf
}

/// Encodes a 64-bit value into a fresh buffer.
pub fn encode_i64(value: i64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MAX_VARINT64_LEN);
    put_i64(&mut buf, value);
    buf
}

/// Appends the encoding of `value` to `buf`.
pub fn put_i32<B: BufMut>(buf: &mut B, value: i32) {
    put_groups(buf, value as u32 as u64);
}

/// Appends the encoding of `value` to `buf`.
pub fn put_i64<B: BufMut>(buf: &mut B, value: i64) {
    put_groups(buf, value as u64);
}

fn put_groups<B: BufMut>(buf: &mut B, mut current: u64) {
    loop {
        let group = (current as u8) & PAYLOAD_MASK;
        current >>= 7;
        if current == 0 {
            buf.put_u8(group);
            return;
        }
        buf.put_u8(group | CONTINUE_BIT);
    }
}

/// Decodes a 32-bit VarInt from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_i32(bytes: &[u8]) -> Result<(i32, usize), WireError> {
    let (raw, consumed) = decode_groups(bytes, MAX_VARINT32_LEN)?;
    Ok((raw as u32 as i32, consumed))
}

/// Decodes a 64-bit VarInt from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_i64(bytes: &[u8]) -> Result<(i64, usize), WireError> {
    let (raw, consumed) = decode_groups(bytes, MAX_VARINT64_LEN)?;
    Ok((raw as i64, consumed))
}

fn decode_groups(bytes: &[u8], max_len: usize) -> Result<(u64, usize), WireError> {
    let mut acc: u64 = 0;
    for index in 0..max_len {
        let byte = *bytes.get(index).ok_or(WireError::UnexpectedEof)?;
        acc |= u64::from(byte & PAYLOAD_MASK) << (7 * index);
        if byte & CONTINUE_BIT == 0 {
            return Ok((acc, index + 1));
        }
    }
    Err(WireError::MalformedVarInt { max_len })
}

/// Reads a 32-bit VarInt from `reader`, one byte at a time.
///
/// Returns the value and the number of bytes consumed.
pub fn read_i32(reader: &mut dyn Read) -> Result<(i32, usize), WireError> {
    let (raw, consumed) = read_groups(reader, MAX_VARINT32_LEN)?;
    Ok((raw as u32 as i32, consumed))
}

/// Reads a 64-bit VarInt from `reader`, one byte at a time.
///
/// Returns the value and the number of bytes consumed.
pub fn read_i64(reader: &mut dyn Read) -> Result<(i64, usize), WireError> {
    let (raw, consumed) = read_groups(reader, MAX_VARINT64_LEN)?;
    Ok((raw as i64, consumed))
}

fn read_groups(reader: &mut dyn Read, max_len: usize) -> Result<(u64, usize), WireError> {
    let mut acc: u64 = 0;
    for index in 0..max_len {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte).map_err(WireError::from_io)?;
        acc |= u64::from(byte[0] & PAYLOAD_MASK) << (7 * index);
        if byte[0] & CONTINUE_BIT == 0 {
            return Ok((acc, index + 1));
        }
    }
    Err(WireError::MalformedVarInt { max_len })
}

/// Writes the encoding of `value` to `writer`.
pub fn write_i32(writer: &mut dyn Write, value: i32) -> Result<(), WireError> {
    writer.write_all(&encode_i32(value))?;
    Ok(())
}

/// Writes the encoding of `value` to `writer`.
pub fn write_i64(writer: &mut dyn Write, value: i64) -> Result<(), WireError> {
    writer.write_all(&encode_i64(value))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode_i32(0), vec![0x00]);
        assert_eq!(encode_i32(127), vec![0x7f]);
        assert_eq!(encode_i32(128), vec![0x80, 0x01]);
        assert_eq!(encode_i32(255), vec![0xff, 0x01]);
        assert_eq!(encode_i32(2097151), vec![0xff, 0xff, 0x7f]);
        assert_eq!(encode_i32(i32::MAX), vec![0xff, 0xff, 0xff, 0xff, 0x07]);
    }

    #[test]
    fn test_encode_negative_uses_max_length() {
        assert_eq!(encode_i32(-1), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
        assert_eq!(
            encode_i32(i32::MIN),
            vec![0x80, 0x80, 0x80, 0x80, 0x08]
        );
        assert_eq!(
            encode_i64(-1),
            vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
        );
        assert_eq!(encode_i64(-1).len(), MAX_VARINT64_LEN);
    }

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode_i32(&[0x00]).unwrap(), (0, 1));
        assert_eq!(decode_i32(&[0x7f]).unwrap(), (127, 1));
        assert_eq!(decode_i32(&[0x80, 0x01]).unwrap(), (128, 2));
        assert_eq!(
            decode_i32(&[0xff, 0xff, 0xff, 0xff, 0x0f]).unwrap(),
            (-1, 5)
        );
        assert_eq!(
            decode_i64(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01])
                .unwrap(),
            (-1, 10)
        );
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let (value, consumed) = decode_i32(&[0x80, 0x01, 0xaa, 0xbb]).unwrap();
        assert_eq!(value, 128);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_decode_overlong_is_malformed() {
        // Continuation bit still set through byte 5 of the 32-bit domain.
        let result = decode_i32(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert!(matches!(
            result,
            Err(WireError::MalformedVarInt { max_len: 5 })
        ));

        let overlong64 = [0x80u8; 11];
        let result = decode_i64(&overlong64);
        assert!(matches!(
            result,
            Err(WireError::MalformedVarInt { max_len: 10 })
        ));
    }

    #[test]
    fn test_decode_truncated_input() {
        let result = decode_i32(&[0x80, 0x80]);
        assert!(matches!(result, Err(WireError::UnexpectedEof)));

        let result = decode_i32(&[]);
        assert!(matches!(result, Err(WireError::UnexpectedEof)));
    }

    #[test]
    fn test_stream_roundtrip() {
        let mut buf = Vec::new();
        write_i32(&mut buf, 578).unwrap();
        write_i64(&mut buf, -42).unwrap();

        let mut cursor = &buf[..];
        assert_eq!(read_i32(&mut cursor).unwrap(), (578, 2));
        assert_eq!(read_i64(&mut cursor).unwrap(), (-42, 10));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_stream_eof() {
        let mut cursor: &[u8] = &[0x80, 0x80];
        let result = read_i32(&mut cursor);
        assert!(matches!(result, Err(WireError::UnexpectedEof)));
    }

    #[test]
    fn test_stream_overlong_is_malformed() {
        let mut cursor: &[u8] = &[0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let result = read_i32(&mut cursor);
        assert!(matches!(
            result,
            Err(WireError::MalformedVarInt { max_len: 5 })
        ));
    }

    #[test]
    fn test_put_into_bytes_mut() {
        let mut buf = bytes::BytesMut::new();
        put_i32(&mut buf, 128);
        put_i64(&mut buf, 1);
        assert_eq!(&buf[..], &[0x80, 0x01, 0x01]);
    }

    proptest! {
        #[test]
        fn prop_varint32_roundtrip(value in any::<i32>()) {
            let encoded = encode_i32(value);
            prop_assert!(encoded.len() <= MAX_VARINT32_LEN);

            let (decoded, consumed) = decode_i32(&encoded).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert_eq!(consumed, encoded.len());
        }

        #[test]
        fn prop_varint64_roundtrip(value in any::<i64>()) {
            let encoded = encode_i64(value);
            prop_assert!(encoded.len() <= MAX_VARINT64_LEN);

            let (decoded, consumed) = decode_i64(&encoded).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert_eq!(consumed, encoded.len());
        }

        #[test]
        fn prop_stream_matches_slice_decode(value in any::<i64>()) {
            let encoded = encode_i64(value);
            let mut cursor = &encoded[..];
            let from_stream = read_i64(&mut cursor).unwrap();
            let from_slice = decode_i64(&encoded).unwrap();
            prop_assert_eq!(from_stream, from_slice);
        }

        #[test]
        fn prop_negative_i32_spans_five_bytes(value in i32::MIN..0) {
            prop_assert_eq!(encode_i32(value).len(), MAX_VARINT32_LEN);
        }
    }
}
