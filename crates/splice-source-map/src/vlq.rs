//! Base64 VLQ codec used by the `mappings` field
//!
//! A value is folded into an unsigned magnitude with the sign in bit 0, then
//! written five bits at a time, least significant group first. Every group
//! but the last carries the continuation bit (`0x20`). Each 6-bit group is
//! rendered through the standard base64 alphabet.

use thiserror::Error;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u64 = 0x1f;
const VLQ_CONTINUATION_BIT: u64 = 0x20;

/// Errors produced while decoding VLQ text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VlqError {
    #[error("invalid base64 VLQ character '{0}'")]
    InvalidCharacter(char),

    #[error("VLQ value ends in the middle of a continuation")]
    UnexpectedEnd,

    #[error("VLQ value does not fit in 32 bits")]
    Overflow,
}

/// Append the VLQ encoding of `value` to `out`
pub fn encode(value: i32, out: &mut String) {
    let mut folded: u64 = if value < 0 {
        1 | (((-i64::from(value)) as u64) << 1)
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = folded & VLQ_BASE_MASK;
        folded >>= VLQ_BASE_SHIFT;
        if folded > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_ALPHABET[digit as usize] as char);
        if folded == 0 {
            break;
        }
    }
}

/// Encode a single value into a fresh string
pub fn encode_to_string(value: i32) -> String {
    let mut out = String::new();
    encode(value, &mut out);
    out
}

fn base64_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u64::from(value))
}

/// Decode one value starting at `*pos`, advancing `*pos` past it
pub fn decode_one(input: &[u8], pos: &mut usize) -> Result<i32, VlqError> {
    let mut folded: u64 = 0;
    let mut shift = 0u32;

    loop {
        let byte = *input.get(*pos).ok_or(VlqError::UnexpectedEnd)?;
        let digit = base64_value(byte).ok_or(VlqError::InvalidCharacter(byte as char))?;
        *pos += 1;

        // 32 value bits plus the sign bit fit in seven groups
        if shift > 6 * VLQ_BASE_SHIFT {
            return Err(VlqError::Overflow);
        }
        folded |= (digit & VLQ_BASE_MASK) << shift;
        shift += VLQ_BASE_SHIFT;

        if digit & VLQ_CONTINUATION_BIT == 0 {
            break;
        }
    }

    let magnitude = (folded >> 1) as i64;
    let value = if folded & 1 == 1 { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| VlqError::Overflow)
}

/// Decode every value in `input`
pub fn decode(input: &str) -> Result<Vec<i32>, VlqError> {
    let bytes = input.as_bytes();
    let mut pos = 0;
    let mut values = Vec::new();
    while pos < bytes.len() {
        values.push(decode_one(bytes, &mut pos)?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        let cases = [
            (0, "A"),
            (1, "C"),
            (-1, "D"),
            (15, "e"),
            (-15, "f"),
            (16, "gB"),
            (-16, "hB"),
            (-17, "jB"),
            (123, "2H"),
            (1000, "w+B"),
        ];
        for (value, expected) in cases {
            assert_eq!(encode_to_string(value), expected, "encoding {}", value);
        }
    }

    #[test]
    fn test_encode_appends() {
        let mut out = String::from("A");
        encode(16, &mut out);
        encode(-1, &mut out);
        assert_eq!(out, "AgBD");
    }

    #[test]
    fn test_decode_inverts_encode() {
        let values = [
            0,
            1,
            -1,
            15,
            16,
            -16,
            -17,
            31,
            32,
            4096,
            -4096,
            1 << 20,
            -(1 << 20),
            i32::MAX,
            i32::MIN + 1,
            i32::MIN,
        ];
        for value in values {
            let encoded = encode_to_string(value);
            assert_eq!(decode(&encoded).unwrap(), vec![value], "value {}", value);
        }
    }

    #[test]
    fn test_decode_sequence() {
        assert_eq!(decode("AAAA").unwrap(), vec![0, 0, 0, 0]);
        assert_eq!(decode("ACAA").unwrap(), vec![0, 1, 0, 0]);
        assert_eq!(decode("ADEA").unwrap(), vec![0, -1, 2, 0]);
        assert_eq!(decode("").unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(decode("A*"), Err(VlqError::InvalidCharacter('*')));
        // 'g' carries the continuation bit with nothing after it
        assert_eq!(decode("g"), Err(VlqError::UnexpectedEnd));
        assert_eq!(decode("////////B"), Err(VlqError::Overflow));
    }

    #[test]
    fn test_decode_one_advances_position() {
        let input = b"gBD";
        let mut pos = 0;
        assert_eq!(decode_one(input, &mut pos), Ok(16));
        assert_eq!(pos, 2);
        assert_eq!(decode_one(input, &mut pos), Ok(-1));
        assert_eq!(pos, 3);
    }
}
