//! LEB128 variable-length integers.
//!
//! Unsigned values frame every section, vector count and index immediate.
//! Signed values are only used for `i32.const` / `i64.const` immediates.

use thiserror::Error;

/// Failure to read a varint back out of a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Leb128Error {
    /// The buffer ended before a byte without the continuation bit.
    #[error("unexpected end of input while decoding varint at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// The encoded value does not fit in 64 bits.
    #[error("varint at offset {offset} overflows 64 bits")]
    Overflow { offset: usize },
}

/// Append `n` in unsigned base-128 form.
pub fn encode(mut n: u64, out: &mut Vec<u8>) {
    while n >= 0x80 {
        out.push((n & 0x7F) as u8 | 0x80);
        n >>= 7;
    }
    out.push(n as u8);
}

/// Append `n` in signed base-128 form.
pub fn encode_signed(mut n: i64, out: &mut Vec<u8>) {
    loop {
        let byte = (n & 0x7F) as u8;
        n >>= 7;
        let done = (n == 0 && byte & 0x40 == 0) || (n == -1 && byte & 0x40 != 0);
        if done {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Read an unsigned varint starting at `offset`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(bytes: &[u8], offset: usize) -> Result<(u64, usize), Leb128Error> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    let mut pos = offset;

    loop {
        let byte = *bytes.get(pos).ok_or(Leb128Error::UnexpectedEnd { offset: pos })?;
        let digit = u64::from(byte & 0x7F);
        if shift >= 64 || (digit << shift) >> shift != digit {
            return Err(Leb128Error::Overflow { offset });
        }
        value |= digit << shift;
        pos += 1;
        if byte & 0x80 == 0 {
            return Ok((value, pos - offset));
        }
        shift += 7;
    }
}

/// Number of bytes [`encode`] writes for `n`.
pub fn encoded_len(n: u64) -> usize {
    let bits = 64 - n.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Append a length-prefixed UTF-8 name.
pub fn encode_name(name: &str, out: &mut Vec<u8>) {
    encode(name.len() as u64, out);
    out.extend_from_slice(name.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(n: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode(n, &mut out);
        out
    }

    fn enc_signed(n: i64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_signed(n, &mut out);
        out
    }

    #[test]
    fn single_digit() {
        assert_eq!(enc(0), [0x00]);
        assert_eq!(enc(127), [0x7F]);
    }

    #[test]
    fn multi_digit() {
        assert_eq!(enc(128), [0x80, 0x01]);
        assert_eq!(enc(7000), [0xD8, 0x36]);
        assert_eq!(enc(624_485), [0xE5, 0x8E, 0x26]);
    }

    #[test]
    fn round_trip_counts_digits() {
        for n in [0, 1, 127, 128, 16_383, 16_384, 2_097_151, u32::MAX as u64, u64::MAX] {
            let bytes = enc(n);
            assert_eq!(decode(&bytes, 0), Ok((n, encoded_len(n))), "n = {n}");
        }
    }

    #[test]
    fn decode_at_offset() {
        let bytes = [0xFF, 0xD8, 0x36, 0x01];
        assert_eq!(decode(&bytes, 1), Ok((7000, 2)));
        assert_eq!(decode(&bytes, 3), Ok((1, 1)));
    }

    #[test]
    fn decode_truncated() {
        assert_eq!(decode(&[0x80, 0x80], 0), Err(Leb128Error::UnexpectedEnd { offset: 2 }));
        assert_eq!(decode(&[], 0), Err(Leb128Error::UnexpectedEnd { offset: 0 }));
    }

    #[test]
    fn decode_overflow() {
        let mut bytes = vec![0xFF; 10];
        bytes.push(0x01);
        assert_eq!(decode(&bytes, 0), Err(Leb128Error::Overflow { offset: 0 }));
    }

    #[test]
    fn signed() {
        assert_eq!(enc_signed(0), [0x00]);
        assert_eq!(enc_signed(-1), [0x7F]);
        assert_eq!(enc_signed(63), [0x3F]);
        assert_eq!(enc_signed(64), [0xC0, 0x00]);
        assert_eq!(enc_signed(-64), [0x40]);
        assert_eq!(enc_signed(-65), [0xBF, 0x7F]);
        assert_eq!(enc_signed(128), [0x80, 0x01]);
        assert_eq!(enc_signed(200), [0xC8, 0x01]);
    }

    #[test]
    fn names() {
        let mut out = Vec::new();
        encode_name("env", &mut out);
        assert_eq!(out, [0x03, b'e', b'n', b'v']);
    }
}
