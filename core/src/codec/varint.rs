//! Unsigned LEB128.
//!
//! 7 value bits per byte, low group first, high bit set on every byte but
//! the last. A `u64` takes 1..=10 bytes.

use crate::codec::types::CodecError;
use crate::constants::MAX_VARINT_LEN;

/// Append `v` to `out`.
pub fn write_varint(out: &mut Vec<u8>, mut v: u64) {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Encoded length of `v` in bytes.
pub fn varint_len(v: u64) -> usize {
    let bits = 64 - v.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Read one varint from the start of `buf`.
///
/// `offset` is the absolute position of `buf[0]`, used in errors only.
///
/// # Returns
/// - `Ok((value, consumed))`
/// - `Err(CodecError::Truncated)` if `buf` ends mid-varint
/// - `Err(CodecError::VarintOverflow)` if the value does not fit 64 bits
/// - `Err(CodecError::Overlong)` if a shorter encoding of the value exists
pub fn read_varint(buf: &[u8], offset: usize) -> Result<(u64, usize), CodecError> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(CodecError::VarintOverflow { offset });
        }
        let group = (byte & 0x7f) as u64;
        // 10th byte may only carry the single remaining bit
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(CodecError::VarintOverflow { offset });
        }
        value |= group << (7 * i);
        if byte & 0x80 == 0 {
            // a zero final group after the first byte adds nothing
            if byte == 0 && i > 0 {
                return Err(CodecError::Overlong { offset });
            }
            return Ok((value, i + 1));
        }
    }
    Err(CodecError::Truncated {
        what: "varint",
        offset: offset + buf.len(),
        need: 1,
        have: 0,
    })
}
