//! src/headers/encode.rs
//!
//! Header encoding.
//!
//! Design notes:
//! - Validates before writing; the writer never emits a header it would
//!   refuse to read back.
//! - Output is always exactly `HEADER_LEN` bytes.

use crate::constants::{HEADER_LEN, HEADER_PREFIX};
use crate::headers::types::{FileHeader, HeaderError};

/// Serialize a `FileHeader` into its fixed-width form.
///
/// # Returns
/// - `Ok([u8; HEADER_LEN])`: prefix, version digits, space padding.
/// - `Err(HeaderError)` if the header does not validate.
pub fn encode_header(h: &FileHeader) -> Result<[u8; HEADER_LEN], HeaderError> {
    h.validate()?;

    let mut out = [b' '; HEADER_LEN];
    let digits = h.version.to_string();

    let mut i = 0usize;
    out[i..i + HEADER_PREFIX.len()].copy_from_slice(HEADER_PREFIX);
    i += HEADER_PREFIX.len();
    out[i..i + digits.len()].copy_from_slice(digits.as_bytes());
    i += digits.len();

    debug_assert!(i <= HEADER_LEN, "header text overflowed its field");
    Ok(out)
}
