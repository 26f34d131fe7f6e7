//! src/headers/decode.rs
//!
//! Header decoding.
//!
//! Design notes:
//! - Reads exactly `HEADER_LEN` bytes; anything after belongs to the block
//!   stream.
//! - Format text, version digits and padding are checked separately so the
//!   error says which part is wrong.

use crate::constants::{HEADER_LEN, HEADER_PREFIX};
use crate::headers::types::{FileHeader, HeaderError};
use crate::utils::fmt_bytes;

/// Parse the fixed-width header at the start of `buf`.
///
/// # Returns
/// - `Ok(FileHeader)` for a supported version.
/// - `Err(HeaderError)` for short buffers, foreign formats, bad digits,
///   non-space padding or unsupported versions.
pub fn decode_header(buf: &[u8]) -> Result<FileHeader, HeaderError> {
    if buf.len() < HEADER_LEN {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: HEADER_LEN });
    }
    let field = &buf[..HEADER_LEN];

    if !field.starts_with(HEADER_PREFIX) {
        return Err(HeaderError::InvalidFormat { have: fmt_bytes(&field[..HEADER_PREFIX.len()]) });
    }

    let rest = &field[HEADER_PREFIX.len()..];
    let digits_len = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    let (digits, padding) = rest.split_at(digits_len);

    if digits.is_empty() {
        return Err(HeaderError::InvalidVersion { raw: fmt_bytes(rest) });
    }
    if padding.iter().any(|&b| b != b' ') {
        return Err(HeaderError::InvalidPadding { padding: fmt_bytes(padding) });
    }

    // digits are ASCII, at most HEADER_LEN of them
    let text = std::str::from_utf8(digits).map_err(|_| HeaderError::InvalidVersion { raw: fmt_bytes(digits) })?;
    let version: u32 = text.parse().map_err(|_| HeaderError::InvalidVersion { raw: text.to_string() })?;

    let header = FileHeader { version: u8::try_from(version).unwrap_or(u8::MAX) };
    if header.version as u32 != version {
        return Err(HeaderError::UnsupportedVersion { have: version, need: FileHeader::default().version });
    }
    header.validate()?;
    Ok(header)
}
