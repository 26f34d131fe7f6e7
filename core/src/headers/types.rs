//! headers/types.rs
//! File header type and its errors.
//!
//! Notes:
//! - The header is fixed-width ASCII: format text, version digits, then
//!   space padding up to `HEADER_LEN`.
//! - Only version 6 is written or accepted.

use thiserror::Error;

use crate::constants::{FORMAT_VERSION, HEADER_LEN, HEADER_PREFIX};
use crate::utils::fmt_bytes;

/// Parsed file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u8,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self { version: FORMAT_VERSION }
    }
}

impl FileHeader {
    pub const LEN: usize = HEADER_LEN;

    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.version != FORMAT_VERSION {
            return Err(HeaderError::UnsupportedVersion { have: self.version as u32, need: FORMAT_VERSION });
        }
        // prefix + digits must fit into the fixed field
        let text_len = HEADER_PREFIX.len() + self.version.to_string().len();
        if text_len > HEADER_LEN {
            return Err(HeaderError::TextTooLong { have: text_len, max: HEADER_LEN });
        }
        Ok(())
    }

    /// Header text without padding, e.g. `reMarkable .lines file, version=6`.
    pub fn text(&self) -> String {
        format!("{}{}", String::from_utf8_lossy(HEADER_PREFIX), self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Buffer too short to contain the header.
    #[error("header buffer too short: {have} < {need}")]
    BufferTooShort { have: usize, need: usize },

    /// Format text does not match.
    #[error("invalid header: expected {}, got {have}", fmt_bytes(HEADER_PREFIX))]
    InvalidFormat { have: String },

    /// Version field is not a number.
    #[error("invalid header version field: {raw}")]
    InvalidVersion { raw: String },

    /// Version parsed but not supported.
    #[error("unsupported version: {have} (supported: {need})")]
    UnsupportedVersion { have: u32, need: u8 },

    /// Bytes after the version digits must be spaces.
    #[error("header padding must be spaces, got {padding}")]
    InvalidPadding { padding: String },

    #[error("header text is {have} bytes, field holds {max}")]
    TextTooLong { have: usize, max: usize },
}
