use thiserror::Error;

use crate::headers::HeaderError;
use crate::linearize::BlockKind;
use crate::scene::Tool;
use crate::utils::enum_name_or_hex;

/// Malformed or truncated byte stream, or a block that cannot be encoded.
///
/// Offsets are absolute positions in the stream being decoded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("truncated {what} at offset {offset}: need {need} more byte(s), have {have}")]
    Truncated { what: &'static str, offset: usize, need: usize, have: usize },

    #[error("block tag 0x{tag:02x} at offset {offset} declares {declared} payload bytes, only {available} remain")]
    LengthOverrun { tag: u8, offset: usize, declared: u64, available: usize },

    #[error("varint at offset {offset} overflows 64 bits")]
    VarintOverflow { offset: usize },

    #[error("varint at offset {offset} is not minimally encoded")]
    Overlong { offset: usize },

    #[error("{field} at offset {offset}: {reason}")]
    InvalidValue { field: &'static str, offset: usize, reason: String },

    #[error("{field} at offset {offset} is {value}, larger than {max}")]
    ValueTooLarge { field: &'static str, offset: usize, value: u64, max: u64 },

    #[error("invalid UTF-8 in {field} at offset {offset}")]
    InvalidUtf8 { field: &'static str, offset: usize },

    #[error("invalid bool byte 0x{value:02x} in {field} at offset {offset}")]
    InvalidBool { field: &'static str, offset: usize, value: u8 },

    #[error("unknown tool {} at offset {offset}", tool_name(.raw))]
    UnknownTool { raw: u32, offset: usize },

    #[error("{} block at offset {offset}: {unread} payload byte(s) left unread", .kind.name())]
    TrailingPayload { kind: BlockKind, offset: usize, unread: usize },

    #[error("cannot encode {what}: {reason}")]
    Unencodable { what: &'static str, reason: String },
}

impl CodecError {
    /// Byte offset the error points at, when there is one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            CodecError::Truncated { offset, .. }
            | CodecError::LengthOverrun { offset, .. }
            | CodecError::VarintOverflow { offset }
            | CodecError::Overlong { offset }
            | CodecError::InvalidValue { offset, .. }
            | CodecError::ValueTooLarge { offset, .. }
            | CodecError::InvalidUtf8 { offset, .. }
            | CodecError::InvalidBool { offset, .. }
            | CodecError::UnknownTool { offset, .. }
            | CodecError::TrailingPayload { offset, .. } => Some(*offset),
            CodecError::Header(_) | CodecError::Unencodable { .. } => None,
        }
    }
}

/// Byte sizes of one block frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLen {
    /// tag plus length varint
    pub header: usize,
    pub payload: usize,
}

impl FrameLen {
    pub fn total(&self) -> usize {
        self.header + self.payload
    }
}

fn tool_name(raw: &u32) -> String {
    enum_name_or_hex::<Tool>(*raw)
}
