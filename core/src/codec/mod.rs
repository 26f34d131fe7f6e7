//! Block sequence ↔ bytes.
//!
//! Responsibilities:
//! - Frame each block as `[tag][LEB128 length][payload]`
//! - Encode and decode every known payload
//! - Carry unknown tags through as opaque bytes
//!
//! Non-responsibilities:
//! - The file header (see `headers`)
//! - Tree rules between blocks (see `io::reader`)
//!
//! Design notes:
//! - Little-endian for fixed-width numbers, LEB128 for counters and lengths.
//! - Every decode error carries the absolute offset it was found at.

mod cursor;

pub mod types;
pub mod varint;
pub mod encode;
pub mod decode;

pub use types::{CodecError, FrameLen};
pub use varint::{read_varint, varint_len, write_varint};
pub use encode::{encode_block, encode_block_into, encode_blocks, encode_payload};
pub use decode::{decode_block, decode_block_at, decode_frame_at, decode_payload, BlockReader};
