//! rmscene-core
//!
//! Read and write reMarkable version 6 scene files (`.rm`).
//! Pure Rust, no FFI.
//!
//! Layers, bottom up:
//! - `ids`: CRDT identifiers and their allocator
//! - `scene`: the document tree and its validating builder
//! - `linearize`: tree → ordered block sequence
//! - `codec` + `headers`: blocks and header ↔ bytes
//! - `io`: whole-file write and read

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Model
pub mod ids;
pub mod scene;

// Wire
pub mod headers;
pub mod linearize;
pub mod codec;

// Passes
pub mod io;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::codec::CodecError;
    pub use crate::headers::{FileHeader, HeaderError};
    pub use crate::ids::{CrdtId, IdAllocator, IdError, LwwValue};
    pub use crate::io::{decode, read, read_from, write, write_to};
    pub use crate::linearize::{linearize, Block, BlockKind, OpaqueBlock};
    pub use crate::scene::{
        Document, Group, Highlight, PageInfo, PenColor, Point, Rect, SceneItem, SceneNode, Stroke, Tool,
        ValidationError,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{SceneError, StructuralError};
}
