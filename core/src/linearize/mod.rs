//! Tree → block sequence.
//!
//! Responsibilities:
//! - Define the closed set of block records
//! - Order them parent-before-child, siblings in creation order
//!
//! Non-responsibilities:
//! - Byte layout (see `codec`)

pub mod types;
pub mod linearizer;

pub use types::{Block, BlockKind, OpaqueBlock};
pub use linearizer::{first_forward_reference, linearize};
