//! CRDT identifiers.
//!
//! Responsibilities:
//! - `CrdtId` (author, counter) pairs with a total order
//! - Last-writer-wins attribute values
//! - Session-scoped allocation of fresh identifiers
//!
//! Non-responsibilities:
//! - Concurrent merge of edits from several devices

pub mod types;
pub mod allocator;

pub use types::{CrdtId, IdError, LwwValue};
pub use allocator::IdAllocator;
