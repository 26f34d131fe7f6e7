use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{NONE_AUTHOR, NONE_COUNTER, ROOT_AUTHOR, ROOT_COUNTER};

/// Identifier of a tree node or attribute write.
///
/// Ordered by author first, then counter. Within one author the counter is
/// also the CRDT sequence key, so later allocations sort after earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CrdtId {
    pub author: u32,
    pub counter: u64,
}

impl CrdtId {
    /// Reserved "no parent" id.
    pub const NONE: CrdtId = CrdtId { author: NONE_AUTHOR, counter: NONE_COUNTER };
    /// Fixed scene root id.
    pub const ROOT: CrdtId = CrdtId { author: ROOT_AUTHOR, counter: ROOT_COUNTER };

    pub const fn new(author: u32, counter: u64) -> Self {
        Self { author, counter }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }

    /// True for either reserved id.
    pub fn is_reserved(&self) -> bool {
        self.is_none() || self.is_root()
    }
}

impl fmt::Display for CrdtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.author, self.counter)
    }
}

/// Single mutable attribute resolved by greatest timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LwwValue<T> {
    pub timestamp: CrdtId,
    pub value: T,
}

impl<T> LwwValue<T> {
    pub fn new(timestamp: CrdtId, value: T) -> Self {
        Self { timestamp, value }
    }

    /// Keep whichever write carries the greater timestamp.
    /// Ties keep `self`.
    pub fn merge(self, other: LwwValue<T>) -> LwwValue<T> {
        if other.timestamp > self.timestamp {
            other
        } else {
            self
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

/// Identifier allocation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("author {author} has no free counters left")]
    Exhausted { author: u32 },
}
