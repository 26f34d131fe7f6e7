use crate::constants::FIRST_COUNTER;
use crate::ids::types::{CrdtId, IdError};

/// Hands out fresh identifiers for one authoring session.
///
/// The author is fixed at construction and counters only grow. Counters start
/// above the reserved values, so neither `CrdtId::NONE` nor `CrdtId::ROOT` is
/// ever returned. Once `u64::MAX` has been handed out the allocator is
/// exhausted and every further call fails.
///
/// One allocator per document. Reusing an allocator that was reset for an
/// unrelated document makes ids collide *between* those documents.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    author: u32,
    /// `None` once the counter space is used up.
    next: Option<u64>,
    issued: u64,
}

impl IdAllocator {
    pub fn new(author: u32) -> Self {
        Self { author, next: Some(FIRST_COUNTER), issued: 0 }
    }

    /// Allocator whose first id comes after `last` (never below the
    /// reserved range). Exhausted from the start when `last` is `u64::MAX`.
    pub fn resume_after(author: u32, last: u64) -> Self {
        let next = last.checked_add(1).map(|n| n.max(FIRST_COUNTER));
        Self { author, next, issued: 0 }
    }

    /// Allocate the next identifier.
    pub fn next(&mut self) -> Result<CrdtId, IdError> {
        let counter = self.next.ok_or(IdError::Exhausted { author: self.author })?;
        self.next = counter.checked_add(1);
        self.issued += 1;
        Ok(CrdtId::new(self.author, counter))
    }

    /// The identifier the next call to `next()` would return.
    pub fn peek(&self) -> Option<CrdtId> {
        self.next.map(|counter| CrdtId::new(self.author, counter))
    }

    pub fn author(&self) -> u32 {
        self.author
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.issued
    }

    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_AUTHOR)
    }
}
