use std::io;

use thiserror::Error;

use crate::codec::CodecError;
use crate::headers::HeaderError;
use crate::ids::CrdtId;
use crate::scene::ValidationError;

/// The tree references something that does not exist or is not where it
/// should be. Raised by the linearizer (builder bug) and by the reader
/// (corrupt file). Never partially applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    #[error("stream does not start with a root block (first block: {found})")]
    MissingRoot { found: &'static str },

    #[error("second root block {id}")]
    DuplicateRoot { id: CrdtId },

    #[error("root id must not be the reserved none id")]
    InvalidRoot,

    #[error("{kind} {id} references unknown parent {parent}")]
    UnknownParent { kind: &'static str, id: CrdtId, parent: CrdtId },

    #[error("{kind} {id} cannot be a direct child of the root")]
    LeafUnderRoot { kind: &'static str, id: CrdtId },

    #[error("identifier {id} is defined twice")]
    DuplicateId { id: CrdtId },

    #[error("identifier {id} is reserved")]
    ReservedId { id: CrdtId },

    #[error("group {group} has more than one membership block")]
    DuplicateMembership { group: CrdtId },

    #[error("membership of {group} disagrees with child {child}: {reason}")]
    MembershipMismatch { group: CrdtId, child: CrdtId, reason: &'static str },

    #[error("group {id} is not reachable from the root")]
    Unreachable { id: CrdtId },
}

/// Unified error for write/read passes.
/// `From<T>` impls let `?` cross the builder, linearizer and codec layers.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl SceneError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SceneError::Validation(_))
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, SceneError::Structural(_))
    }

    pub fn is_codec(&self) -> bool {
        matches!(self, SceneError::Codec(_))
    }
}

impl From<HeaderError> for SceneError {
    fn from(e: HeaderError) -> Self {
        SceneError::Codec(CodecError::Header(e))
    }
}
