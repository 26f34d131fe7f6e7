use std::collections::BTreeMap;

use bytes::Bytes;
use num_enum::TryFromPrimitive;
use uuid::Uuid;

use crate::constants::tags;
use crate::ids::CrdtId;
use crate::scene::{Group, Highlight, PageInfo, Stroke};

/// Tags this codec understands.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum BlockKind {
    Root            = tags::ROOT,
    Group           = tags::GROUP,
    GroupMembership = tags::GROUP_MEMBERSHIP,
    Stroke          = tags::STROKE,
    AuthorIds       = tags::AUTHOR_IDS,
    PageInfo        = tags::PAGE_INFO,
    Highlight       = tags::HIGHLIGHT,
}

impl BlockKind {
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Root            => "root",
            BlockKind::Group           => "group",
            BlockKind::GroupMembership => "group-membership",
            BlockKind::Stroke          => "stroke",
            BlockKind::AuthorIds       => "author-ids",
            BlockKind::PageInfo        => "page-info",
            BlockKind::Highlight       => "highlight",
        }
    }
}

/// Block with a tag this codec does not know, kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueBlock {
    pub tag: u8,
    pub payload: Bytes,
}

/// One record of the linearized stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Root(CrdtId),
    AuthorIds { root: CrdtId, authors: BTreeMap<u32, Uuid> },
    PageInfo { root: CrdtId, info: PageInfo },
    Group(Group),
    GroupMembership { group: CrdtId, children: Vec<CrdtId> },
    Stroke(Stroke),
    Highlight(Highlight),
    Opaque(OpaqueBlock),
}

impl Block {
    /// Wire tag.
    pub fn tag(&self) -> u8 {
        match self {
            Block::Opaque(o) => o.tag,
            other => other.kind().map(|k| k as u8).unwrap_or_default(),
        }
    }

    /// Known kind, `None` for opaque blocks.
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            Block::Root(_)                => BlockKind::Root,
            Block::AuthorIds { .. }       => BlockKind::AuthorIds,
            Block::PageInfo { .. }        => BlockKind::PageInfo,
            Block::Group(_)               => BlockKind::Group,
            Block::GroupMembership { .. } => BlockKind::GroupMembership,
            Block::Stroke(_)              => BlockKind::Stroke,
            Block::Highlight(_)           => BlockKind::Highlight,
            Block::Opaque(_)              => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        self.kind().map(BlockKind::name).unwrap_or("opaque")
    }

    /// Identifier written first in the payload.
    pub fn primary_id(&self) -> Option<CrdtId> {
        match self {
            Block::Root(id) => Some(*id),
            Block::AuthorIds { root, .. } | Block::PageInfo { root, .. } => Some(*root),
            Block::Group(g) => Some(g.id),
            Block::GroupMembership { group, .. } => Some(*group),
            Block::Stroke(s) => Some(s.id),
            Block::Highlight(h) => Some(h.id),
            Block::Opaque(_) => None,
        }
    }

    /// Identifier this block must find already defined.
    ///
    /// Membership and page-level blocks refer to the group they describe.
    pub fn parent_id(&self) -> Option<CrdtId> {
        match self {
            Block::Root(_) | Block::Opaque(_) => None,
            Block::AuthorIds { root, .. } | Block::PageInfo { root, .. } => Some(*root),
            Block::Group(g) => Some(g.parent_id),
            Block::GroupMembership { group, .. } => Some(*group),
            Block::Stroke(s) => Some(s.parent_id),
            Block::Highlight(h) => Some(h.parent_id),
        }
    }
}
