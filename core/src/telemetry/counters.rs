//! telemetry/counters.rs
//! Mutable counters filled while a block stream is written or read.
//!
//! Converted into an immutable `TelemetrySnapshot` at the end of the pass.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::codec::FrameLen;
use crate::linearize::{Block, BlockKind};

/// Deterministic counters collected during one pass.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub blocks_root: u64,
    pub blocks_author_ids: u64,
    pub blocks_page_info: u64,
    pub blocks_group: u64,
    pub blocks_membership: u64,
    pub blocks_stroke: u64,
    pub blocks_highlight: u64,
    pub blocks_opaque: u64,
    pub points: u64,
    pub bytes_header: u64,
    pub bytes_framing: u64,
    pub bytes_payload: u64,
}

impl TelemetryCounters {
    /// Record the file header.
    pub fn add_header(&mut self, header_len: usize) {
        self.bytes_header += header_len as u64;
    }

    /// Record one framed block.
    pub fn add_block(&mut self, block: &Block, frame: FrameLen) {
        match block.kind() {
            Some(BlockKind::Root)            => self.blocks_root += 1,
            Some(BlockKind::AuthorIds)       => self.blocks_author_ids += 1,
            Some(BlockKind::PageInfo)        => self.blocks_page_info += 1,
            Some(BlockKind::Group)           => self.blocks_group += 1,
            Some(BlockKind::GroupMembership) => self.blocks_membership += 1,
            Some(BlockKind::Stroke)          => self.blocks_stroke += 1,
            Some(BlockKind::Highlight)       => self.blocks_highlight += 1,
            None                             => self.blocks_opaque += 1,
        }
        if let Block::Stroke(stroke) = block {
            self.points += stroke.points.len() as u64;
        }
        self.bytes_payload += frame.payload as u64;
        self.bytes_framing += frame.header as u64;
    }

    /// Total number of blocks, opaque ones included.
    pub fn blocks_total(&self) -> u64 {
        self.blocks_root
            + self.blocks_author_ids
            + self.blocks_page_info
            + self.blocks_group
            + self.blocks_membership
            + self.blocks_stroke
            + self.blocks_highlight
            + self.blocks_opaque
    }

    /// Header + framing + payload: the stream length.
    pub fn bytes_total(&self) -> u64 {
        self.bytes_header + self.bytes_framing + self.bytes_payload
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        *self += other.clone();
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.blocks_root       += rhs.blocks_root;
        self.blocks_author_ids += rhs.blocks_author_ids;
        self.blocks_page_info  += rhs.blocks_page_info;
        self.blocks_group      += rhs.blocks_group;
        self.blocks_membership += rhs.blocks_membership;
        self.blocks_stroke     += rhs.blocks_stroke;
        self.blocks_highlight  += rhs.blocks_highlight;
        self.blocks_opaque     += rhs.blocks_opaque;

        self.points            += rhs.points;
        self.bytes_header      += rhs.bytes_header;
        self.bytes_framing     += rhs.bytes_framing;
        self.bytes_payload     += rhs.bytes_payload;
    }
}
