//! io/reader.rs
//! Bytes → Document.
//!
//! Decoding and replay are separate passes: the whole block stream is
//! decoded first, then replayed onto an empty document. Replay rules:
//!
//! - the first block is the root, and there is only one
//! - groups, strokes and highlights attach to an already defined parent
//! - identifiers are never defined twice
//! - membership blocks are optional, at most one per group, and must list
//!   exactly the children that name that group as parent; when present
//!   their order wins over encounter order
//! - unknown blocks are kept as opaque blocks

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::time::Instant;

use tracing::{debug, trace};

use crate::codec::{decode_frame_at, CodecError};
use crate::headers::{decode_header, FileHeader};
use crate::ids::CrdtId;
use crate::linearize::Block;
use crate::scene::{Document, SceneItem};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::{SceneError, StructuralError};

/// Parse a complete file.
pub fn read(buf: &[u8]) -> Result<Document, SceneError> {
    read_with_telemetry(buf).map(|(doc, _)| doc)
}

/// Read everything from `r`, then parse it.
pub fn read_from<R: Read>(r: &mut R) -> Result<Document, SceneError> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;
    read(&buf)
}

/// Parse a complete file and report how many bytes were consumed.
pub fn decode(buf: &[u8]) -> Result<(Document, usize), SceneError> {
    let (doc, snapshot) = read_with_telemetry(buf)?;
    Ok((doc, snapshot.bytes_total as usize))
}

/// Like `read`, also returning counters and stage timings.
pub fn read_with_telemetry(buf: &[u8]) -> Result<(Document, TelemetrySnapshot), SceneError> {
    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();

    let header = timer.time(Stage::Validate, || decode_header(buf))?;
    counters.add_header(FileHeader::LEN);

    let start = Instant::now();
    let blocks = decode_body(&buf[FileHeader::LEN..], FileHeader::LEN, &mut counters)?;
    timer.add_stage_time(Stage::Decode, start.elapsed());

    let start = Instant::now();
    let mut replayer = Replayer::default();
    for (offset, block) in blocks {
        replayer.apply(offset, block)?;
    }
    timer.add_stage_time(Stage::Replay, start.elapsed());

    let doc = timer.time(Stage::Validate, || replayer.finish())?;
    timer.finish();

    debug!(
        version = header.version,
        bytes = buf.len(),
        blocks = counters.blocks_total(),
        opaque = counters.blocks_opaque,
        "read scene"
    );
    Ok((doc, TelemetrySnapshot::from(&counters, &timer)))
}

/// Decode every block of `body`. `base` is the absolute offset of `body[0]`.
fn decode_body(
    body: &[u8],
    base: usize,
    counters: &mut TelemetryCounters,
) -> Result<Vec<(usize, Block)>, CodecError> {
    let mut blocks = Vec::new();
    let mut pos = 0;
    while pos < body.len() {
        let offset = base + pos;
        let (block, frame) = decode_frame_at(&body[pos..], offset)?;
        counters.add_block(&block, frame);
        blocks.push((offset, block));
        pos += frame.total();
    }
    Ok(blocks)
}

fn check_root(doc: &Document, kind: &'static str, root: CrdtId) -> Result<(), StructuralError> {
    if root != doc.root {
        return Err(StructuralError::UnknownParent { kind, id: root, parent: root });
    }
    Ok(())
}

/// Rebuilds a document block by block.
#[derive(Default)]
struct Replayer {
    doc: Option<Document>,
    memberships: BTreeMap<CrdtId, Vec<CrdtId>>,
}

impl Replayer {
    fn apply(&mut self, offset: usize, block: Block) -> Result<(), StructuralError> {
        trace!(offset, kind = block.name(), id = ?block.primary_id(), "replay block");

        let doc = match self.doc.as_mut() {
            Some(doc) => doc,
            None => return self.start(block),
        };

        match block {
            Block::Root(id) => return Err(StructuralError::DuplicateRoot { id }),
            Block::AuthorIds { root, authors } => {
                check_root(doc, "author-ids", root)?;
                doc.authors = authors;
            }
            Block::PageInfo { root, info } => {
                check_root(doc, "page-info", root)?;
                doc.page_info = info;
            }
            Block::Group(group) => doc.insert_group(group)?,
            Block::GroupMembership { group, children } => {
                if group != doc.root && doc.group(group).is_none() {
                    return Err(StructuralError::UnknownParent {
                        kind: "group-membership",
                        id: group,
                        parent: group,
                    });
                }
                if self.memberships.insert(group, children).is_some() {
                    return Err(StructuralError::DuplicateMembership { group });
                }
            }
            Block::Stroke(stroke) => doc.insert_item(SceneItem::Stroke(stroke))?,
            Block::Highlight(highlight) => doc.insert_item(SceneItem::Highlight(highlight))?,
            Block::Opaque(opaque) => doc.opaque.push(opaque),
        }
        Ok(())
    }

    fn start(&mut self, block: Block) -> Result<(), StructuralError> {
        let Block::Root(root) = block else {
            return Err(StructuralError::MissingRoot { found: block.name() });
        };
        if root.is_none() {
            return Err(StructuralError::InvalidRoot);
        }
        self.doc = Some(Document::with_root(root));
        Ok(())
    }

    /// Reconcile membership blocks with the parents children declared.
    fn finish(self) -> Result<Document, StructuralError> {
        let Some(mut doc) = self.doc else {
            return Err(StructuralError::MissingRoot { found: "end of stream" });
        };

        for (group, listed) in self.memberships {
            let actual = doc.child_ids(group);
            let actual_set: HashSet<CrdtId> = actual.iter().copied().collect();

            let mut seen = HashSet::with_capacity(listed.len());
            for child in &listed {
                if !seen.insert(*child) {
                    return Err(StructuralError::MembershipMismatch {
                        group,
                        child: *child,
                        reason: "child listed twice",
                    });
                }
                if !actual_set.contains(child) {
                    return Err(StructuralError::MembershipMismatch {
                        group,
                        child: *child,
                        reason: "listed child does not name this group as parent",
                    });
                }
            }
            if let Some(missing) = actual.iter().find(|c| !seen.contains(*c)) {
                return Err(StructuralError::MembershipMismatch {
                    group,
                    child: *missing,
                    reason: "child missing from membership block",
                });
            }

            doc.children.insert(group, listed);
        }
        Ok(doc)
    }
}
