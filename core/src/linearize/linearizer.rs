use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::ids::CrdtId;
use crate::linearize::types::Block;
use crate::scene::{Document, SceneItem, SceneNode};
use crate::types::StructuralError;

/// Flatten a document into the block order a decoder can replay.
///
/// Order:
///
/// ```text
/// [ root ]
/// [ author ids ] [ page info ]
/// [ membership(root) ]
/// [ group ] [ membership(group) ]   per group, breadth-first from the root
/// [ stroke | highlight ]            per leaf, creation order
/// [ opaque ]                        blocks carried over from a read
/// ```
///
/// Every block that names a parent comes after the block defining it.
/// Dangling parents, leaves under the root and unreachable groups are
/// reported, never skipped.
pub fn linearize(doc: &Document) -> Result<Vec<Block>, StructuralError> {
    let root = doc.root();
    let mut blocks = Vec::with_capacity(3 + 2 * doc.groups().len() + doc.items().len() + doc.opaque_blocks().len());
    let mut defined: HashSet<CrdtId> = HashSet::new();

    blocks.push(Block::Root(root));
    defined.insert(root);
    blocks.push(Block::AuthorIds { root, authors: doc.authors().clone() });
    blocks.push(Block::PageInfo { root, info: *doc.page_info() });
    blocks.push(membership(doc, root)?);

    // --- groups, breadth-first ---
    let mut queue: VecDeque<CrdtId> = child_groups(doc, root).into();
    while let Some(id) = queue.pop_front() {
        let Some(group) = doc.group(id) else {
            return Err(StructuralError::Unreachable { id });
        };
        if !defined.contains(&group.parent_id) {
            return Err(StructuralError::UnknownParent { kind: "group", id, parent: group.parent_id });
        }
        if !defined.insert(id) {
            return Err(StructuralError::DuplicateId { id });
        }
        trace!(group = %id, parent = %group.parent_id, "linearize group");
        blocks.push(Block::Group(group.clone()));
        blocks.push(membership(doc, id)?);
        queue.extend(child_groups(doc, id));
    }

    if let Some(stray) = doc.groups().iter().find(|g| !defined.contains(&g.id)) {
        let parent_known = stray.parent_id == root || doc.group(stray.parent_id).is_some();
        return Err(if parent_known {
            StructuralError::Unreachable { id: stray.id }
        } else {
            StructuralError::UnknownParent { kind: "group", id: stray.id, parent: stray.parent_id }
        });
    }

    // --- leaves, creation order ---
    for item in doc.items() {
        let (id, parent) = (item.id(), item.parent_id());
        let kind = SceneNode::from(item).kind();
        if parent == root {
            return Err(StructuralError::LeafUnderRoot { kind, id });
        }
        if !defined.contains(&parent) {
            return Err(StructuralError::UnknownParent { kind, id, parent });
        }
        if !defined.insert(id) {
            return Err(StructuralError::DuplicateId { id });
        }
        blocks.push(match item {
            SceneItem::Stroke(s) => Block::Stroke(s.clone()),
            SceneItem::Highlight(h) => Block::Highlight(h.clone()),
        });
    }

    blocks.extend(doc.opaque_blocks().iter().cloned().map(Block::Opaque));

    debug!(
        blocks = blocks.len(),
        groups = doc.groups().len(),
        items = doc.items().len(),
        "linearized document"
    );
    Ok(blocks)
}

/// Membership block for `group`; every listed child must exist and point back.
fn membership(doc: &Document, group: CrdtId) -> Result<Block, StructuralError> {
    let children = doc.child_ids(group).to_vec();
    for child in &children {
        match doc.node(*child) {
            None => {
                return Err(StructuralError::MembershipMismatch {
                    group,
                    child: *child,
                    reason: "listed child does not exist",
                })
            }
            Some(node) if node.parent_id() != group => {
                return Err(StructuralError::MembershipMismatch {
                    group,
                    child: *child,
                    reason: "listed child names another parent",
                })
            }
            Some(_) => {}
        }
    }
    Ok(Block::GroupMembership { group, children })
}

fn child_groups(doc: &Document, parent: CrdtId) -> Vec<CrdtId> {
    doc.children(parent)
        .filter_map(|n| match n {
            SceneNode::Group(g) => Some(g.id),
            _ => None,
        })
        .collect()
}

/// Check the parent-before-child rule over an arbitrary block sequence.
///
/// Returns the index of the first offending block, if any.
pub fn first_forward_reference(blocks: &[Block]) -> Option<usize> {
    let mut defined: HashSet<CrdtId> = HashSet::new();
    for (i, block) in blocks.iter().enumerate() {
        if let Some(parent) = block.parent_id() {
            if !defined.contains(&parent) {
                return Some(i);
            }
        }
        if let Some(id) = block.primary_id() {
            defined.insert(id);
        }
    }
    None
}
