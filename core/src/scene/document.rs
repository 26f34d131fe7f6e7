//! scene/document.rs
//!
//! In-memory scene tree and its append-only builder.
//!
//! Design notes:
//! - The document owns every group and leaf item; nodes only point upwards
//!   through `parent_id`, parent lookup goes through an id index.
//! - Child lists per parent are kept in creation order. That order is what
//!   the linearizer writes into membership blocks.
//! - Every builder call validates first and claims ids on a copy of the
//!   allocator, committed only on success, so a rejected call leaves both
//!   document and allocator untouched.
//! - Reserved ids never name a node or timestamp.

use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use crate::constants::DEFAULT_AUTHOR;
use crate::ids::{CrdtId, IdAllocator, LwwValue};
use crate::linearize::OpaqueBlock;
use crate::scene::types::{
    Group, Highlight, PageInfo, Point, Rect, SceneItem, SceneNode, Stroke, Tool, ValidationError,
};
use crate::types::StructuralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeSlot {
    Group(usize),
    Item(usize),
}

/// A scene document: root, groups, strokes and highlights.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) root: CrdtId,
    pub(crate) groups: Vec<Group>,
    pub(crate) items: Vec<SceneItem>,
    pub(crate) children: HashMap<CrdtId, Vec<CrdtId>>,
    pub(crate) index: HashMap<CrdtId, NodeSlot>,
    pub(crate) timestamps: HashSet<CrdtId>,
    pub(crate) authors: BTreeMap<u32, Uuid>,
    pub(crate) page_info: PageInfo,
    pub(crate) opaque: Vec<OpaqueBlock>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Fresh document as the tablet would create it: root `(0,1)`, one
    /// registered author with a random UUID, loaded once.
    pub fn new() -> Self {
        let mut doc = Self::with_root(CrdtId::ROOT);
        doc.authors.insert(DEFAULT_AUTHOR, Uuid::new_v4());
        doc.page_info.loads_count = 1;
        doc
    }

    /// Bare document with the given root and no metadata.
    pub(crate) fn with_root(root: CrdtId) -> Self {
        let mut children = HashMap::new();
        children.insert(root, Vec::new());
        Self {
            root,
            groups: Vec::new(),
            items: Vec::new(),
            children,
            index: HashMap::new(),
            timestamps: HashSet::new(),
            authors: BTreeMap::new(),
            page_info: PageInfo::default(),
            opaque: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    /// Create a group under `parent` (the root for a layer, or another group).
    ///
    /// Consumes three ids: node, label timestamp, visibility timestamp.
    pub fn create_group(
        &mut self,
        alloc: &mut IdAllocator,
        parent: CrdtId,
        label: impl Into<String>,
        visible: bool,
    ) -> Result<CrdtId, ValidationError> {
        if parent != self.root && self.group(parent).is_none() {
            return Err(ValidationError::UnknownParent { field: "parent", parent });
        }

        let mut trial = alloc.clone();
        let [id, label_ts, visible_ts] = [trial.next()?, trial.next()?, trial.next()?];
        for claimed in [id, label_ts, visible_ts] {
            if self.is_used(claimed) {
                return Err(ValidationError::DuplicateId { id: claimed });
            }
        }
        *alloc = trial;

        let group = Group {
            id,
            parent_id: parent,
            label: LwwValue::new(label_ts, label.into()),
            visible: LwwValue::new(visible_ts, visible),
        };
        self.insert_group(group).map_err(|_| ValidationError::DuplicateId { id })?;
        Ok(id)
    }

    /// Convenience: a group directly under the root.
    pub fn create_layer(
        &mut self,
        alloc: &mut IdAllocator,
        label: impl Into<String>,
        visible: bool,
    ) -> Result<CrdtId, ValidationError> {
        let root = self.root;
        self.create_group(alloc, root, label, visible)
    }

    /// Create a stroke inside `parent_group`.
    ///
    /// Points are quantized before they are stored. Consumes one id.
    pub fn create_stroke(
        &mut self,
        alloc: &mut IdAllocator,
        parent_group: CrdtId,
        tool: Tool,
        color: u32,
        width: f64,
        points: Vec<Point>,
    ) -> Result<CrdtId, ValidationError> {
        self.check_leaf_parent(parent_group, "stroke")?;

        if !width.is_finite() || width <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "width",
                reason: format!("{width} must be finite and > 0"),
            });
        }
        if points.is_empty() {
            return Err(ValidationError::Empty { field: "points" });
        }
        let points = points
            .iter()
            .enumerate()
            .map(|(i, p)| p.quantized(i))
            .collect::<Result<Vec<_>, _>>()?;

        let id = self.claim(alloc)?;
        let stroke = Stroke { id, parent_id: parent_group, tool, color, width, points };
        self.insert_item(SceneItem::Stroke(stroke)).map_err(|_| ValidationError::DuplicateId { id })?;
        Ok(id)
    }

    /// Create a text highlight inside `parent_group`. Consumes one id.
    pub fn create_highlight(
        &mut self,
        alloc: &mut IdAllocator,
        parent_group: CrdtId,
        text: impl Into<String>,
        color: u32,
        start: Option<u64>,
        rectangles: Vec<Rect>,
    ) -> Result<CrdtId, ValidationError> {
        self.check_leaf_parent(parent_group, "highlight")?;

        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }
        for (i, r) in rectangles.iter().enumerate() {
            let finite = [r.x, r.y, r.w, r.h].iter().all(|v| v.is_finite());
            if !finite || r.w < 0.0 || r.h < 0.0 {
                return Err(ValidationError::OutOfRange {
                    field: "rectangles",
                    reason: format!("rectangle {i} must be finite with non-negative size"),
                });
            }
        }

        let id = self.claim(alloc)?;
        let length = text.chars().count() as u64;
        let highlight = Highlight { id, parent_id: parent_group, color, text, start, length, rectangles };
        self.insert_item(SceneItem::Highlight(highlight)).map_err(|_| ValidationError::DuplicateId { id })?;
        Ok(id)
    }

    /// Allocator for `author` that cannot collide with anything already in
    /// this document. Use it to extend a document that was read from a file.
    pub fn allocator_for(&self, author: u32) -> IdAllocator {
        let last = std::iter::once(self.root)
            .chain(self.index.keys().copied())
            .chain(self.timestamps.iter().copied())
            .filter(|id| id.author == author)
            .map(|id| id.counter)
            .max()
            .unwrap_or(0);
        IdAllocator::resume_after(author, last)
    }

    /// Register a device author.
    pub fn set_author(&mut self, author: u32, uuid: Uuid) {
        self.authors.insert(author, uuid);
    }

    pub fn page_info_mut(&mut self) -> &mut PageInfo {
        &mut self.page_info
    }

    fn check_leaf_parent(&self, parent: CrdtId, what: &'static str) -> Result<(), ValidationError> {
        if parent == self.root {
            return Err(ValidationError::RootParent { field: "parent_group", what });
        }
        if self.group(parent).is_none() {
            return Err(ValidationError::UnknownParent { field: "parent_group", parent });
        }
        Ok(())
    }

    fn claim(&self, alloc: &mut IdAllocator) -> Result<CrdtId, ValidationError> {
        let mut trial = alloc.clone();
        let id = trial.next()?;
        if self.is_used(id) {
            return Err(ValidationError::DuplicateId { id });
        }
        *alloc = trial;
        Ok(id)
    }

    fn is_used(&self, id: CrdtId) -> bool {
        id.is_reserved() || id == self.root || self.index.contains_key(&id) || self.timestamps.contains(&id)
    }

    /// Reader-side check for an id about to be defined.
    fn check_fresh(&self, id: CrdtId) -> Result<(), StructuralError> {
        if id.is_reserved() && id != self.root {
            return Err(StructuralError::ReservedId { id });
        }
        if self.is_used(id) {
            return Err(StructuralError::DuplicateId { id });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Raw insertion (shared by builder and reader)
    // -------------------------------------------------------------------------

    /// Attach a group. The parent must already be known.
    pub(crate) fn insert_group(&mut self, group: Group) -> Result<(), StructuralError> {
        if group.parent_id != self.root && self.group(group.parent_id).is_none() {
            return Err(StructuralError::UnknownParent {
                kind: "group",
                id: group.id,
                parent: group.parent_id,
            });
        }
        for id in [group.id, group.label.timestamp, group.visible.timestamp] {
            self.check_fresh(id)?;
        }

        self.timestamps.insert(group.label.timestamp);
        self.timestamps.insert(group.visible.timestamp);
        self.index.insert(group.id, NodeSlot::Group(self.groups.len()));
        self.children.entry(group.parent_id).or_default().push(group.id);
        self.children.entry(group.id).or_default();
        self.groups.push(group);
        Ok(())
    }

    /// Attach a stroke or highlight. The parent must be a known group.
    pub(crate) fn insert_item(&mut self, item: SceneItem) -> Result<(), StructuralError> {
        let (id, parent) = (item.id(), item.parent_id());
        let kind = match item {
            SceneItem::Stroke(_) => "stroke",
            SceneItem::Highlight(_) => "highlight",
        };
        if parent == self.root {
            return Err(StructuralError::LeafUnderRoot { kind, id });
        }
        if self.group(parent).is_none() {
            return Err(StructuralError::UnknownParent { kind, id, parent });
        }
        self.check_fresh(id)?;

        self.index.insert(id, NodeSlot::Item(self.items.len()));
        self.children.entry(parent).or_default().push(id);
        self.items.push(item);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn root(&self) -> CrdtId {
        self.root
    }

    /// Groups in insertion order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Groups whose parent is the root.
    pub fn layers(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(move |g| g.parent_id == self.root)
    }

    /// Strokes in creation order.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.items.iter().filter_map(|i| match i {
            SceneItem::Stroke(s) => Some(s),
            _ => None,
        })
    }

    /// Highlights in creation order.
    pub fn highlights(&self) -> impl Iterator<Item = &Highlight> {
        self.items.iter().filter_map(|i| match i {
            SceneItem::Highlight(h) => Some(h),
            _ => None,
        })
    }

    /// Strokes and highlights in creation order.
    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn group(&self, id: CrdtId) -> Option<&Group> {
        match self.index.get(&id) {
            Some(NodeSlot::Group(i)) => self.groups.get(*i),
            _ => None,
        }
    }

    pub fn stroke(&self, id: CrdtId) -> Option<&Stroke> {
        match self.node(id) {
            Some(SceneNode::Stroke(s)) => Some(s),
            _ => None,
        }
    }

    pub fn node(&self, id: CrdtId) -> Option<SceneNode<'_>> {
        match self.index.get(&id)? {
            NodeSlot::Group(i) => self.groups.get(*i).map(SceneNode::Group),
            NodeSlot::Item(i) => self.items.get(*i).map(SceneNode::from),
        }
    }

    /// Child ids of `parent` in creation order (empty for unknown ids and leaves).
    pub fn child_ids(&self, parent: CrdtId) -> &[CrdtId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct children of `parent` in creation order.
    pub fn children(&self, parent: CrdtId) -> impl Iterator<Item = SceneNode<'_>> {
        self.child_ids(parent).iter().filter_map(move |id| self.node(*id))
    }

    pub fn authors(&self) -> &BTreeMap<u32, Uuid> {
        &self.authors
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    /// Blocks read from a file that this codec does not understand.
    pub fn opaque_blocks(&self) -> &[OpaqueBlock] {
        &self.opaque
    }

    /// Groups plus leaf items (the root is not counted).
    pub fn node_count(&self) -> usize {
        self.groups.len() + self.items.len()
    }

    pub fn point_count(&self) -> usize {
        self.strokes().map(|s| s.points.len()).sum()
    }
}

/// Structural equality: same root and metadata, same groups (as a set),
/// same leaf items in the same order, same child order under every parent.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        let sorted = |groups: &[Group]| {
            let mut v: Vec<Group> = groups.to_vec();
            v.sort_by_key(|g| g.id);
            v
        };
        self.root == other.root
            && self.authors == other.authors
            && self.page_info == other.page_info
            && self.items == other.items
            && self.children == other.children
            && self.opaque == other.opaque
            && sorted(&self.groups) == sorted(&other.groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_call_does_not_consume_ids() {
        let mut doc = Document::new();
        let mut alloc = IdAllocator::new(1);
        let before = alloc.peek();

        let err = doc
            .create_stroke(&mut alloc, CrdtId::new(9, 9), Tool::Ballpoint1, 0, 1.0, vec![Point::new(0.0, 0.0, 2.0)])
            .unwrap_err();
        assert_eq!(err.field(), "parent_group");
        assert_eq!(alloc.peek(), before);
        assert_eq!(doc.node_count(), 0);
    }

    #[test]
    fn colliding_group_ids_leave_allocator_untouched() {
        let mut doc = Document::new();
        let mut alloc = IdAllocator::new(1);
        let layer = doc.create_layer(&mut alloc, "L", true).unwrap();

        // a second session restarting at the same counters
        let mut stale = IdAllocator::new(1);
        let err = doc.create_group(&mut stale, layer, "again", true).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateId { id: layer });
        assert_eq!(stale.peek(), Some(CrdtId::new(1, 2)));
        assert_eq!(stale.allocated(), 0);
    }

    #[test]
    fn index_tracks_both_kinds() {
        let mut doc = Document::new();
        let mut alloc = IdAllocator::new(1);
        let layer = doc.create_layer(&mut alloc, "L", true).unwrap();
        let stroke = doc
            .create_stroke(&mut alloc, layer, Tool::Fineliner1, 0, 1.0, vec![Point::new(1.0, 2.0, 2.0)])
            .unwrap();

        assert!(matches!(doc.index.get(&layer), Some(NodeSlot::Group(0))));
        assert!(matches!(doc.index.get(&stroke), Some(NodeSlot::Item(0))));
        assert_eq!(doc.child_ids(layer), &[stroke]);
    }
}
