// Linearizer suite: parent-before-child order, sibling order, membership
// content and the fixed page-level prefix.

#[cfg(test)]
mod tests {
    use rmscene_core::ids::{CrdtId, IdAllocator};
    use rmscene_core::linearize::{first_forward_reference, linearize, Block, BlockKind};
    use rmscene_core::scene::{Document, Point, Tool};

    fn square() -> Vec<Point> {
        [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]
            .into_iter()
            .map(|(x, y)| Point::new(x, y, 2.0))
            .collect()
    }

    fn position(blocks: &[Block], id: CrdtId, kind: BlockKind) -> usize {
        blocks
            .iter()
            .position(|b| b.kind() == Some(kind) && b.primary_id() == Some(id))
            .unwrap()
    }

// # ✅ 1. Two sibling groups, one stroke each

    #[test]
    fn groups_precede_strokes_and_strokes_keep_creation_order() {
        let mut doc = Document::new();
        let mut alloc = IdAllocator::new(1);
        let g1 = doc.create_layer(&mut alloc, "A", true).unwrap();
        let g2 = doc.create_layer(&mut alloc, "B", true).unwrap();
        // created in reverse group order on purpose
        let s2 = doc.create_stroke(&mut alloc, g2, Tool::Ballpoint1, 0, 2.0, square()).unwrap();
        let s1 = doc.create_stroke(&mut alloc, g1, Tool::Ballpoint1, 0, 2.0, square()).unwrap();

        let blocks = linearize(&doc).unwrap();

        let pg1 = position(&blocks, g1, BlockKind::Group);
        let pg2 = position(&blocks, g2, BlockKind::Group);
        let ps1 = position(&blocks, s1, BlockKind::Stroke);
        let ps2 = position(&blocks, s2, BlockKind::Stroke);

        assert!(pg1.max(pg2) < ps1.min(ps2));
        assert!(pg1 < pg2);
        assert!(ps2 < ps1, "strokes follow creation order, not group order");
        assert_eq!(first_forward_reference(&blocks), None);
    }

// # ✅ 2. Fixed prefix

    #[test]
    fn stream_starts_with_root_and_page_blocks() {
        let doc = Document::new();
        let blocks = linearize(&doc).unwrap();

        let kinds: Vec<Option<BlockKind>> = blocks.iter().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![
                Some(BlockKind::Root),
                Some(BlockKind::AuthorIds),
                Some(BlockKind::PageInfo),
                Some(BlockKind::GroupMembership),
            ]
        );
        assert_eq!(blocks[0], Block::Root(CrdtId::ROOT));
        assert_eq!(blocks[3], Block::GroupMembership { group: CrdtId::ROOT, children: vec![] });
    }

// # ✅ 3. Nested groups, breadth-first

    #[test]
    fn nested_groups_come_after_their_parent_with_membership() {
        let mut doc = Document::new();
        let mut alloc = IdAllocator::new(1);
        let layer = doc.create_layer(&mut alloc, "L", true).unwrap();
        let inner = doc.create_group(&mut alloc, layer, "inner", true).unwrap();
        let deep = doc.create_group(&mut alloc, inner, "deep", false).unwrap();
        let s = doc.create_stroke(&mut alloc, deep, Tool::Pencil1, 1, 1.0, square()).unwrap();
        let other = doc.create_layer(&mut alloc, "other", true).unwrap();

        let blocks = linearize(&doc).unwrap();
        let groups: Vec<CrdtId> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Group(g) => Some(g.id),
                _ => None,
            })
            .collect();
        assert_eq!(groups, vec![layer, other, inner, deep]);

        // every group block is followed by its membership block
        for id in [layer, other, inner, deep] {
            let at = position(&blocks, id, BlockKind::Group);
            assert!(matches!(&blocks[at + 1], Block::GroupMembership { group, .. } if *group == id));
        }

        let membership = blocks
            .iter()
            .find_map(|b| match b {
                Block::GroupMembership { group, children } if *group == layer => Some(children.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(membership, vec![inner]);
        assert_eq!(blocks.last().and_then(Block::primary_id), Some(s));
        assert_eq!(first_forward_reference(&blocks), None);
    }

// # ✅ 4. Leaves

    #[test]
    fn highlights_and_strokes_interleave_in_creation_order() {
        let mut doc = Document::new();
        let mut alloc = IdAllocator::new(1);
        let layer = doc.create_layer(&mut alloc, "L", true).unwrap();
        let a = doc.create_stroke(&mut alloc, layer, Tool::Marker1, 0, 2.0, square()).unwrap();
        let b = doc.create_highlight(&mut alloc, layer, "text", 3, None, vec![]).unwrap();
        let c = doc.create_stroke(&mut alloc, layer, Tool::Marker2, 0, 2.0, square()).unwrap();

        let blocks = linearize(&doc).unwrap();
        let leaves: Vec<CrdtId> = blocks
            .iter()
            .filter(|b| matches!(b, Block::Stroke(_) | Block::Highlight(_)))
            .filter_map(Block::primary_id)
            .collect();
        assert_eq!(leaves, vec![a, b, c]);
    }

    #[test]
    fn block_count_matches_document() {
        let mut doc = Document::new();
        let mut alloc = IdAllocator::new(1);
        let l1 = doc.create_layer(&mut alloc, "1", true).unwrap();
        let l2 = doc.create_layer(&mut alloc, "2", true).unwrap();
        for _ in 0..3 {
            doc.create_stroke(&mut alloc, l1, Tool::Ballpoint1, 0, 2.0, square()).unwrap();
            doc.create_stroke(&mut alloc, l2, Tool::Ballpoint1, 0, 2.0, square()).unwrap();
        }

        // root + authors + page info + root membership + 2 × (group + membership) + 6 strokes
        assert_eq!(linearize(&doc).unwrap().len(), 4 + 4 + 6);
    }
}
