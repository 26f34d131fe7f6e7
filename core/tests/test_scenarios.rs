// Reader suite over hand-assembled streams: tolerance of unknown blocks,
// optional membership, and every structural rejection of the replay.

#[cfg(test)]
mod tests {
    use rmscene_core::codec::{encode_block, CodecError};
    use rmscene_core::headers::{encode_header, FileHeader};
    use rmscene_core::ids::{CrdtId, LwwValue};
    use rmscene_core::io::{read, read_with_telemetry};
    use rmscene_core::linearize::Block;
    use rmscene_core::scene::{Group, Point, Stroke, Tool};
    use rmscene_core::types::{SceneError, StructuralError};

    const LAYER: CrdtId = CrdtId::new(1, 2);

    fn file(blocks: &[Vec<u8>]) -> Vec<u8> {
        let mut out = encode_header(&FileHeader::default()).unwrap().to_vec();
        for b in blocks {
            out.extend_from_slice(b);
        }
        out
    }

    fn enc(block: Block) -> Vec<u8> {
        encode_block(&block).unwrap()
    }

    fn root() -> Vec<u8> {
        enc(Block::Root(CrdtId::ROOT))
    }

    fn group(id: CrdtId, parent: CrdtId) -> Vec<u8> {
        enc(Block::Group(Group {
            id,
            parent_id: parent,
            label: LwwValue::new(CrdtId::new(id.author, id.counter + 1000), "Layer".into()),
            visible: LwwValue::new(CrdtId::new(id.author, id.counter + 2000), true),
        }))
    }

    fn stroke_block(id: CrdtId, parent: CrdtId, x: f32) -> Stroke {
        Stroke {
            id,
            parent_id: parent,
            tool: Tool::Ballpoint2,
            color: 0,
            width: 2.0,
            points: vec![Point::new(x, 0.0, 2.0), Point::new(x, 10.0, 2.0), Point::new(x + 5.0, 10.0, 2.0)],
        }
    }

    fn stroke(id: CrdtId, parent: CrdtId) -> Vec<u8> {
        enc(Block::Stroke(stroke_block(id, parent, 0.0)))
    }

    fn membership(group: CrdtId, children: &[CrdtId]) -> Vec<u8> {
        enc(Block::GroupMembership { group, children: children.to_vec() })
    }

    fn structural(bytes: &[u8]) -> StructuralError {
        match read(bytes) {
            Err(SceneError::Structural(e)) => e,
            other => panic!("expected structural error, got {other:?}"),
        }
    }

// # ✅ 1. Unknown tag between two strokes

    #[test]
    fn bogus_block_between_strokes_is_skipped() {
        let a = stroke_block(CrdtId::new(1, 10), LAYER, 1.0);
        let b = stroke_block(CrdtId::new(1, 11), LAYER, 50.0);
        let bogus = vec![0xee, 0x04, 0xde, 0xad, 0xbe, 0xef];

        let bytes = file(&[
            root(),
            group(LAYER, CrdtId::ROOT),
            enc(Block::Stroke(a.clone())),
            bogus,
            enc(Block::Stroke(b.clone())),
        ]);

        let (doc, snapshot) = read_with_telemetry(&bytes).unwrap();
        let strokes: Vec<&Stroke> = doc.strokes().collect();
        assert_eq!(strokes, vec![&a, &b]);
        assert_eq!(doc.child_ids(LAYER), &[a.id, b.id]);
        assert_eq!(doc.opaque_blocks().len(), 1);
        assert_eq!(doc.opaque_blocks()[0].payload.as_ref(), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(snapshot.counters.blocks_opaque, 1);
        assert_eq!(snapshot.counters.blocks_stroke, 2);
        assert_eq!(snapshot.bytes_total as usize, bytes.len());
    }

// # ✅ 2. Membership

    #[test]
    fn membership_blocks_are_optional() {
        let bytes = file(&[root(), group(LAYER, CrdtId::ROOT), stroke(CrdtId::new(1, 9), LAYER)]);
        let doc = read(&bytes).unwrap();
        assert_eq!(doc.child_ids(CrdtId::ROOT), &[LAYER]);
        assert_eq!(doc.child_ids(LAYER), &[CrdtId::new(1, 9)]);
    }

    #[test]
    fn membership_order_wins_over_encounter_order() {
        let (s1, s2) = (CrdtId::new(1, 9), CrdtId::new(1, 10));
        let bytes = file(&[
            root(),
            group(LAYER, CrdtId::ROOT),
            membership(LAYER, &[s2, s1]),
            stroke(s1, LAYER),
            stroke(s2, LAYER),
        ]);
        let doc = read(&bytes).unwrap();
        assert_eq!(doc.child_ids(LAYER), &[s2, s1]);
    }

    #[test]
    fn membership_missing_a_child_is_rejected() {
        let (s1, s2) = (CrdtId::new(1, 9), CrdtId::new(1, 10));
        let bytes = file(&[
            root(),
            group(LAYER, CrdtId::ROOT),
            membership(LAYER, &[s1]),
            stroke(s1, LAYER),
            stroke(s2, LAYER),
        ]);
        assert_eq!(
            structural(&bytes),
            StructuralError::MembershipMismatch {
                group: LAYER,
                child: s2,
                reason: "child missing from membership block",
            }
        );
    }

    #[test]
    fn membership_listing_a_stranger_is_rejected() {
        let ghost = CrdtId::new(4, 4);
        let bytes = file(&[root(), group(LAYER, CrdtId::ROOT), membership(LAYER, &[ghost])]);
        assert!(matches!(
            structural(&bytes),
            StructuralError::MembershipMismatch { child, .. } if child == ghost
        ));
    }

    #[test]
    fn duplicate_membership_is_rejected() {
        let bytes = file(&[
            root(),
            group(LAYER, CrdtId::ROOT),
            membership(LAYER, &[]),
            membership(LAYER, &[]),
        ]);
        assert_eq!(structural(&bytes), StructuralError::DuplicateMembership { group: LAYER });
    }

    #[test]
    fn membership_for_undefined_group_is_rejected() {
        let bytes = file(&[root(), membership(LAYER, &[])]);
        assert!(matches!(structural(&bytes), StructuralError::UnknownParent { .. }));
    }

// # ✅ 3. Root

    #[test]
    fn stream_must_start_with_root() {
        let bytes = file(&[group(LAYER, CrdtId::ROOT), root()]);
        assert_eq!(structural(&bytes), StructuralError::MissingRoot { found: "group" });
    }

    #[test]
    fn header_only_file_has_no_root() {
        let bytes = file(&[]);
        assert_eq!(structural(&bytes), StructuralError::MissingRoot { found: "end of stream" });
    }

    #[test]
    fn opaque_block_before_root_is_rejected() {
        let bytes = file(&[vec![0x50, 0x00], root()]);
        assert_eq!(structural(&bytes), StructuralError::MissingRoot { found: "opaque" });
    }

    #[test]
    fn second_root_is_rejected() {
        let bytes = file(&[root(), enc(Block::Root(CrdtId::new(0, 9)))]);
        assert_eq!(structural(&bytes), StructuralError::DuplicateRoot { id: CrdtId::new(0, 9) });
    }

    #[test]
    fn none_root_is_rejected() {
        let bytes = file(&[enc(Block::Root(CrdtId::NONE))]);
        assert_eq!(structural(&bytes), StructuralError::InvalidRoot);
    }

// # ✅ 4. Parents and ids

    #[test]
    fn forward_reference_is_rejected() {
        let s = CrdtId::new(1, 9);
        let bytes = file(&[root(), stroke(s, LAYER), group(LAYER, CrdtId::ROOT)]);
        assert_eq!(
            structural(&bytes),
            StructuralError::UnknownParent { kind: "stroke", id: s, parent: LAYER }
        );
    }

    #[test]
    fn group_with_unknown_parent_is_rejected() {
        let g = CrdtId::new(1, 50);
        let bytes = file(&[root(), group(g, CrdtId::new(8, 8))]);
        assert_eq!(
            structural(&bytes),
            StructuralError::UnknownParent { kind: "group", id: g, parent: CrdtId::new(8, 8) }
        );
    }

    #[test]
    fn stroke_under_root_is_rejected() {
        let s = CrdtId::new(1, 9);
        let bytes = file(&[root(), stroke(s, CrdtId::ROOT)]);
        assert_eq!(structural(&bytes), StructuralError::LeafUnderRoot { kind: "stroke", id: s });
    }

    #[test]
    fn duplicate_stroke_id_is_rejected() {
        let s = CrdtId::new(1, 9);
        let bytes = file(&[root(), group(LAYER, CrdtId::ROOT), stroke(s, LAYER), stroke(s, LAYER)]);
        assert_eq!(structural(&bytes), StructuralError::DuplicateId { id: s });
    }

    #[test]
    fn stroke_reusing_a_group_id_is_rejected() {
        let bytes = file(&[root(), group(LAYER, CrdtId::ROOT), stroke(LAYER, LAYER)]);
        assert_eq!(structural(&bytes), StructuralError::DuplicateId { id: LAYER });
    }

    #[test]
    fn reserved_ids_cannot_name_nodes() {
        let bytes = file(&[root(), group(CrdtId::NONE, CrdtId::ROOT)]);
        assert_eq!(structural(&bytes), StructuralError::ReservedId { id: CrdtId::NONE });

        let bytes = file(&[root(), group(LAYER, CrdtId::ROOT), stroke(CrdtId::NONE, LAYER)]);
        assert_eq!(structural(&bytes), StructuralError::ReservedId { id: CrdtId::NONE });

        // the default root id under a document with a different root
        let other_root = CrdtId::new(2, 5);
        let bytes = file(&[enc(Block::Root(other_root)), group(CrdtId::ROOT, other_root)]);
        assert_eq!(structural(&bytes), StructuralError::ReservedId { id: CrdtId::ROOT });
    }

    #[test]
    fn stroke_reusing_the_root_id_is_a_duplicate() {
        let bytes = file(&[root(), group(LAYER, CrdtId::ROOT), stroke(CrdtId::ROOT, LAYER)]);
        assert_eq!(structural(&bytes), StructuralError::DuplicateId { id: CrdtId::ROOT });
    }

    #[test]
    fn stroke_without_points_is_a_codec_error() {
        let mut empty = stroke_block(CrdtId::new(1, 9), LAYER, 0.0);
        empty.points.clear();
        let bytes = file(&[root(), group(LAYER, CrdtId::ROOT), enc(Block::Stroke(empty))]);
        match read(&bytes) {
            Err(SceneError::Codec(CodecError::InvalidValue { field, .. })) => assert_eq!(field, "point count"),
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

// # ✅ 5. Truncated files

    #[test]
    fn truncated_stroke_reports_offset() {
        let mut bytes = file(&[root(), group(LAYER, CrdtId::ROOT), stroke(CrdtId::new(1, 9), LAYER)]);
        let stroke_at = bytes.len() - stroke(CrdtId::new(1, 9), LAYER).len();
        bytes.pop();

        match read(&bytes) {
            Err(SceneError::Codec(e @ CodecError::LengthOverrun { .. })) => {
                assert_eq!(e.offset(), Some(stroke_at));
            }
            other => panic!("expected length overrun, got {other:?}"),
        }
    }

    #[test]
    fn every_truncation_is_an_error() {
        let bytes = file(&[root(), group(LAYER, CrdtId::ROOT), stroke(CrdtId::new(1, 9), LAYER)]);
        let root_end = 43 + root().len();
        for cut in 0..bytes.len() {
            let result = read(&bytes[..cut]);
            // a cut exactly on a block boundary after the root is a valid shorter file
            let boundary = cut == root_end || cut == root_end + group(LAYER, CrdtId::ROOT).len();
            assert_eq!(result.is_ok(), boundary, "cut at {cut}");
        }
    }

    #[test]
    fn damaged_header_is_a_codec_error() {
        let mut bytes = file(&[root()]);
        bytes[0] = b'X';
        assert!(matches!(read(&bytes), Err(SceneError::Codec(CodecError::Header(_)))));
    }
}
