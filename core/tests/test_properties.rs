// Property suite: any document the builder accepts writes, reads back
// equal, and linearizes without forward references.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use rmscene_core::ids::{CrdtId, IdAllocator};
    use rmscene_core::io::{read, write};
    use rmscene_core::linearize::{first_forward_reference, linearize};
    use rmscene_core::scene::{Document, Point, Tool};

    #[derive(Debug, Clone)]
    struct StrokePlan {
        group: usize,
        tool: Tool,
        color: u32,
        width: f64,
        points: Vec<Point>,
    }

    fn point() -> impl Strategy<Value = Point> {
        (
            -2000.0f32..2000.0,
            -2000.0f32..2000.0,
            0.0f32..=1.0,
            0.0f32..1000.0,
            -10.0f32..10.0,
            0.25f32..100.0,
        )
            .prop_map(|(x, y, p, s, d, w)| Point::new(x, y, w).with_pressure(p).with_motion(s, d))
    }

    fn tool() -> impl Strategy<Value = Tool> {
        prop::sample::select(vec![
            Tool::Ballpoint1,
            Tool::Fineliner2,
            Tool::Pencil2,
            Tool::Highlighter1,
            Tool::Calligraphy,
            Tool::Shader,
        ])
    }

    fn stroke_plan() -> impl Strategy<Value = StrokePlan> {
        (any::<usize>(), tool(), 0u32..14, 0.1f64..20.0, prop::collection::vec(point(), 1..40))
            .prop_map(|(group, tool, color, width, points)| StrokePlan { group, tool, color, width, points })
    }

    /// Group parents are indexes into the groups created before them
    /// (`None` for a layer).
    fn group_plan() -> impl Strategy<Value = Vec<(Option<usize>, String, bool)>> {
        prop::collection::vec((any::<Option<usize>>(), "[a-zA-Z0-9 ]{0,12}", any::<bool>()), 1..6)
    }

    fn build(groups: &[(Option<usize>, String, bool)], strokes: &[StrokePlan]) -> Document {
        let mut doc = Document::new();
        let mut alloc = IdAllocator::new(1);
        let mut ids: Vec<CrdtId> = Vec::new();

        for (parent, label, visible) in groups {
            let parent = match parent {
                Some(i) if !ids.is_empty() => ids[i % ids.len()],
                _ => doc.root(),
            };
            ids.push(doc.create_group(&mut alloc, parent, label.clone(), *visible).unwrap());
        }
        for s in strokes {
            let parent = ids[s.group % ids.len()];
            doc.create_stroke(&mut alloc, parent, s.tool, s.color, s.width, s.points.clone()).unwrap();
        }
        doc
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn built_documents_round_trip(
            groups in group_plan(),
            strokes in prop::collection::vec(stroke_plan(), 0..12),
        ) {
            let doc = build(&groups, &strokes);

            let bytes = write(&doc).unwrap();
            let back = read(&bytes).unwrap();
            prop_assert_eq!(&back, &doc);
            prop_assert_eq!(write(&back).unwrap(), bytes);
        }

        #[test]
        fn linearized_blocks_never_reference_forward(
            groups in group_plan(),
            strokes in prop::collection::vec(stroke_plan(), 0..12),
        ) {
            let doc = build(&groups, &strokes);
            let blocks = linearize(&doc).unwrap();
            prop_assert_eq!(first_forward_reference(&blocks), None);
        }

        #[test]
        fn allocated_ids_are_unique(
            groups in group_plan(),
            strokes in prop::collection::vec(stroke_plan(), 0..12),
        ) {
            let doc = build(&groups, &strokes);
            let mut seen = HashSet::new();
            for g in doc.groups() {
                prop_assert!(seen.insert(g.id));
                prop_assert!(seen.insert(g.label.timestamp));
                prop_assert!(seen.insert(g.visible.timestamp));
            }
            for item in doc.items() {
                prop_assert!(seen.insert(item.id()));
            }
            prop_assert!(!seen.contains(&CrdtId::ROOT));
        }

        #[test]
        fn decoding_random_bodies_never_panics(body in prop::collection::vec(any::<u8>(), 0..256)) {
            let mut bytes = write(&Document::new()).unwrap();
            bytes.truncate(43);
            bytes.extend_from_slice(&body);
            let _ = read(&bytes);
        }
    }
}
