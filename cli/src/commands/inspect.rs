//! `rmscene inspect`: counts, layer tree, optional JSON summary.

use std::io::Read;

use anyhow::Context;
use rmscene_core::ids::CrdtId;
use rmscene_core::io::{open_input, read_with_telemetry, InputSource};
use rmscene_core::scene::{Document, SceneNode};

use crate::cli::InspectArgs;

pub fn run(args: &InspectArgs) -> anyhow::Result<()> {
    let mut input = open_input(InputSource::File(args.file.clone()))
        .with_context(|| format!("opening {}", args.file.display()))?;
    let mut buf = Vec::new();
    input
        .read_to_end(&mut buf)
        .with_context(|| format!("reading {}", args.file.display()))?;

    let (doc, snapshot) =
        read_with_telemetry(&buf).with_context(|| format!("decoding {}", args.file.display()))?;

    if args.json {
        let value = serde_json::json!({
            "file": args.file.display().to_string(),
            "root": doc.root().to_string(),
            "groups": doc.groups().len(),
            "strokes": doc.strokes().count(),
            "points": doc.point_count(),
            "highlights": doc.highlights().count(),
            "opaque_blocks": doc.opaque_blocks().len(),
            "authors": doc.authors(),
            "page_info": doc.page_info(),
            "telemetry": snapshot,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("File:        {}", args.file.display());
    println!("Bytes:       {}", buf.len());
    println!("Groups:      {}", doc.groups().len());
    println!("Strokes:     {}", doc.strokes().count());
    println!("Points:      {}", doc.point_count());
    println!("Highlights:  {}", doc.highlights().count());
    println!("Opaque:      {}", doc.opaque_blocks().len());
    println!();
    print_tree(&doc, doc.root(), 0);
    Ok(())
}

fn print_tree(doc: &Document, parent: CrdtId, depth: usize) {
    let indent = "  ".repeat(depth);
    if depth == 0 {
        println!("root {parent}");
    }
    for node in doc.children(parent) {
        match node {
            SceneNode::Group(g) => {
                let hidden = if g.is_visible() { "" } else { " (hidden)" };
                println!("{indent}  group {} {:?}{hidden}", g.id, g.label());
                print_tree(doc, g.id, depth + 1);
            }
            SceneNode::Stroke(s) => {
                println!(
                    "{indent}  stroke {} {} color={} width={} points={}",
                    s.id,
                    s.tool.name(),
                    s.color,
                    s.width,
                    s.points.len()
                );
            }
            SceneNode::Highlight(h) => {
                println!("{indent}  highlight {} {:?}", h.id, h.text);
            }
        }
    }
}
