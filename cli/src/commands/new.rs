//! `rmscene new`: one layer, one shape stroke.

use std::io::Write;

use anyhow::Context;
use rmscene_core::constants::DEFAULT_AUTHOR;
use rmscene_core::ids::IdAllocator;
use rmscene_core::io::{open_output, write_with_telemetry, OutputSink};
use rmscene_core::scene::Document;
use tracing::info;
use uuid::Uuid;

use crate::cli::NewArgs;

pub fn run(args: &NewArgs) -> anyhow::Result<()> {
    let mut doc = Document::new();
    let mut alloc = IdAllocator::new(args.author);
    if args.author != DEFAULT_AUTHOR {
        doc.set_author(args.author, Uuid::new_v4());
    }

    let layer = doc
        .create_layer(&mut alloc, args.label.as_str(), !args.hidden)
        .context("creating layer")?;
    let points = args.shape.points(args.x, args.y, args.size);
    let stroke = doc
        .create_stroke(&mut alloc, layer, args.tool.into(), args.color, args.width, points)
        .with_context(|| format!("creating {:?} stroke", args.shape))?;

    let (bytes, snapshot) = write_with_telemetry(&doc).context("encoding page")?;

    let mut out = open_output(OutputSink::File(args.out.clone()))
        .with_context(|| format!("creating {}", args.out.display()))?;
    out.write_all(&bytes)
        .and_then(|_| out.flush())
        .with_context(|| format!("writing {}", args.out.display()))?;

    info!(
        path = %args.out.display(),
        layer = %layer,
        stroke = %stroke,
        bytes = bytes.len(),
        blocks = snapshot.blocks_total,
        "wrote page"
    );
    Ok(())
}
