//! io/writer.rs
//! Document → bytes.
//!
//! ```text
//! [ header (43) ][ block ][ block ] ... end of file
//! ```

use std::io::Write;
use std::time::Instant;

use tracing::debug;

use crate::codec::encode_block_into;
use crate::headers::{encode_header, FileHeader};
use crate::linearize::linearize;
use crate::scene::Document;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::SceneError;

/// Serialize `doc` into a complete version 6 file.
pub fn write(doc: &Document) -> Result<Vec<u8>, SceneError> {
    write_with_telemetry(doc).map(|(bytes, _)| bytes)
}

/// Serialize `doc` onto `w`. Returns the number of bytes written.
///
/// The file is fully built in memory first, so a failing document writes
/// nothing.
pub fn write_to<W: Write>(doc: &Document, w: &mut W) -> Result<usize, SceneError> {
    let bytes = write(doc)?;
    w.write_all(&bytes)?;
    w.flush()?;
    Ok(bytes.len())
}

/// Like `write`, also returning counters and stage timings.
pub fn write_with_telemetry(doc: &Document) -> Result<(Vec<u8>, TelemetrySnapshot), SceneError> {
    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();

    let header = FileHeader::default();
    let head = timer.time(Stage::Validate, || encode_header(&header))?;

    let blocks = timer.time(Stage::Linearize, || linearize(doc))?;

    let start = Instant::now();
    let mut out = Vec::with_capacity(head.len() + 32 * blocks.len());
    out.extend_from_slice(&head);
    counters.add_header(head.len());

    for block in &blocks {
        let frame = encode_block_into(block, &mut out)?;
        counters.add_block(block, frame);
    }
    timer.add_stage_time(Stage::Encode, start.elapsed());
    timer.finish();

    debug!(
        bytes = out.len(),
        blocks = blocks.len(),
        points = counters.points,
        "wrote scene"
    );
    Ok((out, TelemetrySnapshot::from(&counters, &timer)))
}
