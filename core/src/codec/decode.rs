use std::collections::BTreeMap;

use bytes::Bytes;
use tracing::{trace, warn};
use uuid::Uuid;

use crate::codec::cursor::Cursor;
use crate::codec::types::{CodecError, FrameLen};
use crate::codec::varint::read_varint;
use crate::constants::POINT_RECORD_LEN;
use crate::ids::LwwValue;
use crate::linearize::{Block, BlockKind, OpaqueBlock};
use crate::scene::{Group, Highlight, PageInfo, Point, PointRecord, Rect, Stroke, Tool};

/// Decode one block from the start of `buf`.
///
/// # Returns
/// - `Ok((block, consumed))`: `consumed` covers tag, length and payload.
/// - `Err(CodecError)` for a truncated frame or a malformed payload.
///
/// # Notes
/// - Unknown tags are not errors: the payload is skipped by its length and
///   handed back as `Block::Opaque`.
pub fn decode_block(buf: &[u8]) -> Result<(Block, usize), CodecError> {
    decode_block_at(buf, 0)
}

/// Like `decode_block`, with `base` as the absolute offset of `buf[0]`.
pub fn decode_block_at(buf: &[u8], base: usize) -> Result<(Block, usize), CodecError> {
    decode_frame_at(buf, base).map(|(block, frame)| (block, frame.total()))
}

/// Like `decode_block_at`, reporting header and payload sizes separately.
pub fn decode_frame_at(buf: &[u8], base: usize) -> Result<(Block, FrameLen), CodecError> {
    let Some(&tag) = buf.first() else {
        return Err(CodecError::Truncated { what: "block tag", offset: base, need: 1, have: 0 });
    };

    let (declared, n) = read_varint(&buf[1..], base + 1).map_err(|e| match e {
        CodecError::Truncated { offset, need, have, .. } => {
            CodecError::Truncated { what: "block length", offset, need, have }
        }
        other => other,
    })?;

    let head = 1 + n;
    let available = buf.len() - head;
    if declared > available as u64 {
        return Err(CodecError::LengthOverrun { tag, offset: base, declared, available });
    }
    let len = declared as usize;
    let payload = &buf[head..head + len];

    let block = decode_payload(tag, payload, base + head)?;
    trace!(offset = base, tag, len, kind = block.name(), "decoded block");
    Ok((block, FrameLen { header: head, payload: len }))
}

/// Iterator over the blocks of a stream body (no header).
///
/// Yields `(offset, block)`; stops after the first error.
pub struct BlockReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
    failed: bool,
}

impl<'a> BlockReader<'a> {
    /// `base` is the absolute offset of `buf[0]` (header length when the
    /// header has already been stripped).
    pub fn new(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base, failed: false }
    }

    /// Bytes consumed so far, relative to `buf`.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for BlockReader<'a> {
    type Item = Result<(usize, Block), CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        let offset = self.base + self.pos;
        match decode_block_at(&self.buf[self.pos..], offset) {
            Ok((block, n)) => {
                self.pos += n;
                Some(Ok((offset, block)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode a payload for `tag`. `offset` is the absolute payload start.
pub fn decode_payload(tag: u8, payload: &[u8], offset: usize) -> Result<Block, CodecError> {
    let Ok(kind) = BlockKind::try_from(tag) else {
        warn!(tag, offset, len = payload.len(), "unknown block tag, keeping payload as opaque");
        return Ok(Block::Opaque(OpaqueBlock { tag, payload: Bytes::copy_from_slice(payload) }));
    };

    let mut c = Cursor::new(payload, offset);
    let block = match kind {
        BlockKind::Root => Block::Root(c.id()?),
        BlockKind::AuthorIds => read_author_ids(&mut c)?,
        BlockKind::PageInfo => Block::PageInfo {
            root: c.id()?,
            info: PageInfo {
                loads_count: c.varint()?,
                merges_count: c.varint()?,
                text_chars_count: c.varint()?,
                text_lines_count: c.varint()?,
            },
        },
        BlockKind::Group => Block::Group(read_group(&mut c)?),
        BlockKind::GroupMembership => {
            let group = c.id()?;
            let count = c.count("child count", 2)?;
            let children = (0..count).map(|_| c.id()).collect::<Result<Vec<_>, _>>()?;
            Block::GroupMembership { group, children }
        }
        BlockKind::Stroke => Block::Stroke(read_stroke(&mut c)?),
        BlockKind::Highlight => Block::Highlight(read_highlight(&mut c)?),
    };

    if c.remaining() != 0 {
        return Err(CodecError::TrailingPayload { kind, offset: c.offset(), unread: c.remaining() });
    }
    Ok(block)
}

fn read_author_ids(c: &mut Cursor<'_>) -> Result<Block, CodecError> {
    let root = c.id()?;
    let count = c.count("author count", 1 + 16)?;
    let mut authors = BTreeMap::new();
    for _ in 0..count {
        let author = c.u32_varint("author")?;
        let mut raw = [0u8; 16];
        raw.copy_from_slice(c.bytes(16, "author uuid")?);
        authors.insert(author, Uuid::from_bytes(raw));
    }
    Ok(Block::AuthorIds { root, authors })
}

fn read_group(c: &mut Cursor<'_>) -> Result<Group, CodecError> {
    let id = c.id()?;
    let parent_id = c.id()?;
    let label_ts = c.id()?;
    let label = c.string("group label")?;
    let visible_ts = c.id()?;
    let visible = c.bool("group visibility")?;
    Ok(Group {
        id,
        parent_id,
        label: LwwValue::new(label_ts, label),
        visible: LwwValue::new(visible_ts, visible),
    })
}

fn read_stroke(c: &mut Cursor<'_>) -> Result<Stroke, CodecError> {
    let id = c.id()?;
    let parent_id = c.id()?;

    let tool_offset = c.offset();
    let raw = c.u32_varint("tool")?;
    let tool = Tool::try_from(raw).map_err(|_| CodecError::UnknownTool { raw, offset: tool_offset })?;

    let color = c.u32_varint("color")?;

    let width_offset = c.offset();
    let width = c.f64("stroke width")?;
    if !width.is_finite() || width <= 0.0 {
        return Err(CodecError::InvalidValue {
            field: "stroke width",
            offset: width_offset,
            reason: format!("{width} must be finite and > 0"),
        });
    }

    let count_offset = c.offset();
    let count = c.count("point count", POINT_RECORD_LEN)?;
    if count == 0 {
        return Err(CodecError::InvalidValue {
            field: "point count",
            offset: count_offset,
            reason: "a stroke needs at least one point".into(),
        });
    }

    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        points.push(Point::from_record(&read_point(c)?));
    }

    Ok(Stroke { id, parent_id, tool, color, width, points })
}

/// One 14-byte point record. Every record accepted here converts to a
/// `Point` that quantizes back to the same record.
fn read_point(c: &mut Cursor<'_>) -> Result<PointRecord, CodecError> {
    let x = finite_f32(c, "point x")?;
    let y = finite_f32(c, "point y")?;
    let pressure = c.u8("point pressure")?;
    let speed = c.u16("point speed")?;
    let direction = c.u8("point direction")?;

    let width_offset = c.offset();
    let width = c.u16("point width")?;
    if width == 0 {
        return Err(CodecError::InvalidValue {
            field: "point width",
            offset: width_offset,
            reason: "must be at least 1".into(),
        });
    }

    Ok(PointRecord { x, y, pressure, speed, direction, width })
}

fn finite_f32(c: &mut Cursor<'_>, field: &'static str) -> Result<f32, CodecError> {
    let offset = c.offset();
    let v = c.f32(field)?;
    if !v.is_finite() {
        return Err(CodecError::InvalidValue { field, offset, reason: format!("{v} is not finite") });
    }
    Ok(v)
}

/// Finite `f64`, and `>= 0` for sizes.
fn rect_f64(c: &mut Cursor<'_>, field: &'static str, size: bool) -> Result<f64, CodecError> {
    let offset = c.offset();
    let v = c.f64(field)?;
    if !v.is_finite() || (size && v < 0.0) {
        let reason = if size { format!("{v} must be finite and >= 0") } else { format!("{v} is not finite") };
        return Err(CodecError::InvalidValue { field, offset, reason });
    }
    Ok(v)
}

fn read_highlight(c: &mut Cursor<'_>) -> Result<Highlight, CodecError> {
    let id = c.id()?;
    let parent_id = c.id()?;
    let color = c.u32_varint("color")?;
    let start = if c.bool("highlight start flag")? { Some(c.varint()?) } else { None };
    let length = c.varint()?;
    let text = c.string("highlight text")?;
    let count = c.count("rectangle count", 32)?;
    let mut rectangles = Vec::with_capacity(count);
    for _ in 0..count {
        rectangles.push(Rect {
            x: rect_f64(c, "rect x", false)?,
            y: rect_f64(c, "rect y", false)?,
            w: rect_f64(c, "rect w", true)?,
            h: rect_f64(c, "rect h", true)?,
        });
    }
    Ok(Highlight { id, parent_id, color, text, start, length, rectangles })
}
