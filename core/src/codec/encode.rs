use byteorder::{ByteOrder, LittleEndian};

use crate::codec::types::{CodecError, FrameLen};
use crate::codec::varint::{varint_len, write_varint};
use crate::constants::POINT_RECORD_LEN;
use crate::ids::CrdtId;
use crate::linearize::{Block, BlockKind};
use crate::scene::{Group, Highlight, PointRecord, Stroke};

/// Encode one block into its wire frame.
///
/// Layout:
///
/// ```text
/// [ tag (1) ]
/// [ length (LEB128, 1..=10) ]
/// [ payload (length) ]
/// ```
pub fn encode_block(block: &Block) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode_block_into(block, &mut out)?;
    Ok(out)
}

/// Append one framed block to `out` and report its sizes.
///
/// On error `out` is left as it was.
pub fn encode_block_into(block: &Block, out: &mut Vec<u8>) -> Result<FrameLen, CodecError> {
    let payload = encode_payload(block)?;
    let len = payload.len() as u64;
    let frame = FrameLen { header: 1 + varint_len(len), payload: payload.len() };

    out.reserve(frame.total());
    out.push(block.tag());
    write_varint(out, len);
    out.extend_from_slice(&payload);
    Ok(frame)
}

/// Encode a sequence of blocks back to back onto `out`.
pub fn encode_blocks(blocks: &[Block], out: &mut Vec<u8>) -> Result<(), CodecError> {
    for block in blocks {
        encode_block_into(block, out)?;
    }
    Ok(())
}

/// Payload bytes of a block, without tag and length.
///
/// The block's primary identifier always comes first.
pub fn encode_payload(block: &Block) -> Result<Vec<u8>, CodecError> {
    let mut w = PayloadWriter::default();
    match block {
        Block::Root(id) => w.id(*id),

        Block::AuthorIds { root, authors } => {
            w.id(*root);
            w.varint(authors.len() as u64);
            for (author, uuid) in authors {
                w.varint(*author as u64);
                w.raw(uuid.as_bytes());
            }
        }

        Block::PageInfo { root, info } => {
            w.id(*root);
            w.varint(info.loads_count);
            w.varint(info.merges_count);
            w.varint(info.text_chars_count);
            w.varint(info.text_lines_count);
        }

        Block::Group(group) => w.group(group),

        Block::GroupMembership { group, children } => {
            w.id(*group);
            w.varint(children.len() as u64);
            for child in children {
                w.id(*child);
            }
        }

        Block::Stroke(stroke) => w.stroke(stroke)?,

        Block::Highlight(highlight) => w.highlight(highlight),

        Block::Opaque(opaque) => {
            if BlockKind::try_from(opaque.tag).is_ok() {
                return Err(CodecError::Unencodable {
                    what: "opaque block",
                    reason: format!("tag 0x{:02x} belongs to a known block kind", opaque.tag),
                });
            }
            w.raw(&opaque.payload);
        }
    }
    Ok(w.finish())
}

/// Little-endian payload builder.
#[derive(Default)]
struct PayloadWriter {
    out: Vec<u8>,
}

impl PayloadWriter {
    fn finish(self) -> Vec<u8> {
        self.out
    }

    fn raw(&mut self, b: &[u8]) {
        self.out.extend_from_slice(b);
    }

    fn varint(&mut self, v: u64) {
        write_varint(&mut self.out, v);
    }

    fn id(&mut self, id: CrdtId) {
        self.varint(id.author as u64);
        self.varint(id.counter);
    }

    fn bool(&mut self, v: bool) {
        self.out.push(v as u8);
    }

    fn string(&mut self, s: &str) {
        self.varint(s.len() as u64);
        self.raw(s.as_bytes());
    }

    fn f64(&mut self, v: f64) {
        let mut b = [0u8; 8];
        LittleEndian::write_f64(&mut b, v);
        self.raw(&b);
    }

    fn point(&mut self, p: &PointRecord) {
        let mut b = [0u8; POINT_RECORD_LEN];
        LittleEndian::write_f32(&mut b[0..4], p.x);
        LittleEndian::write_f32(&mut b[4..8], p.y);
        b[8] = p.pressure;
        LittleEndian::write_u16(&mut b[9..11], p.speed);
        b[11] = p.direction;
        LittleEndian::write_u16(&mut b[12..14], p.width);
        self.raw(&b);
    }

    fn group(&mut self, g: &Group) {
        self.id(g.id);
        self.id(g.parent_id);
        self.id(g.label.timestamp);
        self.string(&g.label.value);
        self.id(g.visible.timestamp);
        self.bool(g.visible.value);
    }

    fn stroke(&mut self, s: &Stroke) -> Result<(), CodecError> {
        if !s.width.is_finite() || s.width <= 0.0 {
            return Err(CodecError::Unencodable {
                what: "stroke",
                reason: format!("{}: width {} must be finite and > 0", s.id, s.width),
            });
        }
        self.id(s.id);
        self.id(s.parent_id);
        self.varint(u32::from(s.tool) as u64);
        self.varint(s.color as u64);
        self.f64(s.width);
        self.varint(s.points.len() as u64);
        for (i, p) in s.points.iter().enumerate() {
            let record = p.to_record(i).map_err(|e| CodecError::Unencodable {
                what: "stroke",
                reason: format!("{}: {e}", s.id),
            })?;
            self.point(&record);
        }
        Ok(())
    }

    fn highlight(&mut self, h: &Highlight) {
        self.id(h.id);
        self.id(h.parent_id);
        self.varint(h.color as u64);
        match h.start {
            Some(start) => {
                self.bool(true);
                self.varint(start);
            }
            None => self.bool(false),
        }
        self.varint(h.length);
        self.string(&h.text);
        self.varint(h.rectangles.len() as u64);
        for r in &h.rectangles {
            self.f64(r.x);
            self.f64(r.y);
            self.f64(r.w);
            self.f64(r.h);
        }
    }
}
