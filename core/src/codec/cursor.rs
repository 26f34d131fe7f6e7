use byteorder::{ByteOrder, LittleEndian};

use crate::codec::types::CodecError;
use crate::codec::varint::read_varint;
use crate::ids::CrdtId;

/// Bounds-checked reader over one block payload.
///
/// Every read reports the absolute stream offset on failure.
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base }
    }

    pub(crate) fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn bytes(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::Truncated {
                what,
                offset: self.offset(),
                need: n,
                have: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn u8(&mut self, what: &'static str) -> Result<u8, CodecError> {
        Ok(self.bytes(1, what)?[0])
    }

    pub(crate) fn u16(&mut self, what: &'static str) -> Result<u16, CodecError> {
        Ok(LittleEndian::read_u16(self.bytes(2, what)?))
    }

    pub(crate) fn f32(&mut self, what: &'static str) -> Result<f32, CodecError> {
        Ok(LittleEndian::read_f32(self.bytes(4, what)?))
    }

    pub(crate) fn f64(&mut self, what: &'static str) -> Result<f64, CodecError> {
        Ok(LittleEndian::read_f64(self.bytes(8, what)?))
    }

    pub(crate) fn varint(&mut self) -> Result<u64, CodecError> {
        let (v, n) = read_varint(&self.buf[self.pos..], self.offset())?;
        self.pos += n;
        Ok(v)
    }

    /// Varint that must fit `max`.
    pub(crate) fn varint_max(&mut self, field: &'static str, max: u64) -> Result<u64, CodecError> {
        let offset = self.offset();
        let value = self.varint()?;
        if value > max {
            return Err(CodecError::ValueTooLarge { field, offset, value, max });
        }
        Ok(value)
    }

    pub(crate) fn u32_varint(&mut self, field: &'static str) -> Result<u32, CodecError> {
        Ok(self.varint_max(field, u32::MAX as u64)? as u32)
    }

    /// Element count that cannot exceed what is left, given a minimum
    /// element size. Guards allocations against hostile counts.
    pub(crate) fn count(&mut self, field: &'static str, min_elem: usize) -> Result<usize, CodecError> {
        let max = (self.remaining() / min_elem.max(1)) as u64;
        let offset = self.offset();
        let value = self.varint()?;
        if value > max {
            return Err(CodecError::ValueTooLarge { field, offset, value, max });
        }
        Ok(value as usize)
    }

    pub(crate) fn id(&mut self) -> Result<CrdtId, CodecError> {
        let author = self.u32_varint("author")?;
        let counter = self.varint()?;
        Ok(CrdtId::new(author, counter))
    }

    pub(crate) fn bool(&mut self, field: &'static str) -> Result<bool, CodecError> {
        let offset = self.offset();
        match self.u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(CodecError::InvalidBool { field, offset, value }),
        }
    }

    pub(crate) fn string(&mut self, field: &'static str) -> Result<String, CodecError> {
        let len = self.count(field, 1)?;
        let offset = self.offset();
        let raw = self.bytes(len, field)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8 { field, offset })
    }
}
