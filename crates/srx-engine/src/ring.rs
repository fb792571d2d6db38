//! Index-based circular byte buffer.
//!
//! The ring is an owned byte array plus a `[start, end)` region inside it.
//! Cursors are plain indices; a cursor that reaches `end` is reset to
//! `start`, never left past it.

use alloc::boxed::Box;
use alloc::vec;

use crate::error::ConvertError;

/// The `[start, end)` region of a ring, fixed for a stream's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingBounds {
    start: usize,
    end: usize,
}

impl RingBounds {
    /// Bounds for `[start, end)`. An empty or inverted region is rejected.
    pub fn new(start: usize, end: usize) -> Result<Self, ConvertError> {
        if start >= end {
            return Err(ConvertError::InvalidRing { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    pub const fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Reject bounds that overrun `ring_len` bytes or a cursor outside them.
    pub(crate) fn check(&self, ring_len: usize, cursor: usize) -> Result<(), ConvertError> {
        if self.end > ring_len {
            return Err(ConvertError::RingTooSmall { end: self.end, len: ring_len });
        }
        if !self.contains(cursor) {
            return Err(ConvertError::CursorOutOfRange {
                cursor,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Owned ring storage. Allocated once, never resized.
#[derive(Clone, Debug)]
pub struct RingBuffer {
    data: Box<[u8]>,
}

impl RingBuffer {
    /// A zeroed ring of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self { data: vec![0u8; capacity].into_boxed_slice() }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bounds spanning the whole buffer.
    pub fn bounds(&self) -> Result<RingBounds, ConvertError> {
        RingBounds::new(0, self.data.len())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copy `data` in at `*cursor`, wrapping within `bounds`, and advance the
    /// cursor past it.
    pub fn write_wrapping(
        &mut self,
        bounds: RingBounds,
        cursor: &mut usize,
        data: &[u8],
    ) -> Result<(), ConvertError> {
        bounds.check(self.data.len(), *cursor)?;
        let mut writer = RingWriter::new(&mut self.data, bounds, *cursor);
        writer.write(data);
        *cursor = writer.position();
        Ok(())
    }

    /// Fill `out` from `*cursor`, wrapping within `bounds`, and advance the
    /// cursor past what was read.
    pub fn read_wrapping(
        &self,
        bounds: RingBounds,
        cursor: &mut usize,
        out: &mut [u8],
    ) -> Result<(), ConvertError> {
        bounds.check(self.data.len(), *cursor)?;
        let mut reader = RingReader::new(&self.data, bounds, *cursor);
        reader.read(out);
        *cursor = reader.position();
        Ok(())
    }
}

/// Wrapping byte writer over a ring region.
pub(crate) struct RingWriter<'a> {
    buf: &'a mut [u8],
    bounds: RingBounds,
    pos: usize,
}

impl<'a> RingWriter<'a> {
    /// Caller has already run `RingBounds::check` for `pos`.
    pub(crate) fn new(buf: &'a mut [u8], bounds: RingBounds, pos: usize) -> Self {
        Self { buf, bounds, pos }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn write(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            let n = bytes.len().min(self.bounds.end - self.pos);
            self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
            bytes = &bytes[n..];
            self.pos += n;
            if self.pos >= self.bounds.end {
                self.pos = self.bounds.start;
            }
        }
    }
}

/// Wrapping byte reader over a ring region.
pub(crate) struct RingReader<'a> {
    buf: &'a [u8],
    bounds: RingBounds,
    pos: usize,
}

impl<'a> RingReader<'a> {
    /// Caller has already run `RingBounds::check` for `pos`.
    pub(crate) fn new(buf: &'a [u8], bounds: RingBounds, pos: usize) -> Self {
        Self { buf, bounds, pos }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn read(&mut self, mut out: &mut [u8]) {
        while !out.is_empty() {
            let n = out.len().min(self.bounds.end - self.pos);
            out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
            out = &mut out[n..];
            self.pos += n;
            if self.pos >= self.bounds.end {
                self.pos = self.bounds.start;
            }
        }
    }
}
