//! Recording: hardware ring into a flat application buffer.

use core::marker::PhantomData;

use srx_format::{AudioFormat, CodecKind, SampleCodec, SampleFrame, S16Be, S16Le, S24Be, S24Le};

use crate::context::ConversionContext;
use crate::error::ConvertError;
use crate::resample::{self, FrameSink, FrameSource, Transfer};
use crate::ring::{RingBounds, RingReader};
use crate::validate::check_call;

/// Convert up to `len` ring bytes at `*cursor` (hardware format `to`) into
/// `dest` (application format `from`), advancing the cursor past what was
/// read.
///
/// `Transfer::produced` is the number of bytes written to `dest`. The call
/// stops early, at a frame boundary that keeps the context continuous, once
/// `dest` cannot hold the output of another source frame.
pub fn record(
    ctx: &mut ConversionContext,
    from: &AudioFormat,
    to: &AudioFormat,
    ring: &[u8],
    cursor: &mut usize,
    len: usize,
    dest: &mut [u8],
) -> Result<Transfer, ConvertError> {
    let bounds = ctx.ring;
    bounds.check(ring.len(), *cursor)?;

    if from.same_shape(to) {
        let n = len.min(dest.len());
        let mut reader = RingReader::new(ring, bounds, *cursor);
        reader.read(&mut dest[..n]);
        *cursor = reader.position();
        return Ok(Transfer { consumed: n, produced: n });
    }

    check_call(from, to)?;
    let Some(codec) = CodecKind::for_format(to) else {
        tracing::warn!(
            encoding = %to.encoding,
            precision = to.precision,
            "record: unimplemented conversion"
        );
        return Err(ConvertError::UnimplementedConversion {
            encoding: to.encoding,
            precision: to.precision,
        });
    };

    Ok(resample::realtime(|| match codec {
        CodecKind::S16Le => record_with::<S16Le>(ctx, from, to, ring, bounds, cursor, len, dest),
        CodecKind::S16Be => record_with::<S16Be>(ctx, from, to, ring, bounds, cursor, len, dest),
        CodecKind::S24Le => record_with::<S24Le>(ctx, from, to, ring, bounds, cursor, len, dest),
        CodecKind::S24Be => record_with::<S24Be>(ctx, from, to, ring, bounds, cursor, len, dest),
    }))
}

#[allow(clippy::too_many_arguments)]
fn record_with<C: SampleCodec>(
    ctx: &mut ConversionContext,
    from: &AudioFormat,
    to: &AudioFormat,
    ring: &[u8],
    bounds: RingBounds,
    cursor: &mut usize,
    len: usize,
    dest: &mut [u8],
) -> Transfer {
    let mut source = RingSource::<C>::new(
        RingReader::new(ring, bounds, *cursor),
        len,
        to.channels as usize,
    );
    let mut sink = LinearSink::<C>::new(dest, from.channels as usize, to.channels as usize);
    resample::run(ctx, to.sample_rate, from.sample_rate, &mut source, &mut sink);
    *cursor = source.reader.position();
    Transfer { consumed: source.consumed, produced: sink.pos }
}

/// Decodes frames from the ring, wrapping at its end.
struct RingSource<'a, C> {
    reader: RingReader<'a>,
    available: usize,
    consumed: usize,
    channels: usize,
    _codec: PhantomData<C>,
}

impl<'a, C: SampleCodec> RingSource<'a, C> {
    fn new(reader: RingReader<'a>, available: usize, channels: usize) -> Self {
        Self { reader, available, consumed: 0, channels, _codec: PhantomData }
    }
}

impl<C: SampleCodec> FrameSource for RingSource<'_, C> {
    fn channels(&self) -> usize {
        self.channels
    }

    fn has_frame(&self) -> bool {
        self.available - self.consumed >= self.channels * C::WIDTH
    }

    fn read_frame(&mut self, frame: &mut SampleFrame) {
        let mut bytes = [0u8; 4];
        frame.clear();
        for _ in 0..self.channels {
            self.reader.read(&mut bytes[..C::WIDTH]);
            frame.push(C::read(&bytes));
            self.consumed += C::WIDTH;
        }
    }
}

/// Adapts channel layout and encodes frames into a flat buffer.
struct LinearSink<'a, C> {
    dest: &'a mut [u8],
    pos: usize,
    /// Application channels (output).
    from: usize,
    /// Hardware channels (input).
    to: usize,
    _codec: PhantomData<C>,
}

impl<'a, C: SampleCodec> LinearSink<'a, C> {
    fn new(dest: &'a mut [u8], from: usize, to: usize) -> Self {
        Self { dest, pos: 0, from, to, _codec: PhantomData }
    }

    fn put(&mut self, value: i32) {
        C::write(&mut self.dest[self.pos..], value);
        self.pos += C::WIDTH;
    }
}

impl<C: SampleCodec> FrameSink for LinearSink<'_, C> {
    fn has_room(&self, frames: usize) -> bool {
        self.dest.len() - self.pos >= frames * self.from * C::WIDTH
    }

    fn write_frame(&mut self, frame: &SampleFrame) {
        if self.to == 1 && self.from == 2 {
            self.put(frame[0]);
            self.put(frame[0]);
        } else if self.from == 1 && self.to >= 2 {
            self.put((frame[0] + frame[1]) / 2);
        } else {
            for ch in 0..self.from {
                self.put(frame.get(ch).copied().unwrap_or(0));
            }
        }
    }
}
