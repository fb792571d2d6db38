//! Playback: flat application buffer into the hardware ring.

use core::marker::PhantomData;

use srx_format::{AudioFormat, CodecKind, SampleCodec, SampleFrame, S16Be, S16Le, S24Be, S24Le};

use crate::context::ConversionContext;
use crate::error::ConvertError;
use crate::resample::{self, FrameSink, FrameSource, Transfer};
use crate::ring::{RingBounds, RingWriter};
use crate::validate::check_call;

/// Convert `src` (application format `from`) into the ring at `*cursor`
/// (hardware format `to`), advancing the cursor past what was written.
///
/// `Transfer::consumed` is the number of source bytes used; the caller
/// advances its own read position by it. Only whole frames are consumed,
/// except on the pass-through path (same rate and channel count) which
/// copies every byte verbatim without re-encoding.
pub fn play(
    ctx: &mut ConversionContext,
    from: &AudioFormat,
    to: &AudioFormat,
    src: &[u8],
    ring: &mut [u8],
    cursor: &mut usize,
) -> Result<Transfer, ConvertError> {
    let bounds = ctx.ring;
    bounds.check(ring.len(), *cursor)?;

    if from.same_shape(to) {
        let mut writer = RingWriter::new(ring, bounds, *cursor);
        writer.write(src);
        *cursor = writer.position();
        return Ok(Transfer { consumed: src.len(), produced: src.len() });
    }

    check_call(from, to)?;
    let Some(codec) = CodecKind::for_format(to) else {
        tracing::warn!(
            encoding = %to.encoding,
            precision = to.precision,
            "play: unimplemented conversion"
        );
        return Err(ConvertError::UnimplementedConversion {
            encoding: to.encoding,
            precision: to.precision,
        });
    };

    Ok(resample::realtime(|| match codec {
        CodecKind::S16Le => play_with::<S16Le>(ctx, from, to, src, ring, bounds, cursor),
        CodecKind::S16Be => play_with::<S16Be>(ctx, from, to, src, ring, bounds, cursor),
        CodecKind::S24Le => play_with::<S24Le>(ctx, from, to, src, ring, bounds, cursor),
        CodecKind::S24Be => play_with::<S24Be>(ctx, from, to, src, ring, bounds, cursor),
    }))
}

fn play_with<C: SampleCodec>(
    ctx: &mut ConversionContext,
    from: &AudioFormat,
    to: &AudioFormat,
    src: &[u8],
    ring: &mut [u8],
    bounds: RingBounds,
    cursor: &mut usize,
) -> Transfer {
    let mut source = LinearSource::<C>::new(src, from.channels as usize);
    let mut sink = RingSink::<C>::new(
        RingWriter::new(ring, bounds, *cursor),
        from.channels as usize,
        to.channels as usize,
    );
    resample::run(ctx, from.sample_rate, to.sample_rate, &mut source, &mut sink);
    *cursor = sink.writer.position();
    Transfer { consumed: source.pos, produced: sink.written }
}

/// Decodes frames from a flat byte slice.
struct LinearSource<'a, C> {
    data: &'a [u8],
    pos: usize,
    channels: usize,
    _codec: PhantomData<C>,
}

impl<'a, C: SampleCodec> LinearSource<'a, C> {
    fn new(data: &'a [u8], channels: usize) -> Self {
        Self { data, pos: 0, channels, _codec: PhantomData }
    }
}

impl<C: SampleCodec> FrameSource for LinearSource<'_, C> {
    fn channels(&self) -> usize {
        self.channels
    }

    fn has_frame(&self) -> bool {
        self.data.len() - self.pos >= self.channels * C::WIDTH
    }

    fn read_frame(&mut self, frame: &mut SampleFrame) {
        frame.clear();
        for _ in 0..self.channels {
            frame.push(C::read(&self.data[self.pos..]));
            self.pos += C::WIDTH;
        }
    }
}

/// Adapts channel layout and encodes frames into the ring.
struct RingSink<'a, C> {
    writer: RingWriter<'a>,
    from: usize,
    to: usize,
    written: usize,
    _codec: PhantomData<C>,
}

impl<'a, C: SampleCodec> RingSink<'a, C> {
    fn new(writer: RingWriter<'a>, from: usize, to: usize) -> Self {
        Self { writer, from, to, written: 0, _codec: PhantomData }
    }

    fn put(&mut self, value: i32) {
        let mut bytes = [0u8; 4];
        C::write(&mut bytes, value);
        self.writer.write(&bytes[..C::WIDTH]);
        self.written += C::WIDTH;
    }
}

impl<C: SampleCodec> FrameSink for RingSink<'_, C> {
    fn has_room(&self, _frames: usize) -> bool {
        // The ring wraps; the caller keeps the hardware side ahead of us.
        true
    }

    fn write_frame(&mut self, frame: &SampleFrame) {
        if self.from == 2 && self.to == 1 {
            self.put((frame[0] + frame[1]) / 2);
            return;
        }

        let mut emitted = 0;
        for &value in frame.iter().take(self.to) {
            self.put(value);
            emitted += 1;
        }
        if emitted == 1 && self.to > 1 {
            self.put(frame[0]);
            emitted += 1;
        }
        for _ in emitted..self.to {
            self.put(0);
        }
    }
}
