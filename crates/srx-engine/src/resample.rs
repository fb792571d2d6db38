//! Phase-accumulator rate conversion shared by both directions.
//!
//! The converters plug a frame source and a frame sink into [`run`]; the
//! source decodes frames from wherever the input lives (flat buffer or ring)
//! and the sink adapts channel layout and encodes into the output. Every
//! early return happens at a point where the context alone describes the
//! stream, so splitting a call in two yields the same output.

use srx_format::SampleFrame;

use crate::context::ConversionContext;

/// Byte counts moved by one conversion call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transfer {
    /// Input bytes consumed.
    pub consumed: usize,
    /// Output bytes written.
    pub produced: usize,
}

pub(crate) trait FrameSource {
    /// Channels per decoded frame.
    fn channels(&self) -> usize;

    /// Whether a whole frame is left to read.
    fn has_frame(&self) -> bool;

    /// Decode the next frame into `frame`, replacing its contents.
    fn read_frame(&mut self, frame: &mut SampleFrame);
}

pub(crate) trait FrameSink {
    /// Whether `frames` more output frames fit.
    fn has_room(&self, frames: usize) -> bool;

    fn write_frame(&mut self, frame: &SampleFrame);
}

/// Convert from `src_rate` to `dst_rate` until the source runs dry or the
/// sink fills up.
pub(crate) fn run<S: FrameSource, K: FrameSink>(
    ctx: &mut ConversionContext,
    src_rate: u32,
    dst_rate: u32,
    source: &mut S,
    sink: &mut K,
) {
    let mut last = SampleFrame::new();

    if src_rate == dst_rate {
        pass_through(source, sink, &mut last);
    } else if dst_rate < src_rate {
        decimate(ctx, src_rate as u64, dst_rate as u64, source, sink, &mut last);
    } else {
        interpolate(ctx, src_rate as u64, dst_rate as u64, source, sink, &mut last);
    }

    if !last.is_empty() {
        ctx.prev[..last.len()].copy_from_slice(&last);
    }
}

fn pass_through<S: FrameSource, K: FrameSink>(source: &mut S, sink: &mut K, last: &mut SampleFrame) {
    while source.has_frame() && sink.has_room(1) {
        source.read_frame(last);
        sink.write_frame(last);
    }
}

/// Nearest-frame decimation: of every window of source frames that spans
/// one output period, only the last one is emitted.
fn decimate<S: FrameSource, K: FrameSink>(
    ctx: &mut ConversionContext,
    src_rate: u64,
    dst_rate: u64,
    source: &mut S,
    sink: &mut K,
    last: &mut SampleFrame,
) {
    loop {
        if !sink.has_room(1) {
            return;
        }
        loop {
            if !source.has_frame() {
                return;
            }
            source.read_frame(last);
            ctx.phase += dst_rate;
            if ctx.phase >= src_rate {
                break;
            }
        }
        ctx.phase -= src_rate;
        sink.write_frame(last);
    }
}

/// Linear interpolation between the previous and next source frames with an
/// 8-bit fixed-point weight.
fn interpolate<S: FrameSource, K: FrameSink>(
    ctx: &mut ConversionContext,
    src_rate: u64,
    dst_rate: u64,
    source: &mut S,
    sink: &mut K,
    next: &mut SampleFrame,
) {
    // Most output frames a single source frame can produce.
    let burst = dst_rate.div_ceil(src_rate) as usize;
    if !source.has_frame() || !sink.has_room(burst) {
        return;
    }

    let mut prev = SampleFrame::new();
    prev.extend(ctx.prev[..source.channels()].iter().copied());
    source.read_frame(next);

    let mut out = SampleFrame::new();
    loop {
        let weight = (ctx.phase * 256 / dst_rate) as i64;
        out.clear();
        for (&n, &p) in next.iter().zip(prev.iter()) {
            // 64-bit products: 24-bit samples times 256 can reach 2^31.
            out.push(((weight * n as i64 + (256 - weight) * p as i64) >> 8) as i32);
        }
        sink.write_frame(&out);

        ctx.phase += src_rate;
        if ctx.phase >= dst_rate {
            ctx.phase -= dst_rate;
            prev.clone_from(next);
            if !source.has_frame() || !sink.has_room(burst) {
                break;
            }
            source.read_frame(next);
        }
    }
}

/// Run `f` with heap allocation forbidden when `alloc_check` is enabled.
#[inline]
pub(crate) fn realtime<T>(f: impl FnOnce() -> T) -> T {
    #[cfg(feature = "alloc_check")]
    {
        assert_no_alloc::assert_no_alloc(f)
    }
    #[cfg(not(feature = "alloc_check"))]
    {
        f()
    }
}
