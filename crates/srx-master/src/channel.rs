//! One open stream: negotiated formats, the hardware ring, and the
//! conversion state, all behind the stream's lock.

use parking_lot::Mutex;
use srx_engine::{ConversionContext, ConvertError, InvalidReason, RingBuffer};
use srx_format::AudioFormat;

/// Which way samples flow through the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Application writes, hardware drains the ring.
    Playback,
    /// Hardware fills the ring, application reads.
    Record,
}

/// Parameters for opening a [`Channel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Application-side format.
    pub app: AudioFormat,
    /// Hardware-side (ring) format.
    pub hw: AudioFormat,
    pub direction: Direction,
    /// Ring size; rounded down to whole hardware frames on open.
    pub ring_bytes: usize,
}

impl ChannelConfig {
    pub const DEFAULT_RING_BYTES: usize = 64 * 1024;

    pub fn playback(app: AudioFormat, hw: AudioFormat) -> Self {
        Self { app, hw, direction: Direction::Playback, ring_bytes: Self::DEFAULT_RING_BYTES }
    }

    pub fn record(app: AudioFormat, hw: AudioFormat) -> Self {
        Self { app, hw, direction: Direction::Record, ring_bytes: Self::DEFAULT_RING_BYTES }
    }

    pub fn with_ring_bytes(mut self, ring_bytes: usize) -> Self {
        self.ring_bytes = ring_bytes;
        self
    }
}

/// Error type for channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error(transparent)]
    Convert(#[from] ConvertError),
    /// Called the playback API on a record channel or vice versa.
    #[error("channel is open for {open:?}, not {requested:?}")]
    WrongDirection { open: Direction, requested: Direction },
    /// Converting needs both sides to share precision and encoding.
    #[error("sample coding differs between application ({app}) and hardware ({hw})")]
    CodingMismatch { app: AudioFormat, hw: AudioFormat },
    /// The ring cannot hold the output of a single source frame.
    #[error("ring of {ring} bytes cannot hold a {needed}-byte burst")]
    RingTooSmall { ring: usize, needed: usize },
}

/// Byte geometry of one conversion step, input side to output side.
#[derive(Clone, Copy, Debug)]
struct Geometry {
    in_frame: usize,
    out_frame: usize,
    /// Most output frames one input frame can produce.
    burst: usize,
    passthrough: bool,
}

impl Geometry {
    fn new(app: &AudioFormat, hw: &AudioFormat, direction: Direction) -> Self {
        let width = hw.bytes_per_sample();
        let (src, dst) = match direction {
            Direction::Playback => (app, hw),
            Direction::Record => (hw, app),
        };
        let burst = if dst.sample_rate > src.sample_rate {
            dst.sample_rate.div_ceil(src.sample_rate) as usize
        } else {
            1
        };
        Self {
            in_frame: width * src.channels as usize,
            out_frame: width * dst.channels as usize,
            burst,
            passthrough: app.same_shape(hw),
        }
    }

    fn max_output(&self, in_bytes: usize) -> usize {
        if self.passthrough {
            return in_bytes;
        }
        (in_bytes / self.in_frame) * self.burst * self.out_frame
    }

    fn max_input(&self, out_room: usize) -> usize {
        if self.passthrough {
            return out_room;
        }
        (out_room / (self.burst * self.out_frame)) * self.in_frame
    }
}

struct ChannelState {
    ctx: ConversionContext,
    ring: RingBuffer,
    /// Engine-side cursor: written by playback, read by record.
    app_cursor: usize,
    /// Hardware-side cursor.
    hw_cursor: usize,
    /// Bytes in the ring not yet taken by the consuming side.
    fill: usize,
}

/// A negotiated stream.
///
/// Every engine call for the stream happens under the stream's lock, so
/// the conversion context is never touched concurrently.
pub struct Channel {
    config: ChannelConfig,
    geometry: Geometry,
    state: Mutex<ChannelState>,
}

impl Channel {
    /// Validate the format pair once, allocate the ring and set up
    /// conversion state.
    pub fn open(config: ChannelConfig) -> Result<Self, ChannelError> {
        let ChannelConfig { app, hw, direction, .. } = config;
        srx_engine::validate(&app, &hw)?;
        for channels in [app.channels, hw.channels] {
            if channels == 0 {
                return Err(ConvertError::InvalidFormat(InvalidReason::ChannelCount(0)).into());
            }
        }
        if !app.same_shape(&hw) && (app.precision != hw.precision || app.encoding != hw.encoding) {
            return Err(ChannelError::CodingMismatch { app, hw });
        }

        let geometry = Geometry::new(&app, &hw, direction);
        let hw_frame = hw.frame_bytes().max(1);
        let ring_bytes = config.ring_bytes - config.ring_bytes % hw_frame;
        let needed = match direction {
            Direction::Playback => geometry.max_output(geometry.in_frame),
            Direction::Record => geometry.in_frame,
        };
        if ring_bytes == 0 || ring_bytes < needed {
            return Err(ChannelError::RingTooSmall { ring: ring_bytes, needed });
        }

        let ring = RingBuffer::new(ring_bytes);
        let bounds = ring.bounds()?;
        let ctx = match direction {
            Direction::Playback => ConversionContext::for_playback(&app, &hw, bounds),
            Direction::Record => ConversionContext::for_record(&app, &hw, bounds),
        };

        tracing::info!(
            ?direction,
            app = %app,
            hw = %hw,
            ring_bytes,
            "opened channel"
        );

        Ok(Self {
            config: ChannelConfig { ring_bytes, ..config },
            geometry,
            state: Mutex::new(ChannelState {
                ctx,
                ring,
                app_cursor: 0,
                hw_cursor: 0,
                fill: 0,
            }),
        })
    }

    pub fn ring_capacity(&self) -> usize {
        self.config.ring_bytes
    }

    /// Bytes waiting in the ring.
    pub fn buffered(&self) -> usize {
        self.state.lock().fill
    }

    /// Worst-case output bytes for `in_bytes` of input in this channel's
    /// direction.
    pub fn max_output_bytes(&self, in_bytes: usize) -> usize {
        self.geometry.max_output(in_bytes)
    }

    /// Playback: convert as much of `data` as is sure to fit in the ring.
    /// Returns the number of `data` bytes consumed.
    pub fn write(&self, data: &[u8]) -> Result<usize, ChannelError> {
        self.expect(Direction::Playback)?;
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let free = state.ring.capacity() - state.fill;
        let take = data.len().min(self.geometry.max_input(free));
        if take == 0 {
            return Ok(0);
        }

        let transfer = srx_engine::play(
            &mut state.ctx,
            &self.config.app,
            &self.config.hw,
            &data[..take],
            state.ring.as_mut_slice(),
            &mut state.app_cursor,
        )?;
        state.fill += transfer.produced;
        Ok(transfer.consumed)
    }

    /// Hardware side of playback: move up to `out.len()` converted bytes out
    /// of the ring. Returns the number of bytes moved.
    pub fn hw_drain(&self, out: &mut [u8]) -> Result<usize, ChannelError> {
        self.expect(Direction::Playback)?;
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let n = out.len().min(state.fill);
        let bounds = state.ctx.ring();
        state.ring.read_wrapping(bounds, &mut state.hw_cursor, &mut out[..n])?;
        state.fill -= n;
        Ok(n)
    }

    /// Hardware side of recording: place as much of `data` as fits into the
    /// ring. Returns the number of bytes accepted.
    pub fn hw_fill(&self, data: &[u8]) -> Result<usize, ChannelError> {
        self.expect(Direction::Record)?;
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let n = data.len().min(state.ring.capacity() - state.fill);
        let bounds = state.ctx.ring();
        state.ring.write_wrapping(bounds, &mut state.hw_cursor, &data[..n])?;
        state.fill += n;
        Ok(n)
    }

    /// Record: convert buffered ring bytes into `out`. Returns the number of
    /// `out` bytes written.
    pub fn read(&self, out: &mut [u8]) -> Result<usize, ChannelError> {
        self.expect(Direction::Record)?;
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let transfer = srx_engine::record(
            &mut state.ctx,
            &self.config.app,
            &self.config.hw,
            state.ring.as_slice(),
            &mut state.app_cursor,
            state.fill,
            out,
        )?;
        state.fill -= transfer.consumed;
        Ok(transfer.produced)
    }

    fn expect(&self, requested: Direction) -> Result<(), ChannelError> {
        if self.config.direction != requested {
            return Err(ChannelError::WrongDirection { open: self.config.direction, requested });
        }
        Ok(())
    }
}
