//! Per-stream conversion state.

use srx_format::{AudioFormat, MAX_CHANNELS};

use crate::ring::RingBounds;

/// State that carries a stream across successive conversion calls.
///
/// Created once when a stream's formats are negotiated and passed by `&mut`
/// to every call for that stream. Re-creating it mid-stream resets the phase
/// and the interpolation history, which is audible as a discontinuity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionContext {
    /// Phase accumulator, in units of the faster side's rate.
    pub(crate) phase: u64,
    /// Last source-side frame consumed.
    pub(crate) prev: [i32; MAX_CHANNELS],
    pub(crate) ring: RingBounds,
}

impl ConversionContext {
    /// Fresh state for a stream converting `src_rate` into `dst_rate`.
    ///
    /// When upsampling the phase starts at `src_rate` so the first output
    /// frame is already half-way (or further) towards the first source frame.
    pub fn new(src_rate: u32, dst_rate: u32, ring: RingBounds) -> Self {
        let phase = if dst_rate > src_rate { src_rate as u64 } else { 0 };
        Self { phase, prev: [0; MAX_CHANNELS], ring }
    }

    /// State for playback: application rate into hardware rate.
    pub fn for_playback(from: &AudioFormat, to: &AudioFormat, ring: RingBounds) -> Self {
        Self::new(from.sample_rate, to.sample_rate, ring)
    }

    /// State for recording: hardware rate into application rate.
    pub fn for_record(from: &AudioFormat, to: &AudioFormat, ring: RingBounds) -> Self {
        Self::new(to.sample_rate, from.sample_rate, ring)
    }

    pub fn phase(&self) -> u64 {
        self.phase
    }

    pub fn prev_frame(&self) -> &[i32; MAX_CHANNELS] {
        &self.prev
    }

    pub fn ring(&self) -> RingBounds {
        self.ring
    }
}
