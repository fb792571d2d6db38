//! Fixed-capacity working frame.

use arrayvec::ArrayVec;

/// Maximum number of interleaved channels on either side of a stream.
pub const MAX_CHANNELS: usize = 12;

/// One decoded frame: a sign-extended working value per channel.
///
/// Lives on the stack for the duration of a conversion call; never
/// allocates. Pushing more than [`MAX_CHANNELS`] values panics, so callers
/// check channel counts before building frames.
pub type SampleFrame = ArrayVec<i32, MAX_CHANNELS>;
