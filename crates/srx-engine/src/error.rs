//! Conversion error types.

use srx_format::Encoding;

/// Why a format pair (or a single call's formats) cannot be converted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidReason {
    /// Hardware-side encoding is not signed linear.
    UnsupportedEncoding(Encoding),
    /// Hardware-side precision is not 16 or 24 bits.
    UnsupportedPrecision(u8),
    /// Channel counts differ in a way no adaptation covers.
    ChannelMismatch { from: u16, to: u16 },
    /// A side has zero channels or more than `MAX_CHANNELS`.
    ChannelCount(u16),
    /// Rates differ and one of them is zero.
    ZeroRate,
}

impl core::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InvalidReason::UnsupportedEncoding(enc) => write!(f, "unsupported encoding {}", enc),
            InvalidReason::UnsupportedPrecision(bits) => {
                write!(f, "unsupported precision {} bits", bits)
            }
            InvalidReason::ChannelMismatch { from, to } => {
                write!(f, "cannot map {} channels to {}", from, to)
            }
            InvalidReason::ChannelCount(n) => write!(f, "channel count {} out of range", n),
            InvalidReason::ZeroRate => f.write_str("sample rate must be positive"),
        }
    }
}

/// Error type for the conversion engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The format pair was rejected; do not start conversion.
    #[error("invalid format: {0}")]
    InvalidFormat(InvalidReason),
    /// No codec exists for the hardware-side format. Nothing was written.
    #[error("unimplemented conversion: {precision}-bit {encoding}")]
    UnimplementedConversion { encoding: Encoding, precision: u8 },
    /// Ring bounds describe an empty or inverted region.
    #[error("invalid ring bounds {start}..{end}")]
    InvalidRing { start: usize, end: usize },
    /// Ring bounds extend past the supplied ring bytes.
    #[error("ring bounds end at {end} but the ring holds {len} bytes")]
    RingTooSmall { end: usize, len: usize },
    /// Cursor does not lie inside the ring bounds.
    #[error("cursor {cursor} outside ring {start}..{end}")]
    CursorOutOfRange { cursor: usize, start: usize, end: usize },
}
