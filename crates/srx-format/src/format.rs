//! Stream format descriptors.

use core::fmt;

/// Sample encoding of a PCM stream.
///
/// Only the signed linear encodings are convertible; the rest exist so a
/// negotiated format can be described (and rejected) faithfully.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    SlinearLe,
    SlinearBe,
    UlinearLe,
    UlinearBe,
    Ulaw,
    Alaw,
}

impl Encoding {
    /// True for the signed linear encodings the engine can code.
    pub const fn is_signed_linear(self) -> bool {
        matches!(self, Encoding::SlinearLe | Encoding::SlinearBe)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::SlinearLe => "slinear_le",
            Encoding::SlinearBe => "slinear_be",
            Encoding::UlinearLe => "ulinear_le",
            Encoding::UlinearBe => "ulinear_be",
            Encoding::Ulaw => "ulaw",
            Encoding::Alaw => "alaw",
        };
        f.write_str(name)
    }
}

/// Format of one side of a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AudioFormat {
    /// Frames per second (Hz).
    pub sample_rate: u32,
    /// Interleaved channels per frame.
    pub channels: u16,
    /// Bits per sample.
    pub precision: u8,
    pub encoding: Encoding,
}

impl AudioFormat {
    pub const fn new(sample_rate: u32, channels: u16, precision: u8, encoding: Encoding) -> Self {
        Self { sample_rate, channels, precision, encoding }
    }

    /// Signed little-endian PCM.
    pub const fn slinear_le(sample_rate: u32, channels: u16, precision: u8) -> Self {
        Self::new(sample_rate, channels, precision, Encoding::SlinearLe)
    }

    /// Signed big-endian PCM.
    pub const fn slinear_be(sample_rate: u32, channels: u16, precision: u8) -> Self {
        Self::new(sample_rate, channels, precision, Encoding::SlinearBe)
    }

    /// Bytes occupied by one sample (precision rounded up to whole bytes).
    pub const fn bytes_per_sample(&self) -> usize {
        (self.precision as usize).div_ceil(8)
    }

    /// Bytes occupied by one interleaved frame.
    pub const fn frame_bytes(&self) -> usize {
        self.bytes_per_sample() * self.channels as usize
    }

    /// Same rate and channel count, i.e. no conversion required.
    pub fn same_shape(&self, other: &AudioFormat) -> bool {
        self.sample_rate == other.sample_rate && self.channels == other.channels
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {}-bit {}",
            self.sample_rate, self.channels, self.precision, self.encoding
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_bytes_by_precision() {
        assert_eq!(AudioFormat::slinear_le(48000, 2, 16).frame_bytes(), 4);
        assert_eq!(AudioFormat::slinear_be(48000, 2, 24).frame_bytes(), 6);
        assert_eq!(AudioFormat::new(8000, 1, 8, Encoding::Ulaw).frame_bytes(), 1);
    }

    #[test]
    fn same_shape_ignores_encoding() {
        let a = AudioFormat::slinear_le(44100, 2, 16);
        let b = AudioFormat::slinear_be(44100, 2, 24);
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&AudioFormat::slinear_le(48000, 2, 16)));
    }

    #[test]
    fn only_slinear_is_signed_linear() {
        assert!(Encoding::SlinearLe.is_signed_linear());
        assert!(Encoding::SlinearBe.is_signed_linear());
        assert!(!Encoding::UlinearLe.is_signed_linear());
        assert!(!Encoding::Ulaw.is_signed_linear());
    }
}
