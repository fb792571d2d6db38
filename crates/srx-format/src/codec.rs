//! Signed linear sample codecs.
//!
//! Each codec reads one sample into an `i32` working value and writes one
//! back, truncating to its width. There is no clamping: values outside the
//! width wrap exactly as a plain narrowing store would.

use crate::format::{AudioFormat, Encoding};

/// Read/write one sample of a fixed width and byte order.
pub trait SampleCodec {
    /// Bytes per sample.
    const WIDTH: usize;

    /// Decode a sign-extended sample from the first `WIDTH` bytes.
    fn read(bytes: &[u8]) -> i32;

    /// Encode `value` into the first `WIDTH` bytes, truncating.
    fn write(bytes: &mut [u8], value: i32);
}

/// 16-bit signed little-endian.
#[derive(Clone, Copy, Debug)]
pub struct S16Le;

/// 16-bit signed big-endian.
#[derive(Clone, Copy, Debug)]
pub struct S16Be;

/// 24-bit signed little-endian, packed in three bytes.
#[derive(Clone, Copy, Debug)]
pub struct S24Le;

/// 24-bit signed big-endian, packed in three bytes.
#[derive(Clone, Copy, Debug)]
pub struct S24Be;

impl SampleCodec for S16Le {
    const WIDTH: usize = 2;

    #[inline]
    fn read(bytes: &[u8]) -> i32 {
        i16::from_le_bytes([bytes[0], bytes[1]]) as i32
    }

    #[inline]
    fn write(bytes: &mut [u8], value: i32) {
        bytes[..2].copy_from_slice(&(value as i16).to_le_bytes());
    }
}

impl SampleCodec for S16Be {
    const WIDTH: usize = 2;

    #[inline]
    fn read(bytes: &[u8]) -> i32 {
        i16::from_be_bytes([bytes[0], bytes[1]]) as i32
    }

    #[inline]
    fn write(bytes: &mut [u8], value: i32) {
        bytes[..2].copy_from_slice(&(value as i16).to_be_bytes());
    }
}

impl SampleCodec for S24Le {
    const WIDTH: usize = 3;

    #[inline]
    fn read(bytes: &[u8]) -> i32 {
        // Top byte carries the sign.
        (bytes[0] as i32) | ((bytes[1] as i32) << 8) | ((bytes[2] as i8 as i32) << 16)
    }

    #[inline]
    fn write(bytes: &mut [u8], value: i32) {
        bytes[0] = value as u8;
        bytes[1] = (value >> 8) as u8;
        bytes[2] = (value >> 16) as u8;
    }
}

impl SampleCodec for S24Be {
    const WIDTH: usize = 3;

    #[inline]
    fn read(bytes: &[u8]) -> i32 {
        (bytes[2] as i32) | ((bytes[1] as i32) << 8) | ((bytes[0] as i8 as i32) << 16)
    }

    #[inline]
    fn write(bytes: &mut [u8], value: i32) {
        bytes[0] = (value >> 16) as u8;
        bytes[1] = (value >> 8) as u8;
        bytes[2] = value as u8;
    }
}

/// Runtime tag for the codec a format maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecKind {
    S16Le,
    S16Be,
    S24Le,
    S24Be,
}

impl CodecKind {
    /// Codec for a format's `(precision, encoding)`, if one exists.
    pub fn for_format(format: &AudioFormat) -> Option<Self> {
        match (format.encoding, format.precision) {
            (Encoding::SlinearLe, 16) => Some(CodecKind::S16Le),
            (Encoding::SlinearLe, 24) => Some(CodecKind::S24Le),
            (Encoding::SlinearBe, 16) => Some(CodecKind::S16Be),
            (Encoding::SlinearBe, 24) => Some(CodecKind::S24Be),
            _ => None,
        }
    }
}
