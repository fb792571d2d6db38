//! Format pair negotiation.

use srx_format::{AudioFormat, MAX_CHANNELS};

use crate::error::{ConvertError, InvalidReason};

/// Decide whether `from` (application side) can be converted to `to`
/// (hardware side).
///
/// Equal rate and channel count always passes, whatever the encodings: no
/// conversion is performed in that case. Otherwise the hardware side must be
/// 16/24-bit signed linear, channel counts may only go 2→1, 1→2 or grow,
/// neither side may exceed [`MAX_CHANNELS`], and differing rates must both
/// be positive.
pub fn validate(from: &AudioFormat, to: &AudioFormat) -> Result<(), ConvertError> {
    tracing::debug!(
        from_rate = from.sample_rate,
        to_rate = to.sample_rate,
        from_channels = from.channels,
        to_channels = to.channels,
        from_precision = from.precision,
        to_precision = to.precision,
        from_encoding = %from.encoding,
        to_encoding = %to.encoding,
        "checking conversion parameters"
    );

    if from.same_shape(to) {
        return Ok(());
    }

    if !to.encoding.is_signed_linear() {
        return Err(ConvertError::InvalidFormat(InvalidReason::UnsupportedEncoding(
            to.encoding,
        )));
    }
    if to.precision != 16 && to.precision != 24 {
        return Err(ConvertError::InvalidFormat(InvalidReason::UnsupportedPrecision(
            to.precision,
        )));
    }

    if to.channels != from.channels {
        let allowed = matches!((from.channels, to.channels), (2, 1) | (1, 2))
            || to.channels > from.channels;
        if !allowed {
            return Err(ConvertError::InvalidFormat(InvalidReason::ChannelMismatch {
                from: from.channels,
                to: to.channels,
            }));
        }
    }

    for channels in [to.channels, from.channels] {
        if channels as usize > MAX_CHANNELS {
            return Err(ConvertError::InvalidFormat(InvalidReason::ChannelCount(channels)));
        }
    }

    if to.sample_rate != from.sample_rate && (to.sample_rate == 0 || from.sample_rate == 0) {
        return Err(ConvertError::InvalidFormat(InvalidReason::ZeroRate));
    }

    Ok(())
}

/// Per-call guard: both sides must carry 1..=MAX_CHANNELS channels, and a
/// resampling call needs two positive rates. Zero-width frames would never
/// exhaust the source.
pub(crate) fn check_call(from: &AudioFormat, to: &AudioFormat) -> Result<(), ConvertError> {
    for channels in [from.channels, to.channels] {
        if channels == 0 || channels as usize > MAX_CHANNELS {
            return Err(ConvertError::InvalidFormat(InvalidReason::ChannelCount(channels)));
        }
    }
    if from.sample_rate != to.sample_rate && (from.sample_rate == 0 || to.sample_rate == 0) {
        return Err(ConvertError::InvalidFormat(InvalidReason::ZeroRate));
    }
    Ok(())
}
