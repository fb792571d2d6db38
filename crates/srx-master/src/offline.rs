//! Offline conversion: push a whole buffer through a channel in fixed-size
//! chunks, the way a driver would feed it in real time.

use srx_format::AudioFormat;

use crate::channel::{Channel, ChannelConfig, ChannelError};

/// Default chunk size for offline runs, in input bytes.
pub const DEFAULT_CHUNK_BYTES: usize = 4096;

/// Play `input` (in `app` format) into a `hw`-format ring, draining the ring
/// after every chunk. Returns everything the hardware side received.
pub fn convert_playback(
    app: AudioFormat,
    hw: AudioFormat,
    input: &[u8],
    chunk_bytes: usize,
) -> Result<Vec<u8>, ChannelError> {
    let chunk = chunk_bytes.max(app.frame_bytes()).max(1);
    let channel = Channel::open(ChannelConfig::playback(app, hw))?;

    let mut out = Vec::with_capacity(channel.max_output_bytes(input.len()));
    let mut drain = vec![0u8; channel.ring_capacity()];
    let mut pos = 0;

    while pos < input.len() {
        let end = (pos + chunk).min(input.len());
        let consumed = channel.write(&input[pos..end])?;
        let drained = channel.hw_drain(&mut drain)?;
        out.extend_from_slice(&drain[..drained]);
        if consumed == 0 && drained == 0 {
            // Only a partial frame is left.
            break;
        }
        pos += consumed;
    }

    tracing::debug!(input = input.len(), output = out.len(), "offline playback done");
    Ok(out)
}

/// Feed `input` (in `hw` format) into the ring chunk by chunk and record it
/// out in `app` format.
pub fn convert_record(
    app: AudioFormat,
    hw: AudioFormat,
    input: &[u8],
    chunk_bytes: usize,
) -> Result<Vec<u8>, ChannelError> {
    let chunk = chunk_bytes.max(hw.frame_bytes()).max(1);
    let channel = Channel::open(ChannelConfig::record(app, hw).with_ring_bytes(
        ChannelConfig::DEFAULT_RING_BYTES.max(2 * chunk),
    ))?;

    let mut out = Vec::new();
    // Room for a chunk's worth of output plus one extra burst.
    let mut dest = vec![0u8; channel.max_output_bytes(chunk + hw.frame_bytes())];
    let mut pos = 0;

    loop {
        let end = (pos + chunk).min(input.len());
        let filled = channel.hw_fill(&input[pos..end])?;
        pos += filled;

        loop {
            let n = channel.read(&mut dest)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&dest[..n]);
        }

        if pos >= input.len() || filled == 0 {
            break;
        }
    }

    tracing::debug!(input = input.len(), output = out.len(), "offline record done");
    Ok(out)
}
