//! WAV encoding and decoding for signed linear PCM.

use std::io::{Cursor, Seek, SeekFrom};

use binrw::{binrw, BinRead, BinWrite};
use srx_format::{AudioFormat, Encoding, MAX_CHANNELS};

use crate::WavError;

const FORMAT_PCM: u16 = 0x0001;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

#[binrw]
#[brw(little, magic = b"RIFF")]
struct RiffHeader {
    size: u32,
    form: [u8; 4],
}

#[binrw]
#[brw(little)]
struct ChunkHeader {
    id: [u8; 4],
    size: u32,
}

#[binrw]
#[brw(little)]
struct FmtChunk {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
}

/// Decoded WAV: stream format plus interleaved little-endian samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WavData {
    pub format: AudioFormat,
    pub data: Vec<u8>,
}

// --- Reading ---

/// Parse a WAV file held in memory.
pub fn read_wav(bytes: &[u8]) -> Result<WavData, WavError> {
    let mut cursor = Cursor::new(bytes);
    let riff = RiffHeader::read(&mut cursor).map_err(|_| WavError::NotWave)?;
    if &riff.form != b"WAVE" {
        return Err(WavError::NotWave);
    }

    let mut fmt: Option<FmtChunk> = None;
    let mut extensible_pcm = true;
    let mut data: Option<&[u8]> = None;

    while (cursor.position() as usize) + 8 <= bytes.len() {
        let chunk = ChunkHeader::read(&mut cursor)?;
        let body_start = cursor.position() as usize;
        let body_end = (body_start + chunk.size as usize).min(bytes.len());
        let body = &bytes[body_start..body_end];

        match &chunk.id {
            b"fmt " => {
                let header = FmtChunk::read(&mut Cursor::new(body))?;
                if header.format_tag == FORMAT_EXTENSIBLE {
                    // cbSize(2) validBits(2) channelMask(4), then the sub-format GUID
                    // whose first two bytes carry the real format tag.
                    extensible_pcm = body.len() >= 26
                        && u16::from_le_bytes([body[24], body[25]]) == FORMAT_PCM;
                }
                fmt = Some(header);
            }
            b"data" => data = Some(body),
            other => tracing::debug!(chunk = ?String::from_utf8_lossy(other), "skipping WAV chunk"),
        }

        let padded = chunk.size as u64 + (chunk.size as u64 & 1);
        cursor.seek(SeekFrom::Start(body_start as u64 + padded))?;
    }

    let fmt = fmt.ok_or(WavError::MissingChunk("fmt "))?;
    let data = data.ok_or(WavError::MissingChunk("data"))?;

    let is_pcm = fmt.format_tag == FORMAT_PCM
        || (fmt.format_tag == FORMAT_EXTENSIBLE && extensible_pcm);
    if !is_pcm {
        return Err(WavError::Unsupported(format!("format tag {:#06x}", fmt.format_tag)));
    }
    if fmt.bits_per_sample != 16 && fmt.bits_per_sample != 24 {
        return Err(WavError::Unsupported(format!("{}-bit samples", fmt.bits_per_sample)));
    }
    if fmt.channels == 0 || fmt.channels as usize > MAX_CHANNELS {
        return Err(WavError::Unsupported(format!("{} channels", fmt.channels)));
    }

    let format = AudioFormat::slinear_le(fmt.sample_rate, fmt.channels, fmt.bits_per_sample as u8);
    let whole = data.len() - data.len() % format.frame_bytes();
    Ok(WavData { format, data: data[..whole].to_vec() })
}

// --- Writing ---

/// Serialize little-endian PCM as a canonical 44-byte-header WAV.
pub fn write_wav(format: &AudioFormat, data: &[u8]) -> Result<Vec<u8>, WavError> {
    if format.encoding != Encoding::SlinearLe {
        return Err(WavError::Unsupported(format!("{} encoding", format.encoding)));
    }
    if format.precision != 16 && format.precision != 24 {
        return Err(WavError::Unsupported(format!("{}-bit samples", format.precision)));
    }

    let block_align = u16::try_from(format.frame_bytes())
        .map_err(|_| WavError::Unsupported(format!("{} channels", format.channels)))?;
    let byte_rate = format
        .sample_rate
        .checked_mul(block_align as u32)
        .ok_or_else(|| WavError::Unsupported(format!("{} Hz byte rate", format.sample_rate)))?;
    let pad = data.len() & 1;
    let too_large = || WavError::Unsupported(format!("{} data bytes", data.len()));
    let data_size = u32::try_from(data.len()).map_err(|_| too_large())?;
    let riff_size = data_size
        .checked_add(36 + pad as u32)
        .ok_or_else(too_large)?;

    let mut out = Cursor::new(Vec::with_capacity(44 + data.len() + pad));
    RiffHeader { size: riff_size, form: *b"WAVE" }.write(&mut out)?;
    ChunkHeader { id: *b"fmt ", size: 16 }.write(&mut out)?;
    FmtChunk {
        format_tag: FORMAT_PCM,
        channels: format.channels,
        sample_rate: format.sample_rate,
        byte_rate,
        block_align,
        bits_per_sample: format.precision as u16,
    }
    .write(&mut out)?;
    ChunkHeader { id: *b"data", size: data_size }.write(&mut out)?;

    let mut bytes = out.into_inner();
    bytes.extend_from_slice(data);
    if pad == 1 {
        bytes.push(0);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_canonical() {
        let format = AudioFormat::slinear_le(48000, 2, 24);
        let wav = write_wav(&format, &[0u8; 12]).unwrap();
        assert_eq!(wav.len(), 56);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 48);
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        assert_eq!(u16::from_le_bytes([wav[32], wav[33]]), 6);
        assert_eq!(u32::from_le_bytes([wav[28], wav[29], wav[30], wav[31]]), 288_000);
        assert_eq!(&wav[36..40], b"data");
    }

    #[test]
    fn reads_back_format_and_samples() {
        let format = AudioFormat::slinear_le(22050, 1, 16);
        let samples = [0x34u8, 0x12, 0xFF, 0x7F];
        let parsed = read_wav(&write_wav(&format, &samples).unwrap()).unwrap();
        assert_eq!(parsed.format, format);
        assert_eq!(parsed.data, samples);
    }

    #[test]
    fn skips_unknown_chunks_and_odd_padding() {
        let mut wav = b"RIFF\0\0\0\0WAVE".to_vec();
        wav.extend_from_slice(b"LIST\x03\0\0\0abc\0");
        wav.extend_from_slice(b"fmt \x10\0\0\0");
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&8000u32.to_le_bytes());
        wav.extend_from_slice(&32000u32.to_le_bytes());
        wav.extend_from_slice(&4u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data\x06\0\0\0");
        wav.extend_from_slice(&[1, 0, 2, 0, 3, 0]);

        let parsed = read_wav(&wav).unwrap();
        assert_eq!(parsed.format, AudioFormat::slinear_le(8000, 2, 16));
        // The trailing half frame is dropped.
        assert_eq!(parsed.data, [1, 0, 2, 0]);
    }

    #[test]
    fn rejects_8_bit_and_big_endian() {
        assert!(matches!(
            write_wav(&AudioFormat::slinear_be(8000, 1, 16), &[]),
            Err(WavError::Unsupported(_))
        ));

        let mut wav = write_wav(&AudioFormat::slinear_le(8000, 1, 16), &[0, 0]).unwrap();
        wav[34] = 8;
        assert!(matches!(read_wav(&wav), Err(WavError::Unsupported(_))));
    }

    #[test]
    fn rejects_header_fields_that_overflow() {
        let fast = AudioFormat::slinear_le(800_000_000, 2, 24);
        assert!(matches!(write_wav(&fast, &[0; 6]), Err(WavError::Unsupported(_))));

        // Largest rate whose stereo 24-bit byte rate still fits in 32 bits.
        let edge = AudioFormat::slinear_le(u32::MAX / 6, 2, 24);
        let wav = write_wav(&edge, &[0; 6]).unwrap();
        assert_eq!(read_wav(&wav).unwrap().format, edge);
    }

    #[test]
    fn rejects_non_riff() {
        assert!(matches!(read_wav(b"RIFX\0\0\0\0WAVE"), Err(WavError::NotWave)));
        assert!(matches!(read_wav(b"RIFF\0\0\0\0AVI "), Err(WavError::NotWave)));
    }

    #[test]
    fn missing_data_chunk() {
        let wav = write_wav(&AudioFormat::slinear_le(8000, 1, 16), &[]).unwrap();
        assert!(matches!(read_wav(&wav[..36]), Err(WavError::MissingChunk("data"))));
    }
}
