//! RIFF/WAVE container I/O for srx.
//!
//! Reads and writes signed linear 16/24-bit PCM so conversion runs can start
//! and end in ordinary audio files.

mod wav_format;

pub use wav_format::{read_wav, write_wav, WavData};

/// Error type for WAV parsing and writing.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    /// Missing RIFF magic or WAVE form type.
    #[error("not a RIFF/WAVE file")]
    NotWave,
    /// A required chunk never appeared.
    #[error("missing {0} chunk")]
    MissingChunk(&'static str),
    /// Valid WAV, but not PCM the engine can carry.
    #[error("unsupported WAV format: {0}")]
    Unsupported(String),
    /// Truncated or malformed chunk structure.
    #[error("malformed WAV: {0}")]
    Parse(#[from] binrw::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
