//! srx CLI: push a WAV file through the conversion engine in chunks.
//!
//! Usage:
//!   srx-cli in.wav out.wav --rate 48000 --channels 2
//!   srx-cli in.wav out.wav --rate 16000 --channels 1 --record

use anyhow::{Context, Result};
use clap::Parser;
use srx_master::{convert_playback, convert_record, AudioFormat, DEFAULT_CHUNK_BYTES};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "srx-cli", version, about = "Convert PCM WAV files through the srx engine")]
struct Args {
    /// Input WAV (16 or 24-bit PCM).
    input: PathBuf,
    /// Output WAV path.
    output: PathBuf,
    /// Output sample rate; defaults to the input rate.
    #[arg(long)]
    rate: Option<u32>,
    /// Output channel count; defaults to the input count.
    #[arg(long)]
    channels: Option<u16>,
    /// Bytes fed to the engine per call.
    #[arg(long, default_value_t = DEFAULT_CHUNK_BYTES)]
    chunk: usize,
    /// Treat the input as hardware data and record it, instead of playing
    /// it into a hardware-format ring.
    #[arg(long)]
    record: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let wav = srx_wav::read_wav(&bytes)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    let target = AudioFormat {
        sample_rate: args.rate.unwrap_or(wav.format.sample_rate),
        channels: args.channels.unwrap_or(wav.format.channels),
        ..wav.format
    };

    println!("Input:  {}", wav.format);
    println!("Output: {}", target);
    println!("Mode:   {}", if args.record { "record" } else { "playback" });
    tracing::debug!(chunk = args.chunk, bytes = wav.data.len(), "starting conversion");

    let converted = if args.record {
        convert_record(target, wav.format, &wav.data, args.chunk)
    } else {
        convert_playback(wav.format, target, &wav.data, args.chunk)
    }
    .context("conversion failed")?;

    let out = srx_wav::write_wav(&target, &converted).context("failed to encode WAV")?;
    fs::write(&args.output, &out)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Frames: {} -> {}",
        wav.data.len() / wav.format.frame_bytes(),
        converted.len() / target.frame_bytes()
    );
    Ok(())
}
