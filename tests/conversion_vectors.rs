//! Known-answer vectors for the conversion engine, driven through the public
//! API the way a driver would.

use srx_engine::{
    play, record, validate, ConversionContext, ConvertError, InvalidReason, RingBounds, Transfer,
};
use srx_format::{AudioFormat, Encoding};

fn le16(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn read_le16(bytes: &[u8]) -> Vec<i16> {
    bytes.chunks_exact(2).map(|b| i16::from_le_bytes([b[0], b[1]])).collect()
}

/// Play `src` once into a fresh ring of `ring_bytes`, starting at cursor 0.
fn play_once(from: AudioFormat, to: AudioFormat, src: &[u8], ring_bytes: usize) -> (Transfer, Vec<u8>) {
    let bounds = RingBounds::new(0, ring_bytes).unwrap();
    let mut ctx = ConversionContext::for_playback(&from, &to, bounds);
    let mut ring = vec![0u8; ring_bytes];
    let mut cursor = 0;
    let t = play(&mut ctx, &from, &to, src, &mut ring, &mut cursor).unwrap();
    ring.truncate(t.produced);
    (t, ring)
}

#[test]
fn validator_ignores_encoding_when_shape_matches() {
    let encodings = [
        Encoding::SlinearLe,
        Encoding::SlinearBe,
        Encoding::UlinearLe,
        Encoding::UlinearBe,
        Encoding::Ulaw,
        Encoding::Alaw,
    ];
    for a in encodings {
        for b in encodings {
            for precision in [8, 16, 24, 32] {
                let from = AudioFormat::new(32000, 2, precision, a);
                let to = AudioFormat::new(32000, 2, 16, b);
                assert_eq!(validate(&from, &to), Ok(()), "{} -> {}", from, to);
            }
        }
    }
}

#[test]
fn validator_rejects_bad_pairs() {
    // Three channels folding into two has no mixing rule.
    assert_eq!(
        validate(&AudioFormat::slinear_le(48000, 3, 16), &AudioFormat::slinear_le(48000, 2, 16)),
        Err(ConvertError::InvalidFormat(InvalidReason::ChannelMismatch { from: 3, to: 2 }))
    );
    assert_eq!(
        validate(&AudioFormat::slinear_le(44100, 2, 16), &AudioFormat::slinear_le(48000, 2, 8)),
        Err(ConvertError::InvalidFormat(InvalidReason::UnsupportedPrecision(8)))
    );
}

#[test]
fn validator_is_idempotent() {
    let from = AudioFormat::slinear_le(44100, 2, 16);
    let to = AudioFormat::slinear_be(0, 1, 24);
    let first = validate(&from, &to);
    assert!(first.is_err());
    for _ in 0..8 {
        assert_eq!(validate(&from, &to), first);
    }
}

#[test]
fn stereo_to_mono_average_truncates() {
    let from = AudioFormat::slinear_le(44100, 2, 16);
    let to = AudioFormat::slinear_le(44100, 1, 16);
    let (t, out) = play_once(from, to, &le16(&[100, 200, 300, -300]), 64);
    assert_eq!(t, Transfer { consumed: 8, produced: 4 });
    assert_eq!(read_le16(&out), [150, 0]);
}

#[test]
fn mono_to_stereo_duplicates() {
    let from = AudioFormat::slinear_le(44100, 1, 16);
    let to = AudioFormat::slinear_le(44100, 2, 16);
    let (_, out) = play_once(from, to, &le16(&[1000, 2000]), 64);
    assert_eq!(read_le16(&out), [1000, 1000, 2000, 2000]);
}

#[test]
fn downsample_keeps_last_frame_of_each_window() {
    let from = AudioFormat::slinear_le(48000, 1, 16);
    let to = AudioFormat::slinear_le(24000, 1, 16);
    let (t, out) = play_once(from, to, &le16(&[10, 20, 30, 40]), 64);
    assert_eq!(t.consumed, 8);
    assert_eq!(read_le16(&out), [20, 40]);
}

#[test]
fn upsample_first_value_is_weighted_midpoint() {
    let from = AudioFormat::slinear_le(24000, 1, 16);
    let to = AudioFormat::slinear_le(48000, 1, 16);
    let bounds = RingBounds::new(0, 64).unwrap();
    let ctx = ConversionContext::for_playback(&from, &to, bounds);
    assert_eq!(ctx.phase(), 24000);

    let (_, out) = play_once(from, to, &le16(&[1000]), 64);
    // w = 24000 * 256 / 48000 = 128; (128 * 1000 + 128 * 0) >> 8
    assert_eq!(read_le16(&out)[0], 500);
}

#[test]
fn ring_write_wraps_last_byte() {
    let f = AudioFormat::slinear_le(48000, 1, 16);
    let bounds = RingBounds::new(4, 12).unwrap();
    let mut ctx = ConversionContext::for_playback(&f, &f, bounds);
    let mut ring = vec![0u8; 16];
    let mut cursor = 11;

    let t = play(&mut ctx, &f, &f, &[0xAB, 0xCD], &mut ring, &mut cursor).unwrap();
    assert_eq!(t.consumed, 2);
    assert_eq!(ring[11], 0xAB);
    assert_eq!(ring[4], 0xCD);
    assert_eq!(cursor, 5);
    // Nothing outside the region was touched.
    assert!(ring[..4].iter().all(|&b| b == 0));
    assert!(ring[12..].iter().all(|&b| b == 0));
}

#[test]
fn ring_write_ending_exactly_at_end_resets_cursor() {
    let f = AudioFormat::slinear_le(48000, 1, 16);
    let bounds = RingBounds::new(0, 8).unwrap();
    let mut ctx = ConversionContext::for_playback(&f, &f, bounds);
    let mut ring = vec![0u8; 8];
    let mut cursor = 6;

    play(&mut ctx, &f, &f, &[1, 2], &mut ring, &mut cursor).unwrap();
    assert_eq!(&ring[6..], &[1, 2]);
    assert_eq!(cursor, 0);
}

/// Play `src` whole, then again split at each of `splits`, and compare.
fn assert_playback_split_invariant(from: AudioFormat, to: AudioFormat, src: &[u8], splits: &[usize]) {
    let ring_bytes = 4096 * 3;
    let (_, whole) = play_once(from, to, src, ring_bytes);

    for &split in splits {
        let bounds = RingBounds::new(0, ring_bytes).unwrap();
        let mut ctx = ConversionContext::for_playback(&from, &to, bounds);
        let mut ring = vec![0u8; ring_bytes];
        let mut cursor = 0;
        let a = play(&mut ctx, &from, &to, &src[..split], &mut ring, &mut cursor).unwrap();
        let b = play(&mut ctx, &from, &to, &src[split..], &mut ring, &mut cursor).unwrap();
        assert_eq!(a.consumed + b.consumed, src.len());
        assert_eq!(&ring[..a.produced + b.produced], &whole[..], "split at {}", split);
    }
}

/// Record a ring holding `samples` whole, then split at each of `splits`.
fn assert_record_split_invariant(app: AudioFormat, hw: AudioFormat, samples: &[i16], splits: &[usize]) {
    let ring = le16(samples);
    let bounds = RingBounds::new(0, ring.len()).unwrap();
    let out_bytes = samples.len() * 16;

    let mut ctx = ConversionContext::for_record(&app, &hw, bounds);
    let mut cursor = 0;
    let mut whole = vec![0u8; out_bytes];
    let t = record(&mut ctx, &app, &hw, &ring, &mut cursor, ring.len(), &mut whole).unwrap();
    assert_eq!(t.consumed, ring.len());
    whole.truncate(t.produced);

    for &split in splits {
        let mut ctx = ConversionContext::for_record(&app, &hw, bounds);
        let mut cursor = 0;
        let mut out = vec![0u8; out_bytes];
        let a = record(&mut ctx, &app, &hw, &ring, &mut cursor, split, &mut out).unwrap();
        let rest = ring.len() - a.consumed;
        let b = record(&mut ctx, &app, &hw, &ring, &mut cursor, rest, &mut out[a.produced..])
            .unwrap();
        assert_eq!(a.consumed + b.consumed, ring.len());
        assert_eq!(&out[..a.produced + b.produced], &whole[..], "split at {}", split);
    }
}

#[test]
fn playback_upsample_split_matches_single_call() {
    let samples: Vec<i16> = (0..400).map(|i| ((i * 211) % 6000 - 3000) as i16).collect();
    assert_playback_split_invariant(
        AudioFormat::slinear_le(44100, 2, 16),
        AudioFormat::slinear_be(48000, 1, 24),
        &le16(&samples),
        &[4, 40, 404, 796],
    );
}

#[test]
fn playback_downsample_split_matches_single_call() {
    let samples: Vec<i16> = (0..480).map(|i| ((i * 173) % 5000 - 2500) as i16).collect();
    assert_playback_split_invariant(
        AudioFormat::slinear_le(48000, 2, 16),
        AudioFormat::slinear_le(44100, 2, 16),
        &le16(&samples),
        &[4, 44, 400, 956],
    );
}

#[test]
fn record_upsample_split_matches_single_call() {
    let samples: Vec<i16> = (0..64).map(|i| (i * 100 - 3200) as i16).collect();
    assert_record_split_invariant(
        AudioFormat::slinear_le(48000, 2, 16),
        AudioFormat::slinear_le(16000, 1, 16),
        &samples,
        &[2, 30, 64, 126],
    );
}

#[test]
fn record_downsample_split_matches_single_call() {
    let samples: Vec<i16> = (0..256).map(|i| ((i * 37) % 2000 - 1000) as i16).collect();
    assert_record_split_invariant(
        AudioFormat::slinear_le(16000, 1, 16),
        AudioFormat::slinear_le(44100, 2, 16),
        &samples,
        &[4, 12, 200, 508],
    );
}

#[test]
fn unimplemented_hardware_coding_is_reported() {
    let from = AudioFormat::slinear_le(44100, 2, 16);
    let to = AudioFormat::new(48000, 2, 16, Encoding::Ulaw);
    let bounds = RingBounds::new(0, 64).unwrap();
    let mut ctx = ConversionContext::for_playback(&from, &to, bounds);
    let before = ctx.clone();
    let mut ring = vec![0u8; 64];
    let mut cursor = 0;

    let err = play(&mut ctx, &from, &to, &le16(&[1, 2]), &mut ring, &mut cursor).unwrap_err();
    assert_eq!(
        err,
        ConvertError::UnimplementedConversion { encoding: Encoding::Ulaw, precision: 16 }
    );
    assert_eq!(ctx, before);
    assert_eq!(cursor, 0);
}
