//! PCM format descriptors and sample codecs for srx.
//!
//! This crate defines the vocabulary shared by the conversion engine and
//! its collaborators: stream format descriptors, the per-width/byte-order
//! sample codecs, and the fixed-capacity working frame.
//!
//! Designed to be `no_std` compatible.

#![cfg_attr(not(feature = "std"), no_std)]

mod codec;
mod format;
mod frame;

pub use codec::{CodecKind, SampleCodec, S16Be, S16Le, S24Be, S24Le};
pub use format::{AudioFormat, Encoding};
pub use frame::{SampleFrame, MAX_CHANNELS};
