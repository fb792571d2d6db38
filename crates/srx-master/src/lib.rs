//! Stream channel layer for srx.
//!
//! Plays the part of the driver around the engine: negotiates a format
//! pair once, owns the hardware ring and its cursors, serializes engine
//! calls per stream, and offers offline helpers that both the CLI and tests
//! share.

mod channel;
mod offline;

pub use channel::{Channel, ChannelConfig, ChannelError, Direction};
pub use offline::{convert_playback, convert_record, DEFAULT_CHUNK_BYTES};

// Re-export common types so callers don't need srx-format/srx-engine directly.
pub use srx_engine::{ConvertError, Transfer};
pub use srx_format::{AudioFormat, Encoding};
