//! Real-time sample-rate and channel conversion engine for srx.
//!
//! Converts interleaved signed linear PCM between an application-side
//! format and a hardware-side format stored in a ring buffer, a bounded
//! chunk at a time. Calls never allocate or block; the per-stream
//! [`ConversionContext`] carries phase and interpolation history from one
//! call to the next.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod context;
mod error;
mod play;
mod record;
mod resample;
pub mod ring;
mod validate;

pub use context::ConversionContext;
pub use error::{ConvertError, InvalidReason};
pub use play::play;
pub use record::record;
pub use resample::Transfer;
pub use ring::{RingBounds, RingBuffer};
pub use validate::validate;
