//! Streaming sample I/O.
//!
//! This module provides the pull/push interfaces every codec in the crate
//! implements, plus an in-memory buffer that speaks both:
//!
//! - [`Reader`] / [`Writer`]: fill and drain caller-provided slices
//! - [`Decoder`] / [`Encoder`]: readers and writers bound to a container,
//!   with a stream [`Config`](crate::Config), seeking and finalization
//! - [`SampleBuffer`]: growable FIFO of one sample variant
//! - [`copy`]: pumps a reader into a writer until the end of the stream
//!
//! # Example
//!
//! ```rust
//! use wavcodec::{copy, SampleBuffer, SampleFormat, Samples};
//!
//! let mut src = SampleBuffer::from(Samples::from(vec![0u8, 128, 255]));
//! let mut dst = SampleBuffer::new(SampleFormat::Float32);
//! assert_eq!(copy(&mut dst, &mut src).unwrap(), 3);
//! assert_eq!(dst.samples().at(2), 1.0);
//! ```

pub mod buffers;
pub mod traits;

#[cfg(test)]
mod tests;

pub use buffers::{COPY_CHUNK_LEN, SampleBuffer, copy};
pub use traits::{Decoder, Encoder, Reader, Writer};
