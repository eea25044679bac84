// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::box_collection)] // Warns on boxed `Vec`, `String`, etc.
#![warn(clippy::vec_box)] // Avoids using `Vec<Box<T>>` when unnecessary
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_safety_doc)] // Docs for `unsafe` functions
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # wavcodec
//!
//! Streaming RIFF/WAVE sample codec with a closed set of typed sample
//! variants.
//!
//! ## Overview
//!
//! Audio moves through the crate as slices of one of seven element types
//! (`u8`, `i16`, `i32`, `f32`, `f64`, μ-law, A-law). Decoders fill slices of
//! any variant from a byte source and encoders drain slices of any variant to
//! a byte sink, converting on the way. When the slice variant matches the
//! stream's own encoding no conversion happens and every sample survives
//! bit for bit.
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! wavcodec = "0.1.0"
//! ```
//!
//! ## Modules
//!
//! - [`wav`]: RIFF/WAVE decoder and encoder
//! - [`streaming`]: reader/writer traits, [`SampleBuffer`] and [`copy`]
//! - [`registry`]: open a stream by sniffing its magic bytes
//! - [`conversions`]: bulk conversion between slice variants
//! - [`companding`]: G.711 μ-law and A-law tables
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Cursor;
//! use wavcodec::wav::{WavDecoder, WavEncoder};
//! use wavcodec::{AudioError, Config, SampleFormat, Samples};
//!
//! let config = Config::new(2, 44_100).unwrap();
//! let mut signal = Samples::new(SampleFormat::Float32, 8);
//! for i in 0..signal.len() {
//!     signal.set(i, i as f64 / 8.0);
//! }
//!
//! let mut encoder = WavEncoder::new(Cursor::new(Vec::new()), config).unwrap();
//! encoder.write(&signal.as_slice()).unwrap();
//! encoder.close().unwrap();
//!
//! let decoder = WavDecoder::new_seekable(encoder.into_inner().unwrap()).unwrap();
//! assert_eq!(decoder.config(), config);
//!
//! let mut decoded = Samples::new(SampleFormat::Int16, 16);
//! match decoder.read(&mut decoded.as_mut_slice()) {
//!     Err(AudioError::EndOfStream { read }) => assert_eq!(read, 8),
//!     other => panic!("expected end of stream, got {other:?}"),
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`AudioResult`]. The end of a stream is
//! reported as [`AudioError::EndOfStream`], which carries the number of
//! samples that were stored before the end was reached.
//!
//! ## Logging
//!
//! The codecs emit [`tracing`] events: `debug` for header parsing and
//! finalization, `trace` per read and write, `warn` for recoverable format
//! irregularities. Install any `tracing` subscriber to see them.

pub mod companding;
mod config;
pub mod conversions;
mod error;
pub mod registry;
mod repr;
pub mod streaming;
/// Core traits for sample element types.
pub mod traits;
pub mod wav;

pub use crate::config::Config;
pub use crate::error::{AudioError, AudioResult};
pub use crate::repr::{SampleFormat, Samples, SliceMut, SliceRef};
pub use crate::streaming::{Decoder, Encoder, Reader, SampleBuffer, Writer, copy};
pub use crate::traits::{ALaw, MuLaw, Sample};
pub use crate::wav::{Encoding, WavDecoder, WavEncoder};

/// Short names of the supported sample variants.
pub const SUPPORTED_FORMATS: [&str; 7] = ["u8", "i16", "i32", "f32", "f64", "mulaw", "alaw"];
