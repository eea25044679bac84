//! Tests for the streaming interfaces.
//!
//! Covers the in-memory buffer and the reader-to-writer pump.

use crate::{SampleFormat, Samples};

mod copy_tests;

/// Ramp of `len` samples spanning `-1.0..1.0` in the given variant.
pub(crate) fn ramp(format: SampleFormat, len: usize) -> Samples {
    let mut samples = Samples::new(format, len);
    for i in 0..len {
        samples.set(i, 2.0 * i as f64 / len as f64 - 1.0);
    }
    samples
}
