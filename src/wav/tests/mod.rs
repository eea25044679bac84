//! Tests for the WAV codec.
//!
//! Hand-built files pin down the byte layout; encoder output fed back into
//! the decoder checks round-trip fidelity.

use std::io::Cursor;

use crate::wav::{Encoding, WavDecoder, WavEncoder};
use crate::{Config, SampleBuffer, SampleFormat, Samples};


/// A 16-byte `fmt ` payload.
pub(crate) fn fmt_payload(tag: u16, channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
    let block_align = channels * (bits / 8);
    let mut payload = Vec::with_capacity(16);
    payload.extend_from_slice(&tag.to_le_bytes());
    payload.extend_from_slice(&channels.to_le_bytes());
    payload.extend_from_slice(&sample_rate.to_le_bytes());
    payload.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    payload.extend_from_slice(&block_align.to_le_bytes());
    payload.extend_from_slice(&bits.to_le_bytes());
    payload
}

/// A RIFF/WAVE file made of `chunks`, each padded to an even length.
pub(crate) fn riff(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut body = b"WAVE".to_vec();
    for (id, payload) in chunks {
        body.extend_from_slice(*id);
        body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        body.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            body.push(0);
        }
    }
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend(body);
    bytes
}

/// Sine sweep of `len` samples in the given variant.
pub(crate) fn test_signal(format: SampleFormat, len: usize) -> Samples {
    let mut samples = Samples::new(format, len);
    for i in 0..len {
        let t = i as f64 / len as f64;
        samples.set(i, (t * 40.0 * std::f64::consts::PI * (1.0 + t)).sin() * 0.9);
    }
    samples
}

/// Encodes `samples` with `writes` calls of roughly equal size.
pub(crate) fn encode(samples: &Samples, config: Config, encoding: Encoding, writes: usize) -> Vec<u8> {
    let mut encoder = WavEncoder::with_encoding(Cursor::new(Vec::new()), config, encoding).unwrap();
    let chunk = samples.len().div_ceil(writes).max(1);
    let mut start = 0;
    while start < samples.len() {
        let end = (start + chunk).min(samples.len());
        assert_eq!(encoder.write(&samples.slice(start, end)).unwrap(), end - start);
        start = end;
    }
    encoder.close().unwrap();
    encoder.into_inner().unwrap().into_inner()
}

/// Decodes every sample of `bytes` into `format`.
pub(crate) fn decode_all(bytes: &[u8], format: SampleFormat) -> Samples {
    let mut decoder = WavDecoder::new(bytes).unwrap();
    let mut buffer = SampleBuffer::new(format);
    buffer.read_from(&mut decoder).unwrap();
    buffer.into_samples()
}
