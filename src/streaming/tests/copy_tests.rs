//! Tests for `copy`.

use super::ramp;
use crate::{
    AudioError, AudioResult, Reader, SampleBuffer, SampleFormat, Samples, SliceMut, SliceRef,
    Writer, copy,
};

/// Writer that accepts at most `limit` samples per call.
struct ShortWriter {
    limit: usize,
}

impl Writer for ShortWriter {
    fn write(&mut self, buf: &SliceRef<'_>) -> AudioResult<usize> {
        Ok(buf.len().min(self.limit))
    }
}

/// Reader that fails after its first chunk.
struct FailingReader {
    served: bool,
}

impl Reader for FailingReader {
    fn read(&mut self, buf: &mut SliceMut<'_>) -> AudioResult<usize> {
        if self.served {
            return Err(AudioError::invalid_data("broken source"));
        }
        self.served = true;
        buf.set(0, 0.5);
        Ok(1)
    }
}

#[test]
fn test_copy_moves_every_sample() {
    for format in SampleFormat::ALL {
        let source = ramp(format, 100_000);
        // The staging pass folds μ-law negative zero into positive zero.
        let mut expected = source.make(source.len());
        for i in 0..source.len() {
            expected.set(i, source.at(i));
        }

        let mut src = SampleBuffer::from(source);
        let mut dst = SampleBuffer::new(format);
        assert_eq!(copy(&mut dst, &mut src).unwrap(), 100_000, "{format}");
        assert_eq!(dst.into_samples(), expected, "{format}");
    }
}

#[test]
fn test_copy_converts_variants() {
    let mut src = SampleBuffer::from(Samples::from(vec![i16::MIN, 0, i16::MAX]));
    let mut dst = SampleBuffer::new(SampleFormat::Float64);
    copy(&mut dst, &mut src).unwrap();
    assert_eq!(dst.samples(), SliceRef::Float64(&[-1.0, 0.0, 1.0]));
}

#[test]
fn test_copy_from_empty_reader() {
    let mut src = SampleBuffer::new(SampleFormat::Uint8);
    let mut dst = SampleBuffer::new(SampleFormat::Uint8);
    assert_eq!(copy(&mut dst, &mut src).unwrap(), 0);
    assert!(dst.is_empty());
}

#[test]
fn test_copy_reports_short_write() {
    let mut src = SampleBuffer::from(Samples::from(vec![0i16; 10]));
    let mut dst = ShortWriter { limit: 4 };
    let err = copy(&mut dst, &mut src).unwrap_err();
    assert!(matches!(err, AudioError::Io(ref e) if e.kind() == std::io::ErrorKind::WriteZero));
}

#[test]
fn test_copy_propagates_reader_errors() {
    let mut src = FailingReader { served: false };
    let mut dst = SampleBuffer::new(SampleFormat::Float64);
    let err = copy(&mut dst, &mut src).unwrap_err();
    assert!(matches!(err, AudioError::InvalidData(_)));
}
