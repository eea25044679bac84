//! Core traits for streaming sample I/O.
//!
//! Readers fill caller-provided slices and writers drain them. Every slice
//! variant is accepted on both sides; conversion to and from the stream's
//! own encoding happens inside the implementation.

use crate::{AudioResult, Config, SliceMut, SliceRef};

/// A source of interleaved samples.
pub trait Reader {
    /// Reads up to `buf.len()` samples into `buf`.
    ///
    /// Returns the number of samples stored. When the stream ends the result
    /// is [`AudioError::EndOfStream`](crate::AudioError::EndOfStream), which
    /// carries how many samples were stored before the end was reached.
    /// `Ok(0)` is only returned for an empty `buf`.
    fn read(&mut self, buf: &mut SliceMut<'_>) -> AudioResult<usize>;
}

/// A sink of interleaved samples.
pub trait Writer {
    /// Writes every sample of `buf`, returning how many were written.
    fn write(&mut self, buf: &SliceRef<'_>) -> AudioResult<usize>;
}

/// A [`Reader`] over an audio container.
pub trait Decoder: Reader {
    /// Channel count and sample rate of the stream.
    fn config(&self) -> Config;

    /// Positions the stream so the next read starts at interleaved sample
    /// `sample`.
    ///
    /// Sources that cannot seek ignore the request.
    fn seek(&mut self, sample: u64) -> AudioResult<()> {
        let _ = sample;
        Ok(())
    }
}

/// A [`Writer`] that produces an audio container.
pub trait Encoder: Writer {
    /// Finalizes the container. Writes after `close` fail with
    /// [`AudioError::Closed`](crate::AudioError::Closed).
    fn close(&mut self) -> AudioResult<()>;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    fn read(&mut self, buf: &mut SliceMut<'_>) -> AudioResult<usize> {
        (**self).read(buf)
    }
}

impl<R: Reader + ?Sized> Reader for Box<R> {
    fn read(&mut self, buf: &mut SliceMut<'_>) -> AudioResult<usize> {
        (**self).read(buf)
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn write(&mut self, buf: &SliceRef<'_>) -> AudioResult<usize> {
        (**self).write(buf)
    }
}

impl<W: Writer + ?Sized> Writer for Box<W> {
    fn write(&mut self, buf: &SliceRef<'_>) -> AudioResult<usize> {
        (**self).write(buf)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn config(&self) -> Config {
        (**self).config()
    }

    fn seek(&mut self, sample: u64) -> AudioResult<()> {
        (**self).seek(sample)
    }
}
