//! In-memory sample buffering and stream pumping.

use crate::streaming::traits::{Reader, Writer};
use crate::{AudioError, AudioResult, SampleFormat, Samples, SliceMut, SliceRef};

/// Samples moved per step by [`copy`] and [`SampleBuffer::read_from`].
pub const COPY_CHUNK_LEN: usize = 32 * 1024;

/// A growable FIFO of samples of one variant.
///
/// Writes append at the back, reads consume from the front. The variant is
/// fixed at construction; writes of other variants are converted on the way
/// in.
///
/// ```rust
/// use wavcodec::{Reader, SampleBuffer, SampleFormat, SliceMut, SliceRef, Writer};
///
/// let mut buffer = SampleBuffer::new(SampleFormat::Int16);
/// buffer.write(&SliceRef::from(&[0.5f64, -1.0][..])).unwrap();
///
/// let mut out = [0i16; 2];
/// assert_eq!(buffer.read(&mut SliceMut::from(&mut out[..])).unwrap(), 2);
/// assert_eq!(out, [16384, i16::MIN]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Samples,
    read_pos: usize,
}

impl SampleBuffer {
    /// Creates an empty buffer holding `format` samples.
    pub fn new(format: SampleFormat) -> Self {
        Self::from_samples(Samples::new(format, 0))
    }

    /// Creates a buffer whose unread content is `samples`.
    pub const fn from_samples(samples: Samples) -> Self {
        Self {
            samples,
            read_pos: 0,
        }
    }

    /// Variant of the stored samples.
    pub fn format(&self) -> SampleFormat {
        self.samples.format()
    }

    /// Number of unread samples.
    pub fn len(&self) -> usize {
        self.samples.len() - self.read_pos
    }

    /// Returns true if every sample has been read.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View of the unread samples.
    pub fn samples(&self) -> SliceRef<'_> {
        self.samples.slice(self.read_pos, self.samples.len())
    }

    /// Consumes the buffer, returning the unread samples.
    pub fn into_samples(mut self) -> Samples {
        if self.read_pos > 0 {
            let unread = self.samples().to_samples();
            self.samples = unread;
        }
        self.samples
    }

    /// Reads `src` to its end, appending everything in this buffer's variant.
    ///
    /// Samples are decoded straight into the buffer's storage, so no
    /// intermediate variant is involved. Returns the number of samples
    /// appended.
    pub fn read_from<R: Reader + ?Sized>(&mut self, src: &mut R) -> AudioResult<u64> {
        let mut total = 0u64;
        loop {
            let start = self.samples.len();
            self.samples.resize(start + COPY_CHUNK_LEN);
            let result = src.read(&mut self.samples.slice_mut(start, start + COPY_CHUNK_LEN));
            let (read, done) = match result {
                Ok(read) => (read, read == 0),
                Err(AudioError::EndOfStream { read }) => (read, true),
                Err(e) => {
                    self.samples.resize(start);
                    return Err(e);
                }
            };
            self.samples.resize(start + read);
            total += read as u64;
            if done {
                return Ok(total);
            }
        }
    }
}

impl Reader for SampleBuffer {
    fn read(&mut self, buf: &mut SliceMut<'_>) -> AudioResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.is_empty() {
            return Err(AudioError::EndOfStream { read: 0 });
        }
        let n = self.samples().copy_to(buf);
        self.read_pos += n;
        Ok(n)
    }
}

impl Writer for SampleBuffer {
    fn write(&mut self, buf: &SliceRef<'_>) -> AudioResult<usize> {
        self.samples.extend_from(buf);
        Ok(buf.len())
    }
}

impl From<Samples> for SampleBuffer {
    fn from(samples: Samples) -> Self {
        Self::from_samples(samples)
    }
}

/// Copies from `src` to `dst` until `src` reaches its end.
///
/// Samples pass through an `f64` staging slice, which every variant converts
/// to and from without loss. Returns the number of samples copied.
pub fn copy<W, R>(dst: &mut W, src: &mut R) -> AudioResult<u64>
where
    W: Writer + ?Sized,
    R: Reader + ?Sized,
{
    let mut staging = Samples::new(SampleFormat::Float64, COPY_CHUNK_LEN);
    let mut total = 0u64;
    loop {
        let (read, done) = match src.read(&mut staging.as_mut_slice()) {
            Ok(read) => (read, read == 0),
            Err(AudioError::EndOfStream { read }) => (read, true),
            Err(e) => return Err(e),
        };
        if read > 0 {
            let written = dst.write(&staging.slice(0, read))?;
            total += written as u64;
            if written < read {
                return Err(std::io::Error::from(std::io::ErrorKind::WriteZero).into());
            }
        }
        if done {
            return Ok(total);
        }
    }
}
