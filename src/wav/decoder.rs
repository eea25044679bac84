//! Streaming WAV decoder.

use i24::I24;
use parking_lot::RwLock;
use std::io::{self, Read, Seek, SeekFrom};
use tracing::{debug, trace, warn};

use super::chunks::{self, ChunkHeader, FactChunk, FmtChunk};
use super::encoding::Encoding;
use super::ids;
use crate::streaming::traits::{Decoder, Reader};
use crate::{AudioError, AudioResult, Config, Sample, SliceMut};

type SeekFn<R> = fn(&mut R, SeekFrom) -> io::Result<u64>;

/// Decodes interleaved samples from a RIFF/WAVE byte source.
///
/// The header is parsed eagerly by [`WavDecoder::new`], leaving the source
/// positioned at the first payload byte. Reads then pull samples on demand
/// and convert them to whatever variant the caller's slice holds.
///
/// All methods take `&self`: reads and seeks hold an exclusive lock for
/// their whole duration, config queries a shared one, so a decoder can be
/// shared across threads when `R` is `Send + Sync`.
///
/// ```rust
/// use std::io::Cursor;
/// use wavcodec::wav::{WavDecoder, WavEncoder};
/// use wavcodec::{AudioError, Config, SliceMut, SliceRef};
///
/// let mut encoder = WavEncoder::new(Cursor::new(Vec::new()), Config::new(1, 8_000).unwrap()).unwrap();
/// encoder.write(&SliceRef::from(&[1i16, 2, 3][..])).unwrap();
/// encoder.close().unwrap();
///
/// let decoder = WavDecoder::new_seekable(encoder.into_inner().unwrap()).unwrap();
/// let mut out = [0i16; 4];
/// let err = decoder.read(&mut SliceMut::from(&mut out[..])).unwrap_err();
/// assert!(matches!(err, AudioError::EndOfStream { read: 3 }));
/// assert_eq!(out[..3], [1, 2, 3]);
///
/// decoder.seek(2).unwrap();
/// let mut last = [0i16; 1];
/// decoder.read(&mut SliceMut::from(&mut last[..])).unwrap();
/// assert_eq!(last, [3]);
/// ```
pub struct WavDecoder<R> {
    state: RwLock<DecoderState<R>>,
}

struct DecoderState<R> {
    source: R,
    seek_fn: Option<SeekFn<R>>,
    /// Source position at construction; seek targets are relative to it.
    origin: u64,
    fmt: FmtChunk,
    fact: Option<FactChunk>,
    encoding: Encoding,
    config: Config,
    /// Declared payload length in bytes, 0 when unknown.
    chunk_size: u64,
    /// Bytes between `origin` and the first payload byte.
    data_chunk_begin: u64,
    /// Payload bytes consumed so far.
    current_count: u64,
    scratch: Vec<u8>,
}

/// Everything the header walk learns before the payload starts.
struct Header {
    fmt: FmtChunk,
    fact: Option<FactChunk>,
    encoding: Encoding,
    config: Config,
    data_len: u32,
    data_offset: u64,
}

impl<R: Read> WavDecoder<R> {
    /// Parses the header of a forward-only source. [`seek`](Self::seek) is a
    /// no-op on the resulting decoder.
    ///
    /// # Errors
    /// [`AudioError::InvalidData`] for a malformed container,
    /// [`AudioError::Unsupported`] for an encoding outside the supported
    /// set and [`AudioError::Io`] when the source fails or ends before the
    /// `data` chunk.
    pub fn new(source: R) -> AudioResult<Self> {
        Self::build(source, None, 0)
    }

    fn build(mut source: R, seek_fn: Option<SeekFn<R>>, origin: u64) -> AudioResult<Self> {
        let header = parse_header(&mut source)?;
        debug!(
            encoding = %header.encoding,
            config = %header.config,
            data_len = header.data_len,
            data_offset = header.data_offset,
            seekable = seek_fn.is_some(),
            "Opened WAV stream"
        );
        Ok(Self {
            state: RwLock::new(DecoderState {
                source,
                seek_fn,
                origin,
                fmt: header.fmt,
                fact: header.fact,
                encoding: header.encoding,
                config: header.config,
                chunk_size: header.data_len as u64,
                data_chunk_begin: header.data_offset,
                current_count: 0,
                scratch: Vec::new(),
            }),
        })
    }

    /// Reads up to `buf.len()` samples into `buf`, converting to its variant.
    ///
    /// Returns the number of samples stored. Once the payload is exhausted
    /// the result is [`AudioError::EndOfStream`] carrying the number of
    /// samples stored by this call; every later call reports the same with
    /// `read: 0`.
    ///
    /// # Errors
    /// [`AudioError::Io`] of kind `UnexpectedEof` when the source ends
    /// inside a sample or before the declared length of the data chunk.
    pub fn read(&self, buf: &mut SliceMut<'_>) -> AudioResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.state.write().read(buf)
    }

    /// Channel count and sample rate from the format chunk.
    pub fn config(&self) -> Config {
        self.state.read().config
    }

    /// On-disk encoding of the payload.
    pub fn encoding(&self) -> Encoding {
        self.state.read().encoding
    }

    /// Declared bits per sample.
    pub fn bits_per_sample(&self) -> u16 {
        self.state.read().fmt.bits_per_sample
    }

    /// The parsed format chunk.
    pub fn format_info(&self) -> FmtChunk {
        self.state.read().fmt
    }

    /// The parsed fact chunk, if the file has one.
    pub fn fact(&self) -> Option<FactChunk> {
        self.state.read().fact
    }

    /// Number of interleaved samples in the payload, `None` when the data
    /// chunk declares no length.
    pub fn total_samples(&self) -> Option<u64> {
        let state = self.state.read();
        (state.chunk_size > 0).then(|| state.chunk_size / state.encoding.bytes_per_sample() as u64)
    }

    /// Index of the next interleaved sample to be read.
    pub fn position(&self) -> u64 {
        let state = self.state.read();
        state.current_count / state.encoding.bytes_per_sample() as u64
    }

    /// Positions the stream so the next read starts at interleaved sample
    /// `sample`.
    ///
    /// Does nothing for decoders built with [`WavDecoder::new`]. Seeking past
    /// the declared payload stops at its end, so the next read reports end
    /// of stream.
    ///
    /// # Errors
    /// [`AudioError::Io`] of kind `InvalidInput` when the payload length is
    /// unknown and the target offset does not fit 64 bits, or whatever the
    /// source's own seek reports.
    pub fn seek(&self, sample: u64) -> AudioResult<()> {
        let mut state = self.state.write();
        let Some(seek_fn) = state.seek_fn else {
            debug!(sample, "Ignoring seek on forward-only source");
            return Ok(());
        };
        let mut offset = sample
            .checked_mul(state.encoding.bytes_per_sample() as u64)
            .unwrap_or(u64::MAX);
        if state.chunk_size > 0 {
            offset = offset.min(state.chunk_size);
        }
        let target = state
            .origin
            .checked_add(state.data_chunk_begin)
            .and_then(|begin| begin.checked_add(offset))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("seek to sample {sample} overflows the stream offset"),
                )
            })?;
        seek_fn(&mut state.source, SeekFrom::Start(target))?;
        state.current_count = offset;
        trace!(sample, target, "Seeked WAV stream");
        Ok(())
    }

    /// Releases the byte source.
    pub fn into_inner(self) -> R {
        self.state.into_inner().source
    }
}

impl<R: Read + Seek> WavDecoder<R> {
    /// Parses the header of a seekable source, enabling
    /// [`seek`](Self::seek).
    ///
    /// The header may start anywhere; seek targets are taken relative to the
    /// source position at the time of the call.
    pub fn new_seekable(mut source: R) -> AudioResult<Self> {
        let origin = source.stream_position()?;
        let seek_fn: SeekFn<R> = <R as Seek>::seek;
        Self::build(source, Some(seek_fn), origin)
    }
}

impl<R> std::fmt::Debug for WavDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("WavDecoder")
            .field("encoding", &state.encoding)
            .field("config", &state.config)
            .field("chunk_size", &state.chunk_size)
            .field("current_count", &state.current_count)
            .field("seekable", &state.seek_fn.is_some())
            .finish()
    }
}

impl<R: Read> DecoderState<R> {
    /// Reserves payload bytes for up to `count` samples of `width` bytes and
    /// returns how many samples fit before the declared chunk end.
    fn advance(&mut self, width: usize, count: usize) -> usize {
        let fit = if self.chunk_size > 0 {
            let remaining = self.chunk_size.saturating_sub(self.current_count) / width as u64;
            count.min(usize::try_from(remaining).unwrap_or(usize::MAX))
        } else {
            count
        };
        self.current_count += (fit * width) as u64;
        fit
    }

    fn read(&mut self, buf: &mut SliceMut<'_>) -> AudioResult<usize> {
        let width = self.encoding.bytes_per_sample();
        let wanted = self.advance(width, buf.len());
        let reserved = wanted * width;

        let native = cfg!(target_endian = "little")
            && self.encoding != Encoding::PcmI24
            && buf.format() == self.encoding.native_format();

        let filled = if native {
            fill(&mut self.source, &mut buf.as_bytes_mut()[..reserved])?
        } else {
            self.scratch.resize(reserved, 0);
            let filled = fill(&mut self.source, &mut self.scratch)?;
            decode_into(self.encoding, &self.scratch[..filled - filled % width], buf);
            filled
        };

        let read = filled / width;
        if filled < reserved {
            self.current_count -= (reserved - filled) as u64;
            if filled % width != 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("source ended inside a {width}-byte sample"),
                )
                .into());
            }
            if self.chunk_size > 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "data chunk ended after {} of {} declared bytes",
                        self.current_count, self.chunk_size
                    ),
                )
                .into());
            }
            trace!(read, "Reached end of unsized WAV data chunk");
            return Err(AudioError::EndOfStream { read });
        }

        trace!(read, position = self.current_count, "Read WAV samples");
        if read < buf.len() {
            trace!(read, "Reached end of WAV data chunk");
            return Err(AudioError::EndOfStream { read });
        }
        Ok(read)
    }
}

/// Reads until `bytes` is full or the source ends; returns the bytes filled.
fn fill<R: Read + ?Sized>(source: &mut R, bytes: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < bytes.len() {
        match source.read(&mut bytes[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Decodes whole samples of `bytes` into the front of `dst`.
fn decode_into(encoding: Encoding, bytes: &[u8], dst: &mut SliceMut<'_>) {
    match encoding {
        Encoding::PcmU8 => decode_as(bytes, dst, |raw: [u8; 1]| raw[0]),
        Encoding::PcmI16 => decode_as(bytes, dst, i16::from_le_bytes),
        Encoding::PcmI24 => decode_as(bytes, dst, |raw: [u8; 3]| I24::from_le_bytes(raw).to_i32()),
        Encoding::PcmI32 => decode_as(bytes, dst, i32::from_le_bytes),
        Encoding::Float32 => decode_as(bytes, dst, f32::from_le_bytes),
        Encoding::Float64 => decode_as(bytes, dst, f64::from_le_bytes),
        Encoding::MuLaw => decode_as(bytes, dst, |raw: [u8; 1]| crate::MuLaw(raw[0])),
        Encoding::ALaw => decode_as(bytes, dst, |raw: [u8; 1]| crate::ALaw(raw[0])),
    }
}

fn decode_as<T: Sample, const N: usize>(
    bytes: &[u8],
    dst: &mut SliceMut<'_>,
    decode: impl Fn([u8; N]) -> T,
) {
    let mut raw = [0u8; N];
    for (i, chunk) in bytes.chunks_exact(N).enumerate() {
        raw.copy_from_slice(chunk);
        decode(raw).store(dst, i);
    }
}

/// Walks the chunk list up to the start of the `data` payload.
fn parse_header<R: Read + ?Sized>(source: &mut R) -> AudioResult<Header> {
    let riff = ChunkHeader::read(source)?;
    if riff.id != ids::RIFF {
        return Err(AudioError::invalid_data(format!(
            "missing RIFF signature, found {:?}",
            riff.id_str()
        )));
    }
    let form: [u8; 4] = chunks::read_array(source)?;
    if form != ids::WAVE {
        return Err(AudioError::invalid_data(format!(
            "RIFF form type is {:?}, not WAVE",
            String::from_utf8_lossy(&form)
        )));
    }

    let mut offset = (ChunkHeader::SIZE + 4) as u64;
    let mut format: Option<(FmtChunk, Encoding, Config)> = None;
    let mut fact = None;

    loop {
        let chunk = ChunkHeader::read(source)?;
        offset += ChunkHeader::SIZE as u64;

        match chunk.id {
            ids::FMT => {
                if format.is_some() {
                    warn!("Duplicate fmt chunk, later one wins");
                }
                let payload = chunks::read_payload(source, chunk.len)?;
                format = Some(parse_fmt(&payload)?);
            }
            ids::FACT => {
                let payload = chunks::read_payload(source, chunk.len)?;
                fact = Some(FactChunk::from_bytes(&payload)?);
            }
            ids::DATA => {
                let Some((fmt, encoding, config)) = format else {
                    return Err(AudioError::invalid_data("data chunk precedes fmt chunk"));
                };
                return Ok(Header {
                    fmt,
                    fact,
                    encoding,
                    config,
                    data_len: chunk.len,
                    data_offset: offset,
                });
            }
            _ => {
                debug!(id = %chunk.id_str(), len = chunk.len, "Skipping chunk");
                chunks::skip(source, chunk.len as u64)?;
            }
        }

        if chunk.len & 1 == 1 {
            chunks::skip(source, 1)?;
        }
        offset += chunk.padded_len();
    }
}

fn parse_fmt(payload: &[u8]) -> AudioResult<(FmtChunk, Encoding, Config)> {
    let fmt = FmtChunk::from_bytes(payload)?;
    let encoding = Encoding::from_format(fmt.format_tag, fmt.bits_per_sample)?;
    if fmt.channels == 0 {
        return Err(AudioError::invalid_data("fmt chunk declares zero channels"));
    }
    if fmt.sample_rate == 0 {
        return Err(AudioError::invalid_data("fmt chunk declares a zero sample rate"));
    }
    let expected_align = fmt.channels as usize * encoding.bytes_per_sample();
    if fmt.block_align as usize != expected_align {
        warn!(
            declared = fmt.block_align,
            expected = expected_align,
            "fmt block align mismatch, using bits per sample"
        );
    }
    let config = Config {
        channels: fmt.channels as usize,
        sample_rate: fmt.sample_rate as usize,
    };
    Ok((fmt, encoding, config))
}

impl<R: Read> Reader for WavDecoder<R> {
    fn read(&mut self, buf: &mut SliceMut<'_>) -> AudioResult<usize> {
        WavDecoder::read(&*self, buf)
    }
}

impl<R: Read> Reader for &WavDecoder<R> {
    fn read(&mut self, buf: &mut SliceMut<'_>) -> AudioResult<usize> {
        WavDecoder::read(&**self, buf)
    }
}

impl<R: Read> Decoder for WavDecoder<R> {
    fn config(&self) -> Config {
        WavDecoder::config(self)
    }

    fn seek(&mut self, sample: u64) -> AudioResult<()> {
        WavDecoder::seek(&*self, sample)
    }
}
