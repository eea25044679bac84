//! Streaming WAV encoder.

use std::io::{self, Seek, SeekFrom, Write};
use tracing::{debug, trace};

use super::chunks::{ChunkHeader, FactChunk, FmtChunk};
use super::encoding::Encoding;
use super::ids;
use crate::streaming::traits::{Encoder, Writer};
use crate::{AudioError, AudioResult, Config, SliceRef};

/// Writes interleaved samples as a RIFF/WAVE file.
///
/// The header is written up front with placeholder lengths that
/// [`close`](Self::close) patches once the payload size is known, so the
/// sink must be seekable. Dropping an encoder without closing it leaves a
/// file whose lengths are zero, which decoders read as "unknown length".
///
/// ```rust
/// use std::io::Cursor;
/// use wavcodec::wav::{Encoding, WavEncoder};
/// use wavcodec::{AudioError, Config, SliceRef};
///
/// let config = Config::new(2, 44_100).unwrap();
/// let mut encoder = WavEncoder::new(Cursor::new(Vec::new()), config).unwrap();
/// assert_eq!(encoder.encoding(), Encoding::PcmI16);
///
/// encoder.write(&SliceRef::from(&[0.0f32, 0.5, -0.5, 1.0][..])).unwrap();
/// encoder.close().unwrap();
/// assert!(matches!(encoder.write(&SliceRef::from(&[0i16][..])), Err(AudioError::Closed)));
///
/// let bytes = encoder.into_inner().unwrap().into_inner();
/// assert_eq!(bytes.len(), 44 + 8);
/// ```
#[derive(Debug)]
pub struct WavEncoder<W: Write + Seek> {
    sink: W,
    config: Config,
    encoding: Encoding,
    /// Sink position of the `RIFF` id.
    start: u64,
    /// Sink position of the `fact` payload, for non-PCM output.
    fact_pos: Option<u64>,
    /// Sink position of the `data` length field.
    data_len_pos: u64,
    data_bytes: u64,
    samples_written: u64,
    scratch: Vec<u8>,
    closed: bool,
}

impl<W: Write + Seek> WavEncoder<W> {
    /// Creates an encoder writing 16-bit PCM.
    pub fn new(sink: W, config: Config) -> AudioResult<Self> {
        Self::with_encoding(sink, config, Encoding::PcmI16)
    }

    /// Creates an encoder writing `encoding` and emits the header.
    ///
    /// # Errors
    /// [`AudioError::InvalidConfig`] when `config` does not fit the header
    /// fields, [`AudioError::Io`] when the sink fails.
    pub fn with_encoding(mut sink: W, config: Config, encoding: Encoding) -> AudioResult<Self> {
        config.validate()?;
        let channels = u16::try_from(config.channels)
            .ok()
            .filter(|&ch| ch as usize * encoding.bytes_per_sample() <= u16::MAX as usize)
            .ok_or_else(|| {
                AudioError::invalid_config(format!("{} channels do not fit a WAV frame", config.channels))
            })?;
        let sample_rate = u32::try_from(config.sample_rate).map_err(|_| {
            AudioError::invalid_config(format!("sample rate {} exceeds 32 bits", config.sample_rate))
        })?;

        let fmt = FmtChunk::new(encoding.format_code(), channels, sample_rate, encoding.bits_per_sample());
        let fmt_bytes = fmt.to_bytes();

        let start = sink.stream_position()?;
        ChunkHeader::new(ids::RIFF, 0).write(&mut sink)?;
        sink.write_all(&ids::WAVE)?;
        ChunkHeader::new(ids::FMT, fmt_bytes.len() as u32).write(&mut sink)?;
        sink.write_all(&fmt_bytes)?;

        let mut position = start + (ChunkHeader::SIZE * 2 + 4 + fmt_bytes.len()) as u64;
        let fact_pos = if encoding.format_code().is_non_pcm() {
            ChunkHeader::new(ids::FACT, FactChunk::LEN as u32).write(&mut sink)?;
            sink.write_all(&FactChunk { sample_length: 0 }.to_bytes())?;
            position += (ChunkHeader::SIZE + FactChunk::LEN) as u64;
            Some(position - FactChunk::LEN as u64)
        } else {
            None
        };

        ChunkHeader::new(ids::DATA, 0).write(&mut sink)?;
        let data_len_pos = position + 4;

        debug!(%encoding, %config, fmt_len = fmt_bytes.len(), "Wrote WAV header");
        Ok(Self {
            sink,
            config,
            encoding,
            start,
            fact_pos,
            data_len_pos,
            data_bytes: 0,
            samples_written: 0,
            scratch: Vec::new(),
            closed: false,
        })
    }

    /// Encodes and writes every sample of `buf`.
    ///
    /// Any variant is accepted and converted to the output encoding. Returns
    /// `buf.len()`.
    pub fn write(&mut self, buf: &SliceRef<'_>) -> AudioResult<usize> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        let len = (buf.len() * self.encoding.bytes_per_sample()) as u64;
        if self.data_bytes + len > Self::MAX_DATA_BYTES {
            return Err(AudioError::invalid_data(
                "sample payload exceeds the 4 GiB RIFF limit",
            ));
        }

        self.scratch.clear();
        self.encoding.encode(buf, &mut self.scratch);
        self.sink.write_all(&self.scratch)?;

        self.data_bytes += len;
        self.samples_written += buf.len() as u64;
        trace!(samples = buf.len(), data_bytes = self.data_bytes, "Wrote WAV samples");
        Ok(buf.len())
    }

    /// Pads the payload to an even length, patches the RIFF, data and fact
    /// lengths and flushes the sink. The sink is left positioned at the end
    /// of the file.
    pub fn close(&mut self) -> AudioResult<()> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        if self.data_bytes % 2 == 1 {
            self.sink.write_all(&[0])?;
        }
        let end = self.sink.stream_position()?;
        // Both fit: write() caps the payload below the 32-bit limit.
        let riff_len = (end - self.start - ChunkHeader::SIZE as u64) as u32;
        let data_len = self.data_bytes as u32;

        self.patch_u32(self.start + 4, riff_len)?;
        self.patch_u32(self.data_len_pos, data_len)?;
        if let Some(fact_pos) = self.fact_pos {
            let frames = self.samples_written / self.config.channels as u64;
            self.patch_u32(fact_pos, frames as u32)?;
        }
        self.sink.seek(SeekFrom::Start(end))?;
        self.sink.flush()?;
        self.closed = true;

        debug!(
            riff_len,
            data_len,
            samples = self.samples_written,
            "Closed WAV stream"
        );
        Ok(())
    }

    /// Stream configuration written to the header.
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Output encoding.
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Payload bytes written so far, excluding any pad byte.
    pub const fn bytes_written(&self) -> u64 {
        self.data_bytes
    }

    /// Interleaved samples written so far.
    pub const fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// True once [`close`](Self::close) has succeeded.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the sink of a closed encoder.
    ///
    /// # Errors
    /// [`AudioError::Io`] of kind `InvalidInput` if the encoder was never
    /// closed, since its header lengths are still placeholders.
    pub fn into_inner(self) -> AudioResult<W> {
        if !self.closed {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "encoder must be closed before releasing its sink",
            )
            .into());
        }
        Ok(self.sink)
    }

    /// Largest payload whose RIFF length still fits 32 bits, leaving room
    /// for the header chunks and pad byte.
    const MAX_DATA_BYTES: u64 = u32::MAX as u64 - 64;

    fn patch_u32(&mut self, at: u64, value: u32) -> io::Result<()> {
        self.sink.seek(SeekFrom::Start(at))?;
        self.sink.write_all(&value.to_le_bytes())
    }
}

impl<W: Write + Seek> Writer for WavEncoder<W> {
    fn write(&mut self, buf: &SliceRef<'_>) -> AudioResult<usize> {
        WavEncoder::write(self, buf)
    }
}

impl<W: Write + Seek> Encoder for WavEncoder<W> {
    fn close(&mut self) -> AudioResult<()> {
        WavEncoder::close(self)
    }
}
