//! RIFF chunk records and little-endian field access.

use std::io::{self, Read, Write};

use super::FormatCode;
use crate::{AudioError, AudioResult};

/// An 8-byte chunk header: four-character id plus payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Four-character chunk id.
    pub id: [u8; 4],
    /// Payload length in bytes, excluding the header and pad byte.
    pub len: u32,
}

impl ChunkHeader {
    /// Encoded size of a header.
    pub const SIZE: usize = 8;

    /// Creates a header.
    pub const fn new(id: [u8; 4], len: u32) -> Self {
        Self { id, len }
    }

    /// Reads a header.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let bytes: [u8; Self::SIZE] = read_array(reader)?;
        Ok(Self {
            id: [bytes[0], bytes[1], bytes[2], bytes[3]],
            len: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }

    /// Writes a header.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.id)?;
        writer.write_all(&self.len.to_le_bytes())
    }

    /// Chunk id as text, for diagnostics.
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }

    /// Payload length plus the pad byte that follows an odd payload.
    pub const fn padded_len(&self) -> u64 {
        self.len as u64 + (self.len & 1) as u64
    }
}

/// Fields that follow `cbSize` in a 40-byte `WAVE_FORMAT_EXTENSIBLE` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensibleFields {
    /// Bits of precision actually used.
    pub valid_bits_per_sample: u16,
    /// Speaker position mask.
    pub channel_mask: u32,
    /// Sub-format GUID.
    pub sub_format: [u8; 16],
}

/// The `fmt ` chunk in its 16, 18 or 40 byte form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtChunk {
    /// Format tag (codec ID)
    pub format_tag: FormatCode,
    /// Number of interleaved channels
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Average bytes per second
    pub byte_rate: u32,
    /// Bytes per frame
    pub block_align: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// `cbSize`, present in the 18 and 40 byte forms
    pub extension_size: Option<u16>,
    /// Present in the 40 byte form
    pub extensible: Option<ExtensibleFields>,
}

impl FmtChunk {
    /// Length of the mandatory part.
    pub const CORE_LEN: usize = 16;
    /// Length with `cbSize`.
    pub const EXTENDED_LEN: usize = 18;
    /// Length of the extensible form.
    pub const EXTENSIBLE_LEN: usize = 40;

    /// Builds the record for `channels` interleaved samples of
    /// `bits_per_sample` bits. Non-PCM tags get the 18-byte form.
    pub fn new(format_tag: FormatCode, channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = channels.saturating_mul(bits_per_sample / 8);
        Self {
            format_tag,
            channels,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(block_align as u32),
            block_align,
            bits_per_sample,
            extension_size: format_tag.is_non_pcm().then_some(0),
            extensible: None,
        }
    }

    /// Parses a chunk payload.
    ///
    /// Payload bytes beyond the recognized forms are ignored.
    pub fn from_bytes(data: &[u8]) -> AudioResult<Self> {
        if data.len() < Self::CORE_LEN {
            return Err(AudioError::invalid_data(format!(
                "fmt chunk too small: {} bytes",
                data.len()
            )));
        }

        let extension_size = (data.len() >= Self::EXTENDED_LEN).then(|| le_u16(data, 16));
        let extensible = (data.len() >= Self::EXTENSIBLE_LEN).then(|| {
            let mut sub_format = [0u8; 16];
            sub_format.copy_from_slice(&data[24..40]);
            ExtensibleFields {
                valid_bits_per_sample: le_u16(data, 18),
                channel_mask: le_u32(data, 20),
                sub_format,
            }
        });

        Ok(Self {
            format_tag: FormatCode::from(le_u16(data, 0)),
            channels: le_u16(data, 2),
            sample_rate: le_u32(data, 4),
            byte_rate: le_u32(data, 8),
            block_align: le_u16(data, 12),
            bits_per_sample: le_u16(data, 14),
            extension_size,
            extensible,
        })
    }

    /// Encodes the record; its length is the chunk length to declare.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::EXTENSIBLE_LEN);

        bytes.extend_from_slice(&self.format_tag.as_u16().to_le_bytes());
        bytes.extend_from_slice(&self.channels.to_le_bytes());
        bytes.extend_from_slice(&self.sample_rate.to_le_bytes());
        bytes.extend_from_slice(&self.byte_rate.to_le_bytes());
        bytes.extend_from_slice(&self.block_align.to_le_bytes());
        bytes.extend_from_slice(&self.bits_per_sample.to_le_bytes());

        if let Some(ext_size) = self.extension_size {
            bytes.extend_from_slice(&ext_size.to_le_bytes());
            if let Some(ext) = self.extensible {
                bytes.extend_from_slice(&ext.valid_bits_per_sample.to_le_bytes());
                bytes.extend_from_slice(&ext.channel_mask.to_le_bytes());
                bytes.extend_from_slice(&ext.sub_format);
            }
        }

        bytes
    }
}

/// The `fact` chunk: number of sample frames in non-PCM data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactChunk {
    /// Frames per channel.
    pub sample_length: u32,
}

impl FactChunk {
    /// Payload length.
    pub const LEN: usize = 4;

    /// Parses a chunk payload.
    pub fn from_bytes(data: &[u8]) -> AudioResult<Self> {
        if data.len() < Self::LEN {
            return Err(AudioError::invalid_data(format!(
                "fact chunk too small: {} bytes",
                data.len()
            )));
        }
        Ok(Self {
            sample_length: le_u32(data, 0),
        })
    }

    /// Encodes the payload.
    pub const fn to_bytes(&self) -> [u8; Self::LEN] {
        self.sample_length.to_le_bytes()
    }
}

pub(crate) fn read_array<R: Read + ?Sized, const N: usize>(reader: &mut R) -> io::Result<[u8; N]> {
    let mut bytes = [0u8; N];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

/// Reads a `len`-byte payload, failing if the source ends first.
pub(crate) fn read_payload<R: Read + ?Sized>(reader: &mut R, len: u32) -> io::Result<Vec<u8>> {
    let mut payload = Vec::new();
    reader.take(len as u64).read_to_end(&mut payload)?;
    if payload.len() < len as usize {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("chunk payload truncated at {} of {len} bytes", payload.len()),
        ));
    }
    Ok(payload)
}

/// Discards `len` bytes of the source.
pub(crate) fn skip<R: Read + ?Sized>(reader: &mut R, len: u64) -> io::Result<()> {
    let skipped = io::copy(&mut reader.take(len), &mut io::sink())?;
    if skipped < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("chunk ended after {skipped} of {len} bytes"),
        ));
    }
    Ok(())
}

fn le_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn le_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
