//! # RIFF/WAVE codec
//!
//! Streaming decoder and encoder for `.wav` files.
//!
//! Supported encodings:
//!
//! | format tag        | bits | native variant  |
//! |-------------------|------|-----------------|
//! | PCM (1)           | 8    | `Uint8`         |
//! | PCM (1)           | 16   | `Int16`         |
//! | PCM (1)           | 24   | `Int32`         |
//! | PCM (1)           | 32   | `Int32`         |
//! | IEEE float (3)    | 32   | `Float32`       |
//! | IEEE float (3)    | 64   | `Float64`       |
//! | A-law (6)         | 8    | `ALaw`          |
//! | μ-law (7)         | 8    | `MuLaw`         |
//!
//! `WAVE_FORMAT_EXTENSIBLE` (0xFFFE) and every other tag/width combination is
//! rejected with [`AudioError::Unsupported`](crate::AudioError::Unsupported).
//!
//! ```rust
//! use std::io::Cursor;
//! use wavcodec::wav::{Encoding, WavDecoder, WavEncoder};
//! use wavcodec::{Config, Samples, SampleFormat, SliceRef};
//!
//! let config = Config::new(1, 8_000).unwrap();
//! let mut encoder = WavEncoder::with_encoding(Cursor::new(Vec::new()), config, Encoding::MuLaw).unwrap();
//! encoder.write(&SliceRef::from(&[0i16, 1000, -1000][..])).unwrap();
//! encoder.close().unwrap();
//!
//! let bytes = encoder.into_inner().unwrap().into_inner();
//! let decoder = WavDecoder::new(&bytes[..]).unwrap();
//! assert_eq!(decoder.config(), config);
//! assert_eq!(decoder.encoding(), Encoding::MuLaw);
//!
//! let mut out = Samples::new(SampleFormat::MuLaw, 3);
//! assert_eq!(decoder.read(&mut out.as_mut_slice()).unwrap(), 3);
//! ```

mod chunks;
mod decoder;
mod encoder;
mod encoding;

#[cfg(test)]
mod tests;

pub use chunks::{ChunkHeader, ExtensibleFields, FactChunk, FmtChunk};
pub use decoder::WavDecoder;
pub use encoder::WavEncoder;
pub use encoding::Encoding;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Chunk identifiers.
pub mod ids {
    /// Outer container.
    pub const RIFF: [u8; 4] = *b"RIFF";
    /// Form type of the outer container.
    pub const WAVE: [u8; 4] = *b"WAVE";
    /// Format description.
    pub const FMT: [u8; 4] = *b"fmt ";
    /// Frame count of non-PCM data.
    pub const FACT: [u8; 4] = *b"fact";
    /// Sample payload.
    pub const DATA: [u8; 4] = *b"data";
}

/// WAV `wFormatTag` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatCode {
    /// PCM (uncompressed)
    Pcm,
    /// IEEE Float
    IeeeFloat,
    /// ITU G.711 A-law
    ALaw,
    /// ITU G.711 μ-law
    MuLaw,
    /// `WAVE_FORMAT_EXTENSIBLE`
    Extensible,
    /// Any other tag
    Unknown(u16),
}

impl FormatCode {
    /// Canonical numeric WAV format tag
    pub const fn as_u16(self) -> u16 {
        match self {
            FormatCode::Pcm => 0x0001,
            FormatCode::IeeeFloat => 0x0003,
            FormatCode::ALaw => 0x0006,
            FormatCode::MuLaw => 0x0007,
            FormatCode::Extensible => 0xFFFE,
            FormatCode::Unknown(code) => code,
        }
    }

    /// Tag for a raw `wFormatTag` value.
    pub const fn const_from(code: u16) -> Self {
        match code {
            0x0001 => FormatCode::Pcm,
            0x0003 => FormatCode::IeeeFloat,
            0x0006 => FormatCode::ALaw,
            0x0007 => FormatCode::MuLaw,
            0xFFFE => FormatCode::Extensible,
            other => FormatCode::Unknown(other),
        }
    }

    /// Symbolic name.
    pub const fn as_str(self) -> &'static str {
        match self {
            FormatCode::Pcm => "PCM",
            FormatCode::IeeeFloat => "IEEE_FLOAT",
            FormatCode::ALaw => "A_LAW",
            FormatCode::MuLaw => "MU_LAW",
            FormatCode::Extensible => "EXTENSIBLE",
            FormatCode::Unknown(_) => "UNKNOWN",
        }
    }

    /// True for the G.711 tags.
    pub const fn is_companded(self) -> bool {
        matches!(self, FormatCode::ALaw | FormatCode::MuLaw)
    }

    /// True for any tag other than plain PCM. Such files carry an 18-byte
    /// format chunk and a `fact` chunk when written by [`WavEncoder`].
    pub const fn is_non_pcm(self) -> bool {
        !matches!(self, FormatCode::Pcm)
    }
}

impl From<u16> for FormatCode {
    fn from(code: u16) -> Self {
        Self::const_from(code)
    }
}

impl From<FormatCode> for u16 {
    fn from(val: FormatCode) -> Self {
        val.as_u16()
    }
}

impl Display for FormatCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FormatCode::Unknown(code) => write!(f, "UNKNOWN(0x{code:04X})"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[cfg(test)]
mod format_code_tests {
    use super::*;

    #[test]
    fn test_format_code_round_trips_through_u16() {
        for code in [0x0001u16, 0x0003, 0x0006, 0x0007, 0xFFFE, 0x0055] {
            assert_eq!(u16::from(FormatCode::from(code)), code);
        }
        assert_eq!(FormatCode::from(0x0055), FormatCode::Unknown(0x55));
        assert_eq!(FormatCode::Unknown(0x55).to_string(), "UNKNOWN(0x0055)");
        assert_eq!(FormatCode::MuLaw.to_string(), "MU_LAW");
        assert!(FormatCode::ALaw.is_companded());
        assert!(!FormatCode::Pcm.is_non_pcm());
    }
}
