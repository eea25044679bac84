//! On-disk sample encodings.

use i24::I24;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::FormatCode;
use crate::{ALaw, AudioError, AudioResult, MuLaw, Sample, SampleFormat, SliceRef};

/// How one sample is laid out in the `data` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// 8-bit unsigned PCM.
    PcmU8,
    /// 16-bit signed little-endian PCM.
    PcmI16,
    /// 24-bit signed little-endian PCM, packed in three bytes.
    PcmI24,
    /// 32-bit signed little-endian PCM.
    PcmI32,
    /// 32-bit little-endian IEEE float.
    Float32,
    /// 64-bit little-endian IEEE float.
    Float64,
    /// 8-bit G.711 μ-law.
    MuLaw,
    /// 8-bit G.711 A-law.
    ALaw,
}

impl Encoding {
    /// Every supported encoding.
    pub const ALL: [Encoding; 8] = [
        Encoding::PcmU8,
        Encoding::PcmI16,
        Encoding::PcmI24,
        Encoding::PcmI32,
        Encoding::Float32,
        Encoding::Float64,
        Encoding::MuLaw,
        Encoding::ALaw,
    ];

    /// Selects the encoding for a format tag and sample width.
    pub fn from_format(format_tag: FormatCode, bits_per_sample: u16) -> AudioResult<Self> {
        let encoding = match (format_tag, bits_per_sample) {
            (FormatCode::Pcm, 8) => Encoding::PcmU8,
            (FormatCode::Pcm, 16) => Encoding::PcmI16,
            (FormatCode::Pcm, 24) => Encoding::PcmI24,
            (FormatCode::Pcm, 32) => Encoding::PcmI32,
            (FormatCode::IeeeFloat, 32) => Encoding::Float32,
            (FormatCode::IeeeFloat, 64) => Encoding::Float64,
            (FormatCode::MuLaw, 8) => Encoding::MuLaw,
            (FormatCode::ALaw, 8) => Encoding::ALaw,
            _ => {
                return Err(AudioError::Unsupported {
                    format_tag: format_tag.as_u16(),
                    bits_per_sample,
                });
            }
        };
        Ok(encoding)
    }

    /// Format tag written for this encoding.
    pub const fn format_code(self) -> FormatCode {
        match self {
            Encoding::PcmU8 | Encoding::PcmI16 | Encoding::PcmI24 | Encoding::PcmI32 => {
                FormatCode::Pcm
            }
            Encoding::Float32 | Encoding::Float64 => FormatCode::IeeeFloat,
            Encoding::MuLaw => FormatCode::MuLaw,
            Encoding::ALaw => FormatCode::ALaw,
        }
    }

    /// Declared bits per sample.
    pub const fn bits_per_sample(self) -> u16 {
        self.bytes_per_sample() as u16 * 8
    }

    /// Bytes one sample occupies in the `data` chunk.
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Encoding::PcmU8 | Encoding::MuLaw | Encoding::ALaw => 1,
            Encoding::PcmI16 => 2,
            Encoding::PcmI24 => 3,
            Encoding::PcmI32 | Encoding::Float32 => 4,
            Encoding::Float64 => 8,
        }
    }

    /// Variant the decoder produces without conversion.
    ///
    /// 24-bit PCM is carried in `Int32` at its 24-bit magnitude, so the value
    /// range is `-8_388_608..=8_388_607`.
    pub const fn native_format(self) -> SampleFormat {
        match self {
            Encoding::PcmU8 => SampleFormat::Uint8,
            Encoding::PcmI16 => SampleFormat::Int16,
            Encoding::PcmI24 | Encoding::PcmI32 => SampleFormat::Int32,
            Encoding::Float32 => SampleFormat::Float32,
            Encoding::Float64 => SampleFormat::Float64,
            Encoding::MuLaw => SampleFormat::MuLaw,
            Encoding::ALaw => SampleFormat::ALaw,
        }
    }

    /// Encoding that stores `format` without loss.
    pub const fn for_format(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Uint8 => Encoding::PcmU8,
            SampleFormat::Int16 => Encoding::PcmI16,
            SampleFormat::Int32 => Encoding::PcmI32,
            SampleFormat::Float32 => Encoding::Float32,
            SampleFormat::Float64 => Encoding::Float64,
            SampleFormat::MuLaw => Encoding::MuLaw,
            SampleFormat::ALaw => Encoding::ALaw,
        }
    }

    /// Appends the little-endian encoding of every sample of `src` to `out`.
    pub(crate) fn encode(self, src: &SliceRef<'_>, out: &mut Vec<u8>) {
        out.reserve(src.len() * self.bytes_per_sample());
        match self {
            Encoding::PcmU8 => encode_as(src, out, |v: u8| [v]),
            Encoding::PcmI16 => encode_as(src, out, i16::to_le_bytes),
            Encoding::PcmI24 => {
                for i in 0..src.len() {
                    out.extend_from_slice(&fetch_pcm24(src, i).to_le_bytes());
                }
            }
            Encoding::PcmI32 => encode_as(src, out, i32::to_le_bytes),
            Encoding::Float32 => encode_as(src, out, f32::to_le_bytes),
            Encoding::Float64 => encode_as(src, out, f64::to_le_bytes),
            Encoding::MuLaw => encode_as(src, out, |v: MuLaw| [v.0]),
            Encoding::ALaw => encode_as(src, out, |v: ALaw| [v.0]),
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Encoding::PcmU8 => "pcm_u8",
            Encoding::PcmI16 => "pcm_s16le",
            Encoding::PcmI24 => "pcm_s24le",
            Encoding::PcmI32 => "pcm_s32le",
            Encoding::Float32 => "pcm_f32le",
            Encoding::Float64 => "pcm_f64le",
            Encoding::MuLaw => "pcm_mulaw",
            Encoding::ALaw => "pcm_alaw",
        };
        f.write_str(name)
    }
}

fn encode_as<T: Sample, const N: usize>(
    src: &SliceRef<'_>,
    out: &mut Vec<u8>,
    to_bytes: impl Fn(T) -> [u8; N],
) {
    for i in 0..src.len() {
        out.extend_from_slice(&to_bytes(T::fetch(src, i)));
    }
}

/// 24-bit samples share the `i32` scaling: an `Int32` source is taken raw
/// and every other variant converts to `i32` first. Values beyond 24 bits
/// saturate.
fn fetch_pcm24(src: &SliceRef<'_>, i: usize) -> I24 {
    let value = i32::fetch(src, i);
    match I24::try_from_i32(value) {
        Some(sample) => sample,
        None if value < 0 => I24::MIN,
        None => I24::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Samples;

    #[test]
    fn test_from_format_table() {
        assert_eq!(Encoding::from_format(FormatCode::Pcm, 24).unwrap(), Encoding::PcmI24);
        assert_eq!(Encoding::from_format(FormatCode::IeeeFloat, 64).unwrap(), Encoding::Float64);
        assert_eq!(Encoding::from_format(FormatCode::MuLaw, 8).unwrap(), Encoding::MuLaw);
        for encoding in Encoding::ALL {
            let back = Encoding::from_format(encoding.format_code(), encoding.bits_per_sample());
            assert_eq!(back.unwrap(), encoding);
        }
    }

    #[test]
    fn test_from_format_rejects_unknown_combinations() {
        let err = Encoding::from_format(FormatCode::Extensible, 16).unwrap_err();
        assert!(matches!(
            err,
            AudioError::Unsupported {
                format_tag: 0xFFFE,
                bits_per_sample: 16
            }
        ));
        assert!(Encoding::from_format(FormatCode::Pcm, 12).is_err());
        assert!(Encoding::from_format(FormatCode::IeeeFloat, 16).is_err());
        assert!(Encoding::from_format(FormatCode::ALaw, 16).is_err());
        assert!(Encoding::from_format(FormatCode::Unknown(0x55), 16).is_err());
    }

    #[test]
    fn test_encode_little_endian_layout() {
        let mut out = Vec::new();
        Encoding::PcmI16.encode(&SliceRef::from(&[0x0102i16, -2][..]), &mut out);
        assert_eq!(out, [0x02, 0x01, 0xFE, 0xFF]);

        out.clear();
        Encoding::PcmI24.encode(&SliceRef::from(&[-8_388_608i32, 8_388_607, 1 << 30][..]), &mut out);
        assert_eq!(out, [0x00, 0x00, 0x80, 0xFF, 0xFF, 0x7F, 0xFF, 0xFF, 0x7F]);

        out.clear();
        Encoding::MuLaw.encode(&SliceRef::from(&[0i16][..]), &mut out);
        assert_eq!(out, [0xFF]);
    }

    #[test]
    fn test_pcm24_saturates_full_scale_input() {
        let mut out = Vec::new();
        Encoding::PcmI24.encode(&Samples::from(vec![1.0f64, -1.0, 0.5]).as_slice(), &mut out);
        assert_eq!(out, [0xFF, 0xFF, 0x7F, 0x00, 0x00, 0x80, 0xFF, 0xFF, 0x7F]);

        // A float holding an in-range i32 value lands on the same bytes.
        let raw = [-8_388_608i32, 1_000, 8_388_607];
        let floats: Vec<f64> = raw.iter().map(|v| v.to_f64()).collect();
        let mut from_raw = Vec::new();
        let mut from_floats = Vec::new();
        Encoding::PcmI24.encode(&SliceRef::from(&raw[..]), &mut from_raw);
        Encoding::PcmI24.encode(&SliceRef::from(&floats[..]), &mut from_floats);
        assert_eq!(from_raw, from_floats);
    }
}
