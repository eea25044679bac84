use bytemuck::{Pod, Zeroable};
use num_traits::clamp;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

use crate::{SampleFormat, SliceMut, SliceRef};
use crate::companding::{alaw_to_linear, linear_to_alaw, linear_to_ulaw, ulaw_to_linear};

/// Core trait defining the interface for sample element types.
///
/// Every element type of the closed variant set implements this trait:
///
/// - `u8`: 8-bit unsigned, offset-binary PCM centred on 128
/// - `i16`: 16-bit signed integer PCM
/// - `i32`: 32-bit signed integer PCM (also carries 24-bit PCM)
/// - `f32`: 32-bit IEEE float
/// - `f64`: 64-bit IEEE float
/// - [`MuLaw`]: 8-bit G.711 μ-law
/// - [`ALaw`]: 8-bit G.711 A-law
///
/// The normalized `f64` view is the common currency for cross-variant
/// conversion. Integers map `MIN..=MAX` onto `-1.0..=1.0`, dividing negative
/// values by `-MIN` and positive values by `MAX`, so both extremes land on
/// exactly ±1.0 and every integer survives `to_f64` followed by `from_f64`.
/// Floats are stored unscaled.
///
/// ```rust
/// use wavcodec::Sample;
///
/// assert_eq!(i16::MIN.to_f64(), -1.0);
/// assert_eq!(i16::MAX.to_f64(), 1.0);
/// assert_eq!(i16::from_f64(0.5), 16384);
/// assert_eq!(u8::from_f64(0.0), 128);
/// ```
pub trait Sample:
    Copy + Default + Debug + PartialEq + Send + Sync + Pod + Zeroable + 'static
{
    /// Variant tag of this element type.
    const FORMAT: SampleFormat;
    /// Bit width of one element.
    const BITS: u8;

    /// Normalized view of this sample.
    fn to_f64(self) -> f64;

    /// Sample nearest to the normalized value `value`.
    ///
    /// Out-of-range values saturate for the integer and companded variants.
    fn from_f64(value: f64) -> Self;

    /// Stores this sample at `dst[i]`: raw when `dst` holds this variant,
    /// through the normalized view otherwise.
    fn store(self, dst: &mut SliceMut<'_>, i: usize);

    /// Loads `src[i]` as this type: raw when `src` holds this variant,
    /// through the normalized view otherwise.
    fn fetch(src: &SliceRef<'_>, i: usize) -> Self;
}

/// Generates the raw-or-normalized `store`/`fetch` pair for one variant.
macro_rules! impl_store_fetch {
    ($format:ident) => {
        #[inline(always)]
        fn store(self, dst: &mut SliceMut<'_>, i: usize) {
            match dst {
                SliceMut::$format(d) => d[i] = self,
                other => other.set(i, self.to_f64()),
            }
        }

        #[inline(always)]
        fn fetch(src: &SliceRef<'_>, i: usize) -> Self {
            match src {
                SliceRef::$format(s) => s[i],
                other => Self::from_f64(other.at(i)),
            }
        }
    };
}

/// An 8-bit G.711 μ-law sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MuLaw(pub u8);

/// An 8-bit G.711 A-law sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ALaw(pub u8);

impl MuLaw {
    /// Compresses a 16-bit linear sample.
    pub const fn from_linear(sample: i16) -> Self {
        Self(linear_to_ulaw(sample))
    }

    /// Expands to a 16-bit linear sample.
    pub const fn to_linear(self) -> i16 {
        ulaw_to_linear(self.0)
    }
}

impl ALaw {
    /// Compresses a 16-bit linear sample.
    pub const fn from_linear(sample: i16) -> Self {
        Self(linear_to_alaw(sample))
    }

    /// Expands to a 16-bit linear sample.
    pub const fn to_linear(self) -> i16 {
        alaw_to_linear(self.0)
    }
}

// Silence, not the all-zero byte (which is a full-scale negative value).
impl Default for MuLaw {
    fn default() -> Self {
        Self::from_linear(0)
    }
}

impl Default for ALaw {
    fn default() -> Self {
        Self::from_linear(0)
    }
}

impl Display for MuLaw {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "μ{:#04x}", self.0)
    }
}

impl Display for ALaw {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "A{:#04x}", self.0)
    }
}

// ========================
// Sample Macros
// ========================

/// Generates signed-integer samples with asymmetric normalized scaling.
macro_rules! impl_int_sample {
    ($type:ty, $format:ident, $bits:expr) => {
        impl Sample for $type {
            const FORMAT: SampleFormat = SampleFormat::$format;
            const BITS: u8 = $bits;

            #[inline(always)]
            fn to_f64(self) -> f64 {
                if self < 0 {
                    self as f64 / -(<$type>::MIN as f64)
                } else {
                    self as f64 / <$type>::MAX as f64
                }
            }

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                let clamped = clamp(value, -1.0, 1.0);
                if clamped < 0.0 {
                    (clamped * -(<$type>::MIN as f64)).round() as $type
                } else {
                    (clamped * <$type>::MAX as f64).round() as $type
                }
            }

            impl_store_fetch!($format);
        }
    };
}

/// Generates float samples, which are stored unscaled.
macro_rules! impl_float_sample {
    ($type:ty, $format:ident, $bits:expr) => {
        impl Sample for $type {
            const FORMAT: SampleFormat = SampleFormat::$format;
            const BITS: u8 = $bits;

            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                value as $type
            }

            impl_store_fetch!($format);
        }
    };
}

/// Generates companded samples, which convert through 16-bit linear PCM.
macro_rules! impl_companded_sample {
    ($type:ty, $format:ident) => {
        impl Sample for $type {
            const FORMAT: SampleFormat = SampleFormat::$format;
            const BITS: u8 = 8;

            #[inline(always)]
            fn to_f64(self) -> f64 {
                self.to_linear().to_f64()
            }

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                Self::from_linear(i16::from_f64(value))
            }

            impl_store_fetch!($format);
        }
    };
}

impl_int_sample!(i16, Int16, 16);
impl_int_sample!(i32, Int32, 32);

impl_float_sample!(f32, Float32, 32);
impl_float_sample!(f64, Float64, 64);

impl_companded_sample!(MuLaw, MuLaw);
impl_companded_sample!(ALaw, ALaw);

impl Sample for u8 {
    const FORMAT: SampleFormat = SampleFormat::Uint8;
    const BITS: u8 = 8;

    #[inline(always)]
    fn to_f64(self) -> f64 {
        let centred = self as i16 - 128;
        if centred < 0 {
            centred as f64 / 128.0
        } else {
            centred as f64 / 127.0
        }
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        let clamped = clamp(value, -1.0, 1.0);
        let centred = if clamped < 0.0 {
            (clamped * 128.0).round()
        } else {
            (clamped * 127.0).round()
        };
        (centred + 128.0) as u8
    }

    impl_store_fetch!(Uint8);
}

#[cfg(test)]
mod conversion_tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn i16_edge_cases() {
        assert_eq!(i16::MIN.to_f64(), -1.0);
        assert_eq!(i16::MAX.to_f64(), 1.0);
        assert_eq!(0i16.to_f64(), 0.0);
        assert_approx_eq!((i16::MAX / 2).to_f64(), 0.5, 1e-4);

        assert_eq!(i16::from_f64(-1.0), i16::MIN);
        assert_eq!(i16::from_f64(1.0), i16::MAX);
        assert_eq!(i16::from_f64(0.0), 0);
        assert_eq!(i16::from_f64(-0.5), -16384);
    }

    #[test]
    fn i16_saturates_out_of_range() {
        assert_eq!(i16::from_f64(7.0), i16::MAX);
        assert_eq!(i16::from_f64(-3.5), i16::MIN);
        assert_eq!(i16::from_f64(f64::NAN), 0);
    }

    #[test]
    fn i32_edge_cases() {
        assert_eq!(i32::MIN.to_f64(), -1.0);
        assert_eq!(i32::MAX.to_f64(), 1.0);
        assert_eq!(i32::from_f64(1.0), i32::MAX);
        assert_eq!(i32::from_f64(-1.0), i32::MIN);
        assert_approx_eq!(0x4000_0000i32.to_f64(), 0.5, 1e-6);
    }

    #[test]
    fn integers_survive_normalization() {
        for value in [i16::MIN, -12345, -1, 0, 1, 777, i16::MAX] {
            assert_eq!(i16::from_f64(value.to_f64()), value);
        }
        for value in [i32::MIN, -8_388_608, -1, 0, 1, 8_388_607, i32::MAX] {
            assert_eq!(i32::from_f64(value.to_f64()), value);
        }
        for value in 0..=u8::MAX {
            assert_eq!(u8::from_f64(value.to_f64()), value);
        }
    }

    #[test]
    fn u8_is_offset_binary() {
        assert_eq!(0u8.to_f64(), -1.0);
        assert_eq!(128u8.to_f64(), 0.0);
        assert_eq!(255u8.to_f64(), 1.0);
        assert_eq!(u8::from_f64(-1.0), 0);
        assert_eq!(u8::from_f64(1.0), 255);
        assert_eq!(u8::from_f64(2.0), 255);
    }

    #[test]
    fn floats_are_unscaled() {
        assert_eq!(0.25f32.to_f64(), 0.25);
        assert_eq!(f32::from_f64(-0.75), -0.75f32);
        assert_eq!(f64::from_f64(3.0), 3.0);
    }

    #[test]
    fn companded_samples_use_g711() {
        assert_eq!(MuLaw::default(), MuLaw(0xFF));
        assert_eq!(ALaw::default(), ALaw(0xD5));
        assert_eq!(MuLaw::from_f64(0.0).to_f64(), 0.0);
        assert_eq!(MuLaw(0x80).to_linear(), 32124);
        assert_approx_eq!(MuLaw(0x80).to_f64(), 32124.0 / 32767.0, 1e-12);
        assert_eq!(ALaw::from_f64(1.0), ALaw(0xAA));
        assert_eq!(ALaw::from_f64(-1.0), ALaw(0x2A));
    }

    #[test]
    fn store_and_fetch_prefer_raw_access() {
        let mut raw = [0i16; 2];
        let mut dst = SliceMut::from(&mut raw[..]);
        (-123i16).store(&mut dst, 0);
        0.5f64.store(&mut dst, 1);
        assert_eq!(raw, [-123, 16384]);

        let source = [MuLaw(0x80), MuLaw(0x00)];
        let src = SliceRef::from(&source[..]);
        assert_eq!(MuLaw::fetch(&src, 1), MuLaw(0x00));
        assert_eq!(i16::fetch(&src, 0), 32124);
        assert_eq!(i32::fetch(&SliceRef::from(&[7i32][..]), 0), 7);
    }

    #[test]
    fn sample_formats_match_types() {
        assert_eq!(<u8 as Sample>::FORMAT, SampleFormat::Uint8);
        assert_eq!(<i16 as Sample>::FORMAT, SampleFormat::Int16);
        assert_eq!(<i32 as Sample>::FORMAT, SampleFormat::Int32);
        assert_eq!(<f32 as Sample>::FORMAT, SampleFormat::Float32);
        assert_eq!(<f64 as Sample>::FORMAT, SampleFormat::Float64);
        assert_eq!(<MuLaw as Sample>::FORMAT, SampleFormat::MuLaw);
        assert_eq!(<ALaw as Sample>::FORMAT, SampleFormat::ALaw);
        assert_eq!(<f64 as Sample>::BITS, 64);
    }
}
