//! # Sample Variant Conversions
//!
//! Bulk copy between slices of any two variants. The copy length is the
//! shorter of the two slices and the number of samples copied is returned.
//!
//! Conversion is defined for every pair of variants:
//!
//! - same variant: raw elements are copied, nothing is lost
//! - μ-law/A-law ↔ `i16`: straight through the G.711 tables
//! - every other pair: through the normalized `f64` view
//!   (see [`Sample`](crate::Sample))
//!
//! ```rust
//! use wavcodec::{SliceMut, SliceRef};
//!
//! let source = [0.5f64, -1.0, 2.0];
//! let mut target = [0i16; 2];
//! let copied = SliceRef::from(&source[..]).copy_to(&mut SliceMut::from(&mut target[..]));
//!
//! assert_eq!(copied, 2);
//! assert_eq!(target, [16384, i16::MIN]);
//! ```

use crate::repr::each_variant;
use crate::{ALaw, MuLaw, Sample, SliceMut, SliceRef};

impl SliceRef<'_> {
    /// Converts and copies `min(self.len(), dst.len())` samples into `dst`.
    ///
    /// Returns the number of samples copied.
    pub fn copy_to(&self, dst: &mut SliceMut<'_>) -> usize {
        let n = self.len().min(dst.len());
        if !copy_direct(self, dst, n) {
            copy_normalized(self, dst, n);
        }
        n
    }
}

impl SliceMut<'_> {
    /// Converts and copies `min(self.len(), dst.len())` samples into `dst`.
    pub fn copy_to(&self, dst: &mut SliceMut<'_>) -> usize {
        self.as_ref().copy_to(dst)
    }
}

/// Copies pairs that do not need the normalized view. Returns false when the
/// pair has no direct mapping.
fn copy_direct(src: &SliceRef<'_>, dst: &mut SliceMut<'_>, n: usize) -> bool {
    match (src, dst) {
        (SliceRef::Uint8(s), SliceMut::Uint8(d)) => d[..n].copy_from_slice(&s[..n]),
        (SliceRef::Int16(s), SliceMut::Int16(d)) => d[..n].copy_from_slice(&s[..n]),
        (SliceRef::Int32(s), SliceMut::Int32(d)) => d[..n].copy_from_slice(&s[..n]),
        (SliceRef::Float32(s), SliceMut::Float32(d)) => d[..n].copy_from_slice(&s[..n]),
        (SliceRef::Float64(s), SliceMut::Float64(d)) => d[..n].copy_from_slice(&s[..n]),
        (SliceRef::MuLaw(s), SliceMut::MuLaw(d)) => d[..n].copy_from_slice(&s[..n]),
        (SliceRef::ALaw(s), SliceMut::ALaw(d)) => d[..n].copy_from_slice(&s[..n]),

        (SliceRef::MuLaw(s), SliceMut::Int16(d)) => map_into(&s[..n], &mut d[..n], MuLaw::to_linear),
        (SliceRef::ALaw(s), SliceMut::Int16(d)) => map_into(&s[..n], &mut d[..n], ALaw::to_linear),
        (SliceRef::Int16(s), SliceMut::MuLaw(d)) => map_into(&s[..n], &mut d[..n], MuLaw::from_linear),
        (SliceRef::Int16(s), SliceMut::ALaw(d)) => map_into(&s[..n], &mut d[..n], ALaw::from_linear),
        (SliceRef::MuLaw(s), SliceMut::ALaw(d)) => {
            map_into(&s[..n], &mut d[..n], |m| ALaw::from_linear(m.to_linear()))
        }
        (SliceRef::ALaw(s), SliceMut::MuLaw(d)) => {
            map_into(&s[..n], &mut d[..n], |a| MuLaw::from_linear(a.to_linear()))
        }

        _ => return false,
    }
    true
}

fn copy_normalized(src: &SliceRef<'_>, dst: &mut SliceMut<'_>, n: usize) {
    each_variant!(SliceMut, dst, d => {
        for (i, slot) in d[..n].iter_mut().enumerate() {
            *slot = Sample::from_f64(src.at(i));
        }
    })
}

#[inline]
fn map_into<S: Copy, D>(src: &[S], dst: &mut [D], f: impl Fn(S) -> D) {
    for (slot, &value) in dst.iter_mut().zip(src) {
        *slot = f(value);
    }
}

#[cfg(test)]
mod tests {
    use crate::{ALaw, MuLaw, SampleFormat, Samples, SliceMut, SliceRef};

    #[test]
    fn test_same_variant_copy_is_exact() {
        let source = [i32::MIN, -3, 0, 8_388_607, i32::MAX];
        let mut target = [0i32; 5];
        let copied = SliceRef::from(&source[..]).copy_to(&mut SliceMut::from(&mut target[..]));
        assert_eq!(copied, 5);
        assert_eq!(target, source);
    }

    #[test]
    fn test_copy_length_is_the_shorter_slice() {
        let source = [1u8, 2, 3];
        let mut target = Samples::new(SampleFormat::Uint8, 8);
        let copied = SliceRef::from(&source[..]).copy_to(&mut target.as_mut_slice());
        assert_eq!(copied, 3);
        assert_eq!(target.slice(0, 3), SliceRef::Uint8(&[1, 2, 3]));
        assert_eq!(target.slice(3, 8), SliceRef::Uint8(&[128; 5]));

        let mut short = [0u8; 1];
        let copied = SliceRef::from(&source[..]).copy_to(&mut SliceMut::from(&mut short[..]));
        assert_eq!(copied, 1);
        assert_eq!(short, [1]);
    }

    #[test]
    fn test_companded_to_i16_uses_tables() {
        let source = [MuLaw(0x80), MuLaw(0x00), MuLaw(0xFF)];
        let mut target = [0i16; 3];
        SliceRef::from(&source[..]).copy_to(&mut SliceMut::from(&mut target[..]));
        assert_eq!(target, [32124, -32124, 0]);

        let source = [ALaw(0xAA), ALaw(0x2A)];
        let mut target = [0i16; 2];
        SliceRef::from(&source[..]).copy_to(&mut SliceMut::from(&mut target[..]));
        assert_eq!(target, [32256, -32256]);
    }

    #[test]
    fn test_i16_to_companded_matches_normalized_path() {
        let source: Vec<i16> = (-32768..=32767).step_by(97).map(|v| v as i16).collect();
        let mut direct = Samples::new(SampleFormat::MuLaw, source.len());
        SliceRef::from(&source[..]).copy_to(&mut direct.as_mut_slice());

        let mut via_float = Samples::new(SampleFormat::MuLaw, source.len());
        for (i, value) in source.iter().enumerate() {
            via_float.set(i, crate::Sample::to_f64(*value));
        }
        assert_eq!(direct, via_float);
    }

    #[test]
    fn test_cross_variant_goes_through_normalized_view() {
        let source = [0u8, 128, 255];
        let mut target = [0.0f32; 3];
        SliceRef::from(&source[..]).copy_to(&mut SliceMut::from(&mut target[..]));
        assert_eq!(target, [-1.0, 0.0, 1.0]);

        let source = [-1.0f32, 0.0, 1.0];
        let mut target = [0i32; 3];
        SliceRef::from(&source[..]).copy_to(&mut SliceMut::from(&mut target[..]));
        assert_eq!(target, [i32::MIN, 0, i32::MAX]);
    }

    #[test]
    fn test_every_pair_is_defined() {
        for from in SampleFormat::ALL {
            for to in SampleFormat::ALL {
                let source = Samples::new(from, 4);
                let mut target = Samples::new(to, 2);
                let copied = source.as_slice().copy_to(&mut target.as_mut_slice());
                assert_eq!(copied, 2, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_slice_mut_copy_to() {
        let mut source = [0.25f64, 0.5];
        let mut target = [0.0f64; 2];
        let view = SliceMut::from(&mut source[..]);
        view.copy_to(&mut SliceMut::from(&mut target[..]));
        assert_eq!(target, [0.25, 0.5]);
    }
}
