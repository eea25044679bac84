//! Core sample slice representation.
//!
//! This module provides the closed set of sample-slice variants every decoder
//! and encoder in the crate works with. A slice is a contiguous run of one
//! fixed-width element type; the variant is part of the value, so code can
//! either match on it for zero-loss typed access or go through the normalized
//! `f64` view for format-independent access.
//!
//! # Architecture Overview
//!
//! - [`SampleFormat`] - tag naming one of the seven variants
//! - [`SliceRef`] - shared view (`&[T]`) over samples of one variant
//! - [`SliceMut`] - exclusive view (`&mut [T]`) over samples of one variant
//! - [`Samples`] - owned, growable storage (`Vec<T>`) of one variant
//!
//! Sub-slicing never copies: `slice(lo, hi)` re-borrows the same storage, so
//! writes through a [`SliceMut`] sub-slice are visible through the parent once
//! the borrow ends.
//!
//! # Examples
//!
//! ```rust
//! use wavcodec::{SampleFormat, Samples};
//!
//! let mut samples = Samples::new(SampleFormat::Int16, 4);
//! samples.set(1, 0.5);
//! assert_eq!(samples.at(1), 16384.0 / 32767.0);
//!
//! // Zero-copy view over the last two samples.
//! let mut view = samples.slice_mut(2, 4);
//! view.set(0, -1.0);
//! assert_eq!(samples.at(2), -1.0);
//! ```
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{ALaw, MuLaw, Sample};

/// Identifies one of the seven sample variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleFormat {
    /// 8-bit unsigned offset-binary PCM.
    Uint8,
    /// 16-bit signed PCM.
    Int16,
    /// 32-bit signed PCM.
    Int32,
    /// 32-bit IEEE float.
    Float32,
    /// 64-bit IEEE float.
    Float64,
    /// 8-bit G.711 μ-law.
    MuLaw,
    /// 8-bit G.711 A-law.
    ALaw,
}

impl SampleFormat {
    /// Every variant, in declaration order.
    pub const ALL: [SampleFormat; 7] = [
        SampleFormat::Uint8,
        SampleFormat::Int16,
        SampleFormat::Int32,
        SampleFormat::Float32,
        SampleFormat::Float64,
        SampleFormat::MuLaw,
        SampleFormat::ALaw,
    ];

    /// Size of one element in bytes.
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::Uint8 | SampleFormat::MuLaw | SampleFormat::ALaw => 1,
            SampleFormat::Int16 => 2,
            SampleFormat::Int32 | SampleFormat::Float32 => 4,
            SampleFormat::Float64 => 8,
        }
    }

    /// Short symbolic name.
    pub const fn as_str(self) -> &'static str {
        match self {
            SampleFormat::Uint8 => "u8",
            SampleFormat::Int16 => "i16",
            SampleFormat::Int32 => "i32",
            SampleFormat::Float32 => "f32",
            SampleFormat::Float64 => "f64",
            SampleFormat::MuLaw => "mulaw",
            SampleFormat::ALaw => "alaw",
        }
    }
}

impl Display for SampleFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Expands `$body` once per variant with `$s` bound to the inner slice or vec.
macro_rules! each_variant {
    ($enum:ident, $value:expr, $s:ident => $body:expr) => {
        match $value {
            $enum::Uint8($s) => $body,
            $enum::Int16($s) => $body,
            $enum::Int32($s) => $body,
            $enum::Float32($s) => $body,
            $enum::Float64($s) => $body,
            $enum::MuLaw($s) => $body,
            $enum::ALaw($s) => $body,
        }
    };
}

/// Same as `each_variant!` but rewraps the result in the variant `$out`.
macro_rules! map_variant {
    ($enum:ident => $out:ident, $value:expr, $s:ident => $body:expr) => {
        match $value {
            $enum::Uint8($s) => $out::Uint8($body),
            $enum::Int16($s) => $out::Int16($body),
            $enum::Int32($s) => $out::Int32($body),
            $enum::Float32($s) => $out::Float32($body),
            $enum::Float64($s) => $out::Float64($body),
            $enum::MuLaw($s) => $out::MuLaw($body),
            $enum::ALaw($s) => $out::ALaw($body),
        }
    };
}

pub(crate) use each_variant;

/// A shared view over samples of one variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliceRef<'a> {
    /// 8-bit unsigned samples.
    Uint8(&'a [u8]),
    /// 16-bit signed samples.
    Int16(&'a [i16]),
    /// 32-bit signed samples.
    Int32(&'a [i32]),
    /// 32-bit float samples.
    Float32(&'a [f32]),
    /// 64-bit float samples.
    Float64(&'a [f64]),
    /// μ-law samples.
    MuLaw(&'a [MuLaw]),
    /// A-law samples.
    ALaw(&'a [ALaw]),
}

/// An exclusive view over samples of one variant.
#[derive(Debug, PartialEq)]
pub enum SliceMut<'a> {
    /// 8-bit unsigned samples.
    Uint8(&'a mut [u8]),
    /// 16-bit signed samples.
    Int16(&'a mut [i16]),
    /// 32-bit signed samples.
    Int32(&'a mut [i32]),
    /// 32-bit float samples.
    Float32(&'a mut [f32]),
    /// 64-bit float samples.
    Float64(&'a mut [f64]),
    /// μ-law samples.
    MuLaw(&'a mut [MuLaw]),
    /// A-law samples.
    ALaw(&'a mut [ALaw]),
}

/// Owned samples of one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Samples {
    /// 8-bit unsigned samples.
    Uint8(Vec<u8>),
    /// 16-bit signed samples.
    Int16(Vec<i16>),
    /// 32-bit signed samples.
    Int32(Vec<i32>),
    /// 32-bit float samples.
    Float32(Vec<f32>),
    /// 64-bit float samples.
    Float64(Vec<f64>),
    /// μ-law samples.
    MuLaw(Vec<MuLaw>),
    /// A-law samples.
    ALaw(Vec<ALaw>),
}

impl<'a> SliceRef<'a> {
    /// Variant of this slice.
    pub const fn format(&self) -> SampleFormat {
        match self {
            SliceRef::Uint8(_) => SampleFormat::Uint8,
            SliceRef::Int16(_) => SampleFormat::Int16,
            SliceRef::Int32(_) => SampleFormat::Int32,
            SliceRef::Float32(_) => SampleFormat::Float32,
            SliceRef::Float64(_) => SampleFormat::Float64,
            SliceRef::MuLaw(_) => SampleFormat::MuLaw,
            SliceRef::ALaw(_) => SampleFormat::ALaw,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        each_variant!(SliceRef, self, s => s.len())
    }

    /// Returns true if the slice holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalized value of sample `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn at(&self, i: usize) -> f64 {
        each_variant!(SliceRef, self, s => s[i].to_f64())
    }

    /// Zero-copy view over samples `lo..hi`.
    ///
    /// # Panics
    /// Panics if `lo > hi` or `hi > self.len()`.
    pub fn slice(&self, lo: usize, hi: usize) -> SliceRef<'a> {
        map_variant!(SliceRef => SliceRef, *self, s => &s[lo..hi])
    }

    /// Owned zero-filled buffer of the same variant.
    pub fn make(&self, len: usize) -> Samples {
        Samples::new(self.format(), len)
    }

    /// Copies the samples into a new owned buffer of the same variant.
    pub fn to_samples(&self) -> Samples {
        map_variant!(SliceRef => Samples, *self, s => s.to_vec())
    }

    /// Raw bytes of the slice in native byte order.
    pub fn as_bytes(&self) -> &'a [u8] {
        each_variant!(SliceRef, *self, s => bytemuck::cast_slice(s))
    }
}

impl<'a> SliceMut<'a> {
    /// Variant of this slice.
    pub fn format(&self) -> SampleFormat {
        self.as_ref().format()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        each_variant!(SliceMut, self, s => s.len())
    }

    /// Returns true if the slice holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalized value of sample `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn at(&self, i: usize) -> f64 {
        each_variant!(SliceMut, self, s => s[i].to_f64())
    }

    /// Stores the sample nearest to the normalized value `value` at `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn set(&mut self, i: usize, value: f64) {
        each_variant!(SliceMut, self, s => s[i] = Sample::from_f64(value))
    }

    /// Raw bytes of the slice in native byte order, writable.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        each_variant!(SliceMut, self, s => bytemuck::cast_slice_mut(&mut **s))
    }

    /// Shared view over the same samples.
    pub fn as_ref(&self) -> SliceRef<'_> {
        map_variant!(SliceMut => SliceRef, self, s => &**s)
    }

    /// Re-borrows the whole slice for a shorter lifetime.
    pub fn reborrow(&mut self) -> SliceMut<'_> {
        map_variant!(SliceMut => SliceMut, self, s => &mut **s)
    }

    /// Zero-copy exclusive view over samples `lo..hi`.
    ///
    /// # Panics
    /// Panics if `lo > hi` or `hi > self.len()`.
    pub fn slice(&mut self, lo: usize, hi: usize) -> SliceMut<'_> {
        map_variant!(SliceMut => SliceMut, self, s => &mut s[lo..hi])
    }

    /// Consumes the view, returning one over samples `lo..hi` with the full
    /// lifetime.
    pub fn into_slice(self, lo: usize, hi: usize) -> SliceMut<'a> {
        map_variant!(SliceMut => SliceMut, self, s => &mut s[lo..hi])
    }

    /// Owned zero-filled buffer of the same variant.
    pub fn make(&self, len: usize) -> Samples {
        Samples::new(self.format(), len)
    }
}

impl Samples {
    /// Zero-filled buffer of `len` samples.
    ///
    /// "Zero" is the variant's silence: 128 for `Uint8` and the encoded
    /// silence byte for the companded variants.
    pub fn new(format: SampleFormat, len: usize) -> Self {
        let mut samples = Self::with_capacity(format, len);
        samples.resize(len);
        samples
    }

    /// Empty buffer with room for `capacity` samples.
    pub fn with_capacity(format: SampleFormat, capacity: usize) -> Self {
        match format {
            SampleFormat::Uint8 => Samples::Uint8(Vec::with_capacity(capacity)),
            SampleFormat::Int16 => Samples::Int16(Vec::with_capacity(capacity)),
            SampleFormat::Int32 => Samples::Int32(Vec::with_capacity(capacity)),
            SampleFormat::Float32 => Samples::Float32(Vec::with_capacity(capacity)),
            SampleFormat::Float64 => Samples::Float64(Vec::with_capacity(capacity)),
            SampleFormat::MuLaw => Samples::MuLaw(Vec::with_capacity(capacity)),
            SampleFormat::ALaw => Samples::ALaw(Vec::with_capacity(capacity)),
        }
    }

    /// Variant of this buffer.
    pub fn format(&self) -> SampleFormat {
        self.as_slice().format()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        each_variant!(Samples, self, s => s.len())
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalized value of sample `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn at(&self, i: usize) -> f64 {
        self.as_slice().at(i)
    }

    /// Stores the sample nearest to `value` at `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn set(&mut self, i: usize, value: f64) {
        self.as_mut_slice().set(i, value);
    }

    /// Resizes to `len` samples, filling new slots with silence.
    pub fn resize(&mut self, len: usize) {
        each_variant!(Samples, self, s => s.resize(len, Sample::from_f64(0.0)))
    }

    /// Removes every sample, keeping the allocation.
    pub fn clear(&mut self) {
        each_variant!(Samples, self, s => s.clear())
    }

    /// Shared view over the whole buffer.
    pub fn as_slice(&self) -> SliceRef<'_> {
        map_variant!(Samples => SliceRef, self, s => s.as_slice())
    }

    /// Exclusive view over the whole buffer.
    pub fn as_mut_slice(&mut self) -> SliceMut<'_> {
        map_variant!(Samples => SliceMut, self, s => s.as_mut_slice())
    }

    /// Zero-copy view over samples `lo..hi`.
    pub fn slice(&self, lo: usize, hi: usize) -> SliceRef<'_> {
        self.as_slice().slice(lo, hi)
    }

    /// Zero-copy exclusive view over samples `lo..hi`.
    pub fn slice_mut(&mut self, lo: usize, hi: usize) -> SliceMut<'_> {
        self.as_mut_slice().into_slice(lo, hi)
    }

    /// Zero-filled buffer of the same variant.
    pub fn make(&self, len: usize) -> Samples {
        Samples::new(self.format(), len)
    }

    /// Appends every sample of `other`, converting when the variants differ.
    pub fn extend_from(&mut self, other: &SliceRef<'_>) {
        let start = self.len();
        self.resize(start + other.len());
        other.copy_to(&mut self.slice_mut(start, start + other.len()));
    }
}

/// Generates `From` conversions from typed slices and vectors.
macro_rules! impl_from_typed {
    ($type:ty, $variant:ident) => {
        impl<'a> From<&'a [$type]> for SliceRef<'a> {
            fn from(value: &'a [$type]) -> Self {
                SliceRef::$variant(value)
            }
        }

        impl<'a> From<&'a mut [$type]> for SliceMut<'a> {
            fn from(value: &'a mut [$type]) -> Self {
                SliceMut::$variant(value)
            }
        }

        impl From<Vec<$type>> for Samples {
            fn from(value: Vec<$type>) -> Self {
                Samples::$variant(value)
            }
        }
    };
}

impl_from_typed!(u8, Uint8);
impl_from_typed!(i16, Int16);
impl_from_typed!(i32, Int32);
impl_from_typed!(f32, Float32);
impl_from_typed!(f64, Float64);
impl_from_typed!(MuLaw, MuLaw);
impl_from_typed!(ALaw, ALaw);

impl<'a> From<&'a Samples> for SliceRef<'a> {
    fn from(value: &'a Samples) -> Self {
        value.as_slice()
    }
}

impl<'a> From<&'a mut Samples> for SliceMut<'a> {
    fn from(value: &'a mut Samples) -> Self {
        value.as_mut_slice()
    }
}
