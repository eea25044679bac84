//! # G.711 companding
//!
//! μ-law and A-law compress a 16-bit linear PCM sample into a single byte
//! with a piecewise logarithmic curve. Expansion maps each byte back to the
//! 16-bit linear value at the centre of its quantisation step, so
//! `compress(expand(b)) == b` for every byte.
//!
//! ```rust
//! use wavcodec::companding::{alaw_to_linear, linear_to_alaw, linear_to_ulaw, ulaw_to_linear};
//!
//! let byte = linear_to_ulaw(1000);
//! assert_eq!(linear_to_ulaw(ulaw_to_linear(byte)), byte);
//!
//! let byte = linear_to_alaw(-1000);
//! assert_eq!(linear_to_alaw(alaw_to_linear(byte)), byte);
//! ```

const ULAW_BIAS: i32 = 0x84;
const ULAW_CLIP: i32 = 32635;

/// Segment end points for A-law, on 13-bit magnitudes.
const ALAW_SEG_END: [i32; 8] = [0x1F, 0x3F, 0x7F, 0xFF, 0x1FF, 0x3FF, 0x7FF, 0xFFF];

/// Compresses a 16-bit linear sample to μ-law.
pub const fn linear_to_ulaw(sample: i16) -> u8 {
    let mut pcm = sample as i32;
    let sign = if pcm < 0 {
        pcm = -pcm;
        0x80
    } else {
        0x00
    };
    if pcm > ULAW_CLIP {
        pcm = ULAW_CLIP;
    }
    pcm += ULAW_BIAS;

    // Bit 7 is always set after biasing, so the exponent is in 0..=7.
    let top_bit = 31 - (pcm as u32).leading_zeros() as i32;
    let exponent = top_bit - 7;
    let mantissa = (pcm >> (exponent + 3)) & 0x0F;
    !((sign | (exponent << 4) | mantissa) as u8)
}

/// Expands a μ-law byte to a 16-bit linear sample.
pub const fn ulaw_to_linear(byte: u8) -> i16 {
    let u = !byte;
    let exponent = ((u >> 4) & 0x07) as i32;
    let mantissa = (u & 0x0F) as i32;
    let magnitude = (((mantissa << 3) + ULAW_BIAS) << exponent) - ULAW_BIAS;
    if u & 0x80 != 0 {
        -magnitude as i16
    } else {
        magnitude as i16
    }
}

/// Compresses a 16-bit linear sample to A-law.
pub const fn linear_to_alaw(sample: i16) -> u8 {
    let mut pcm = (sample as i32) >> 3;
    let mask = if pcm >= 0 {
        0xD5
    } else {
        pcm = -pcm - 1;
        0x55
    };

    let mut segment = 0;
    while segment < ALAW_SEG_END.len() && pcm > ALAW_SEG_END[segment] {
        segment += 1;
    }
    if segment >= ALAW_SEG_END.len() {
        return (0x7F ^ mask) as u8;
    }

    let mut value = (segment as i32) << 4;
    if segment < 2 {
        value |= (pcm >> 1) & 0x0F;
    } else {
        value |= (pcm >> segment) & 0x0F;
    }
    (value ^ mask) as u8
}

/// Expands an A-law byte to a 16-bit linear sample.
pub const fn alaw_to_linear(byte: u8) -> i16 {
    let a = (byte ^ 0x55) as i32;
    let mut magnitude = (a & 0x0F) << 4;
    let segment = (a & 0x70) >> 4;
    match segment {
        0 => magnitude += 8,
        1 => magnitude += 0x108,
        _ => {
            magnitude += 0x108;
            magnitude <<= segment - 1;
        }
    }
    if a & 0x80 != 0 {
        magnitude as i16
    } else {
        -magnitude as i16
    }
}
