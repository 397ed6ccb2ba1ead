//! Scalar quantization of wavelet coefficients.
//!
//! A larger step means finer quantization: coefficients are multiplied by the
//! step before rounding and divided by it on reconstruction.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::TRUNCATION_BIAS;

/// Rounding applied after scaling, selected by the second header bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum RoundingMode {
    /// Round half to even.
    Nearest = 0,
    /// Truncate toward zero and reconstruct with [`TRUNCATION_BIAS`].
    Truncate = 1,
}

pub fn quantize_scalar(coeff: f32, step: u32, rounding: RoundingMode) -> f32 {
    let scaled = coeff * step as f32;
    match rounding {
        RoundingMode::Nearest => scaled.round_ties_even(),
        RoundingMode::Truncate => scaled.trunc(),
    }
}

pub fn dequantize_scalar(q: f32, step: u32, rounding: RoundingMode) -> f32 {
    if step == 0 {
        return 0.0;
    }
    let mut value = q;
    if rounding == RoundingMode::Truncate {
        if value < 0.0 {
            value -= TRUNCATION_BIAS;
        } else if value > 0.0 {
            value += TRUNCATION_BIAS;
        }
    }
    value / step as f32
}

pub fn quantize(tile: &mut [f32], step: u32, rounding: RoundingMode) {
    for value in tile.iter_mut() {
        *value = quantize_scalar(*value, step, rounding);
    }
}

pub fn dequantize(tile: &mut [f32], step: u32, rounding: RoundingMode) {
    for value in tile.iter_mut() {
        *value = dequantize_scalar(*value, step, rounding);
    }
}
