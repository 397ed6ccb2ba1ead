//! Discrete Wavelet Transforms for square tiles.
//!
//! Both kernels work on even length signals and store the low pass half in
//! front of the high pass half. The 2-D driver applies them separably (rows,
//! then columns) and recurses into the top-left low/low quadrant:
//!
//! ```text
//! +-------+-------+
//! |  LL   |  HL   |  <- low-pass rows (top half)
//! +-------+-------+
//! |  LH   |  HH   |  <- high-pass rows (bottom half)
//! +-------+-------+
//! ```

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::f32::consts::FRAC_1_SQRT_2;

/// Kernel selected by the first header bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum WaveletKind {
    Haar = 0,
    Cdf97 = 1,
}

pub struct Haar;

impl Haar {
    /// Orthonormal Haar step: sums to the front half, differences to the back.
    pub fn forward(signal: &mut [f32], scratch: &mut Vec<f32>) {
        let half = signal.len() / 2;
        scratch.clear();
        scratch.extend_from_slice(signal);
        for i in 0..half {
            let a = scratch[2 * i];
            let b = scratch[2 * i + 1];
            signal[i] = (a + b) * FRAC_1_SQRT_2;
            signal[half + i] = (a - b) * FRAC_1_SQRT_2;
        }
    }

    pub fn inverse(coeffs: &mut [f32], scratch: &mut Vec<f32>) {
        let half = coeffs.len() / 2;
        scratch.clear();
        scratch.extend_from_slice(coeffs);
        for i in 0..half {
            let s = scratch[i];
            let d = scratch[half + i];
            coeffs[2 * i] = (s + d) * FRAC_1_SQRT_2;
            coeffs[2 * i + 1] = (s - d) * FRAC_1_SQRT_2;
        }
    }
}

pub struct Cdf97;

impl Cdf97 {
    // 9/7 Filter Constants
    const ALPHA: f32 = -1.586_134_3;
    const BETA: f32 = -0.052_980_12;
    const GAMMA: f32 = 0.882_911_1;
    const DELTA: f32 = 0.443_506_87;
    const K: f32 = 1.230_174_1;
    const INV_K: f32 = 1.0 / 1.230_174_1;

    // Lifting over whole-sample symmetric extension: x[-1] = x[1], x[len] = x[len - 2].
    fn lift_odd(x: &mut [f32], weight: f32) {
        let len = x.len();
        for i in (1..len).step_by(2) {
            let left = x[i - 1];
            let right = if i + 1 < len { x[i + 1] } else { x[i - 1] };
            x[i] += weight * (left + right);
        }
    }

    fn lift_even(x: &mut [f32], weight: f32) {
        let len = x.len();
        for i in (0..len).step_by(2) {
            let left = if i > 0 { x[i - 1] } else { x[i + 1] };
            let right = if i + 1 < len { x[i + 1] } else { x[i - 1] };
            x[i] += weight * (left + right);
        }
    }

    pub fn forward(signal: &mut [f32], scratch: &mut Vec<f32>) {
        let half = signal.len() / 2;
        scratch.clear();
        scratch.extend_from_slice(signal);
        let x = scratch.as_mut_slice();

        Self::lift_odd(x, Self::ALPHA);
        Self::lift_even(x, Self::BETA);
        Self::lift_odd(x, Self::GAMMA);
        Self::lift_even(x, Self::DELTA);

        // Scaling and de-interleave
        for i in 0..half {
            signal[i] = x[2 * i] * Self::INV_K;
            signal[half + i] = x[2 * i + 1] * Self::K;
        }
    }

    pub fn inverse(coeffs: &mut [f32], scratch: &mut Vec<f32>) {
        let half = coeffs.len() / 2;
        scratch.clear();
        scratch.resize(coeffs.len(), 0.0);
        let x = scratch.as_mut_slice();

        // Interleave and undo scaling
        for i in 0..half {
            x[2 * i] = coeffs[i] * Self::K;
            x[2 * i + 1] = coeffs[half + i] * Self::INV_K;
        }

        // Inverse Lifting (Reverse Order, Reverse Signs)
        Self::lift_even(x, -Self::DELTA);
        Self::lift_odd(x, -Self::GAMMA);
        Self::lift_even(x, -Self::BETA);
        Self::lift_odd(x, -Self::ALPHA);

        coeffs.copy_from_slice(x);
    }
}

impl WaveletKind {
    fn forward_1d(self, signal: &mut [f32], scratch: &mut Vec<f32>) {
        match self {
            WaveletKind::Haar => Haar::forward(signal, scratch),
            WaveletKind::Cdf97 => Cdf97::forward(signal, scratch),
        }
    }

    fn inverse_1d(self, coeffs: &mut [f32], scratch: &mut Vec<f32>) {
        match self {
            WaveletKind::Haar => Haar::inverse(coeffs, scratch),
            WaveletKind::Cdf97 => Cdf97::inverse(coeffs, scratch),
        }
    }
}

/// Reusable line buffers for the 2-D driver.
#[derive(Default)]
pub struct WaveletScratch {
    line: Vec<f32>,
    lifting: Vec<f32>,
}

fn rows(kind: WaveletKind, tile: &mut [f32], length: usize, size: usize, scratch: &mut WaveletScratch, inverse: bool) {
    for y in 0..size {
        let row = &mut tile[y * length..y * length + size];
        if inverse {
            kind.inverse_1d(row, &mut scratch.lifting);
        } else {
            kind.forward_1d(row, &mut scratch.lifting);
        }
    }
}

fn columns(kind: WaveletKind, tile: &mut [f32], length: usize, size: usize, scratch: &mut WaveletScratch, inverse: bool) {
    for x in 0..size {
        scratch.line.clear();
        scratch.line.extend((0..size).map(|y| tile[y * length + x]));
        if inverse {
            kind.inverse_1d(&mut scratch.line, &mut scratch.lifting);
        } else {
            kind.forward_1d(&mut scratch.line, &mut scratch.lifting);
        }
        for (y, &value) in scratch.line.iter().enumerate() {
            tile[y * length + x] = value;
        }
    }
}

/// Forward 2-D transform of a `length` x `length` tile, `levels` deep, in place.
pub fn forward_2d(kind: WaveletKind, tile: &mut [f32], length: usize, levels: u32, scratch: &mut WaveletScratch) {
    debug_assert_eq!(tile.len(), length * length);
    for level in 0..levels {
        let size = length >> level;
        if size < 2 {
            break;
        }
        rows(kind, tile, length, size, scratch, false);
        columns(kind, tile, length, size, scratch, false);
    }
}

/// Inverse of [`forward_2d`] with the same `levels`.
pub fn inverse_2d(kind: WaveletKind, tile: &mut [f32], length: usize, levels: u32, scratch: &mut WaveletScratch) {
    debug_assert_eq!(tile.len(), length * length);
    for level in (0..levels).rev() {
        let size = length >> level;
        if size < 2 {
            continue;
        }
        columns(kind, tile, length, size, scratch, true);
        rows(kind, tile, length, size, scratch, true);
    }
}
