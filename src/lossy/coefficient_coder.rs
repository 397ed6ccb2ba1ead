//! Hilbert-ordered zero-run coding of quantized tile coefficients.
//!
//! Tokens, in scan order:
//! - non-zero coefficient: `VLI(magnitude)`, then one sign bit (1 = negative)
//! - run of `n` zeros: `VLI(0)`, then `VLI(n - 1)`
//!
//! A trailing run is always written, so a tile ends exactly when the scan
//! position reaches the tile size.

use std::io::Write;

use crate::bit_io::{BitReader, BitWriter};
use crate::error::CodecError;
use crate::lossy::hilbert::HilbertCurve;
use crate::vli::{get_vli, put_vli};

const ZERO_MARKER: u64 = 0;

fn put_zero_run<W: Write>(writer: &mut BitWriter<W>, run: usize) -> Result<(), CodecError> {
    put_vli(writer, ZERO_MARKER)?;
    put_vli(writer, (run - 1) as u64)
}

/// Writes the quantized (integer valued) `coeffs` of one tile.
pub fn encode_tile<W: Write>(writer: &mut BitWriter<W>, coeffs: &[f32], curve: &HilbertCurve) -> Result<(), CodecError> {
    let pixels = curve.offsets().len();
    debug_assert_eq!(coeffs.len(), pixels);
    let mut last = 0;
    for (scan, &offset) in curve.offsets().iter().enumerate() {
        let value = coeffs[offset];
        if value == 0.0 {
            continue;
        }
        if scan > last {
            put_zero_run(writer, scan - last)?;
        }
        last = scan + 1;
        put_vli(writer, value.abs() as u64)?;
        writer.write_bit(value < 0.0)?;
    }
    if last < pixels {
        put_zero_run(writer, pixels - last)?;
    }
    Ok(())
}

/// Reads one tile worth of coefficients into `coeffs` (row-major).
pub fn decode_tile(reader: &mut BitReader, coeffs: &mut [f32], curve: &HilbertCurve) -> Result<(), CodecError> {
    debug_assert_eq!(coeffs.len(), curve.offsets().len());
    let pixels = coeffs.len() as u64;
    coeffs.fill(0.0);
    let mut scan = 0u64;
    while scan < pixels {
        let magnitude = get_vli(reader)?;
        if magnitude == ZERO_MARKER {
            let run = get_vli(reader)?.saturating_add(1);
            if run > pixels - scan {
                return Err(CodecError::invalid_data(format!(
                    "zero run of {} exceeds tile end at scan position {}",
                    run, scan
                )));
            }
            scan += run;
        } else {
            let negative = reader.read_bit()?;
            let value = magnitude as f32;
            coeffs[curve.offset(scan as usize)] = if negative { -value } else { value };
            scan += 1;
        }
    }
    Ok(())
}
