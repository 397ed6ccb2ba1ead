//! Lossy stream header.
//!
//! Layout, bit level and in order: wavelet bit, rounding bit, width, height,
//! tile edge length and three quantizer steps, all but the first two as VLIs.
//! Single channel streams store 0 in quantizer slots 1 and 2.

use std::io::Write;

use crate::bit_io::{BitReader, BitWriter};
use crate::constants::{MAXIMUM_CHANNEL_COUNT, MAXIMUM_LOSSY_DIMENSION, MAXIMUM_TILE_LENGTH, MINIMUM_TILE_LENGTH};
use crate::error::CodecError;
use crate::lossy::quantization::RoundingMode;
use crate::lossy::wavelet::WaveletKind;
use crate::vli::{get_vli, put_vli};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub wavelet: WaveletKind,
    pub rounding: RoundingMode,
    pub width: u32,
    pub height: u32,
    pub tile_length: u32,
    pub quantizers: [u32; MAXIMUM_CHANNEL_COUNT],
}

pub fn validate_tile_length(tile_length: u32) -> Result<(), CodecError> {
    if !tile_length.is_power_of_two() || !(MINIMUM_TILE_LENGTH..=MAXIMUM_TILE_LENGTH).contains(&tile_length) {
        return Err(CodecError::invalid_config(format!(
            "tile length {} is not a power of two in {}..={}",
            tile_length, MINIMUM_TILE_LENGTH, MAXIMUM_TILE_LENGTH
        )));
    }
    Ok(())
}

fn read_u32(reader: &mut BitReader, what: &str) -> Result<u32, CodecError> {
    let value = get_vli(reader)?;
    u32::try_from(value).map_err(|_| CodecError::invalid_data(format!("{} {} out of range", what, value)))
}

impl StreamHeader {
    /// Channel count implied by the quantizer slots.
    pub fn channel_count(&self) -> usize {
        if self.quantizers[1] == 0 && self.quantizers[2] == 0 { 1 } else { 3 }
    }

    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<(), CodecError> {
        writer.write_bit(self.wavelet == WaveletKind::Cdf97)?;
        writer.write_bit(self.rounding == RoundingMode::Truncate)?;
        put_vli(writer, u64::from(self.width))?;
        put_vli(writer, u64::from(self.height))?;
        put_vli(writer, u64::from(self.tile_length))?;
        for &quant in &self.quantizers {
            put_vli(writer, u64::from(quant))?;
        }
        Ok(())
    }

    pub fn read(reader: &mut BitReader) -> Result<Self, CodecError> {
        let wavelet = if reader.read_bit()? { WaveletKind::Cdf97 } else { WaveletKind::Haar };
        let rounding = if reader.read_bit()? { RoundingMode::Truncate } else { RoundingMode::Nearest };
        let width = read_u32(reader, "width")?;
        let height = read_u32(reader, "height")?;
        let tile_length = read_u32(reader, "tile length")?;
        let mut quantizers = [0u32; MAXIMUM_CHANNEL_COUNT];
        for quant in quantizers.iter_mut() {
            *quant = read_u32(reader, "quantizer")?;
        }
        let header = Self {
            wavelet,
            rounding,
            width,
            height,
            tile_length,
            quantizers,
        };
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Result<(), CodecError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAXIMUM_LOSSY_DIMENSION {
                return Err(CodecError::unsupported(format!("{} {} out of range", name, value)));
            }
        }
        validate_tile_length(self.tile_length).map_err(|e| CodecError::invalid_data(e.to_string()))?;
        let q = &self.quantizers;
        let single = q[0] != 0 && q[1] == 0 && q[2] == 0;
        let triple = q.iter().all(|&step| step != 0);
        if !single && !triple {
            return Err(CodecError::invalid_data(format!("inconsistent quantizer steps {:?}", q)));
        }
        Ok(())
    }
}
