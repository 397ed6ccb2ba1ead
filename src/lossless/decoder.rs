//! Lossless decoder, the mirror of [`LosslessEncoder`](crate::lossless::encoder::LosslessEncoder).

use log::debug;

use crate::constants::{LOSSLESS_HEADER_SIZE, ROW_RAW, ROW_RUN_LENGTH};
use crate::error::CodecError;
use crate::image::Image;
use crate::lossless::container::ContainerHeader;
use crate::vli::read_leb128;

const MINIMUM_ROW_BYTES: usize = 2;

pub struct LosslessDecoder;

impl LosslessDecoder {
    /// Adds one run-length coded row of differences onto `line`.
    pub fn decode_row(data: &[u8], position: &mut usize, line: &mut [u8]) -> Result<(), CodecError> {
        let mut x = 0;
        while x < line.len() {
            let diff = *data.get(*position).ok_or(CodecError::Truncated)?;
            *position += 1;
            let repeats = read_leb128(data, position)?;
            let remaining = line.len() - x;
            if repeats >= remaining as u64 {
                return Err(CodecError::invalid_data(format!(
                    "run of {} differences overruns row with {} samples left",
                    repeats.saturating_add(1),
                    remaining
                )));
            }
            let run = repeats as usize + 1;
            for sample in &mut line[x..x + run] {
                *sample = sample.wrapping_add(diff);
            }
            x += run;
        }
        Ok(())
    }

    pub fn decode(data: &[u8]) -> Result<Image, CodecError> {
        let header = ContainerHeader::read(data)?;
        // Every row of every channel takes a flag byte plus at least one more.
        let rows = header.height as usize * header.channels;
        if rows.saturating_mul(MINIMUM_ROW_BYTES) > data.len() - LOSSLESS_HEADER_SIZE {
            return Err(CodecError::Truncated);
        }
        let mut image = Image::new(header.width, header.height, header.channels)?;
        let width = header.width as usize;
        let channels = header.channels;
        debug!("decoding {}x{} image, {} channel(s)", header.width, header.height, channels);

        let mut position = LOSSLESS_HEADER_SIZE;
        let mut lines = vec![vec![0u8; width]; channels];
        for row in image.pixels.chunks_exact_mut(width * channels) {
            for (channel, line) in lines.iter_mut().enumerate() {
                let flag = *data.get(position).ok_or(CodecError::Truncated)?;
                position += 1;
                match flag {
                    ROW_RAW => {
                        let raw = data.get(position..position + width).ok_or(CodecError::Truncated)?;
                        line.copy_from_slice(raw);
                        position += width;
                    }
                    ROW_RUN_LENGTH => Self::decode_row(data, &mut position, line)?,
                    other => return Err(CodecError::invalid_data(format!("unknown row flag {}", other))),
                }
                for (out, &value) in row.iter_mut().skip(channel).step_by(channels).zip(line.iter()) {
                    *out = value;
                }
            }
        }
        Ok(image)
    }
}
