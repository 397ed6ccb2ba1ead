//! Lossless encoder: vertical delta per row, run-length coded per channel.

use log::{debug, info};

use crate::constants::{ROW_RAW, ROW_RUN_LENGTH};
use crate::error::CodecError;
use crate::image::Image;
use crate::lossless::container::ContainerHeader;
use crate::vli::write_leb128;

pub struct LosslessEncoder;

impl LosslessEncoder {
    /// Run-length codes the differences between `values` and `line`, then replaces `line` with `values`.
    ///
    /// Every distinct difference is followed by the number of immediate repeats.
    pub fn encode_row(line: &mut [u8], values: impl Iterator<Item = u8>, stream: &mut Vec<u8>) {
        stream.clear();
        let mut previous = None;
        let mut count = 0u64;
        for (sample, value) in line.iter_mut().zip(values) {
            let diff = value.wrapping_sub(*sample);
            *sample = value;
            if previous == Some(diff) {
                count += 1;
                continue;
            }
            if previous.is_some() {
                write_leb128(stream, count);
            }
            stream.push(diff);
            previous = Some(diff);
            count = 0;
        }
        write_leb128(stream, count);
    }

    pub fn encode(image: &Image) -> Result<Vec<u8>, CodecError> {
        let header = ContainerHeader {
            width: image.width,
            height: image.height,
            channels: image.channels,
        };
        let width = image.width as usize;
        let channels = image.channels;

        let mut out = Vec::with_capacity(image.pixels.len() / 2);
        header.write(&mut out)?;

        let mut lines = vec![vec![0u8; width]; channels];
        let mut stream = Vec::with_capacity(2 * width);
        let mut raw_rows = 0usize;
        for row in image.pixels.chunks_exact(width * channels) {
            for (channel, line) in lines.iter_mut().enumerate() {
                let values = row.iter().skip(channel).step_by(channels).copied();
                Self::encode_row(line, values, &mut stream);
                if stream.len() >= width {
                    out.push(ROW_RAW);
                    out.extend_from_slice(line);
                    raw_rows += 1;
                } else {
                    out.push(ROW_RUN_LENGTH);
                    out.extend_from_slice(&stream);
                }
            }
        }
        debug!("{} of {} rows stored raw", raw_rows, image.height as usize * channels);
        info!("{} bytes encoded", out.len());
        Ok(out)
    }
}
