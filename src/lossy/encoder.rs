//! Tile-predicted wavelet encoder orchestration.

use std::io::Write;

use log::{debug, info, warn};

use crate::bit_io::BitWriter;
use crate::color;
use crate::constants::{DEFAULT_QUANTIZERS, DEFAULT_TILE_LENGTH, MAXIMUM_LOSSY_DIMENSION};
use crate::error::CodecError;
use crate::image::Image;
use crate::lossy::coefficient_coder::encode_tile;
use crate::lossy::header::{StreamHeader, validate_tile_length};
use crate::lossy::pipeline::TilePipeline;
use crate::lossy::predictor::DIRECTION_BITS;
use crate::lossy::quantization::RoundingMode;
use crate::lossy::wavelet::WaveletKind;

/// Encoder settings, written to the stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    pub wavelet: WaveletKind,
    pub rounding: RoundingMode,
    pub tile_length: u32,
    /// Quantizer step per channel slot (Y, Cb, Cr); a larger step keeps more detail.
    pub quantizers: [u32; 3],
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            wavelet: WaveletKind::Cdf97,
            rounding: RoundingMode::Truncate,
            tile_length: DEFAULT_TILE_LENGTH,
            quantizers: DEFAULT_QUANTIZERS,
        }
    }
}

impl EncoderConfig {
    pub fn validate(&self, channels: usize) -> Result<(), CodecError> {
        validate_tile_length(self.tile_length)?;
        if let Some(channel) = self.quantizers[..channels].iter().position(|&step| step == 0) {
            return Err(CodecError::invalid_config(format!(
                "quantizer step of channel {} must not be zero",
                channel
            )));
        }
        Ok(())
    }

    fn header_for(&self, image: &Image) -> StreamHeader {
        let quantizers = if image.channels == 1 {
            if self.quantizers[1..].iter().any(|&step| step != 0) {
                warn!("single channel image, ignoring chroma quantizer steps {:?}", &self.quantizers[1..]);
            }
            [self.quantizers[0], 0, 0]
        } else {
            self.quantizers
        };
        StreamHeader {
            wavelet: self.wavelet,
            rounding: self.rounding,
            width: image.width,
            height: image.height,
            tile_length: self.tile_length,
            quantizers,
        }
    }
}

pub struct TileEncoder {
    config: EncoderConfig,
}

impl TileEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Encodes `image` into `sink` and returns the number of bits written.
    pub fn encode<W: Write>(&self, image: &Image, sink: W) -> Result<u64, CodecError> {
        let channels = image.channels;
        self.config.validate(channels)?;
        if image.width > MAXIMUM_LOSSY_DIMENSION || image.height > MAXIMUM_LOSSY_DIMENSION {
            return Err(CodecError::unsupported(format!(
                "max supported width or height is {}",
                MAXIMUM_LOSSY_DIMENSION
            )));
        }

        let header = self.config.header_for(image);
        let planes = color::to_working_space(image);
        let mut pipeline = TilePipeline::new(&header, channels);
        let grid = pipeline.grid;
        debug!(
            "encoding {}x{} image, {} channel(s), {}x{} tiles of {}",
            image.width, image.height, channels, grid.cols, grid.rows, grid.length
        );

        let mut writer = BitWriter::new(sink);
        header.write(&mut writer)?;

        for row in 0..grid.rows {
            for col in 0..grid.cols {
                for (channel, plane) in planes.iter().enumerate() {
                    let step = header.quantizers[channel];
                    let direction = pipeline.analyze(plane, channel, col, row, step);
                    writer.write_bits(u64::from(u8::from(direction)), DIRECTION_BITS)?;
                    encode_tile(&mut writer, &pipeline.tile, &pipeline.curve)?;
                    pipeline.reconstruct(channel, col, direction, step);
                }
            }
            pipeline.advance_row();
            debug!("tile row {} done, {} bits so far", row, writer.bits_written());
        }

        let bits = writer.finish()?;
        info!("{} bits encoded", bits);
        Ok(bits)
    }
}
