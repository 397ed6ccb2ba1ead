//! Tile-predicted wavelet decoder orchestration.

use log::debug;

use crate::bit_io::BitReader;
use crate::color::{self, Plane};
use crate::error::CodecError;
use crate::image::Image;
use crate::lossy::coefficient_coder::decode_tile;
use crate::lossy::header::StreamHeader;
use crate::lossy::pipeline::TilePipeline;
use crate::lossy::predictor::{DIRECTION_BITS, Direction};
use crate::lossy::tile::TileGrid;

// Direction code plus the shortest tile body, VLI(0) and VLI(run - 1).
const MINIMUM_TILE_BITS: u64 = DIRECTION_BITS as u64 + 16;

pub struct TileDecoder<'a> {
    reader: BitReader<'a>,
    header: Option<StreamHeader>,
}

impl<'a> TileDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: BitReader::new(data),
            header: None,
        }
    }

    /// Parses the stream header; later calls return the cached header.
    pub fn read_header(&mut self) -> Result<StreamHeader, CodecError> {
        if let Some(header) = self.header {
            return Ok(header);
        }
        let header = StreamHeader::read(&mut self.reader)?;
        self.header = Some(header);
        Ok(header)
    }

    fn read_direction(&mut self, col: usize, row: usize) -> Result<Direction, CodecError> {
        let code = self.reader.read_bits(DIRECTION_BITS)? as u8;
        let direction = Direction::try_from(code)
            .map_err(|_| CodecError::invalid_data(format!("invalid direction code {}", code)))?;
        if !direction.is_available(col, row) {
            return Err(CodecError::invalid_data(format!(
                "direction {:?} used by tile ({}, {}) has no neighbour",
                direction, col, row
            )));
        }
        Ok(direction)
    }

    /// Decodes the whole image.
    pub fn decode(&mut self) -> Result<Image, CodecError> {
        self.decode_tiles(|_, _, _, _| {})
    }

    /// Decodes the whole image, reporting (`col`, `row`, `channel`, direction) for every tile.
    fn decode_tiles(&mut self, mut on_tile: impl FnMut(usize, usize, usize, Direction)) -> Result<Image, CodecError> {
        let header = self.read_header()?;
        let channels = header.channel_count();
        let grid = TileGrid::new(header.width as usize, header.height as usize, header.tile_length as usize);

        // A header claiming more tiles than the remaining bits can hold never allocates planes.
        let tiles = (grid.rows * grid.cols * channels) as u64;
        if tiles.saturating_mul(MINIMUM_TILE_BITS) > self.reader.bits_remaining() {
            return Err(CodecError::Truncated);
        }

        let mut pipeline = TilePipeline::new(&header, channels);
        debug!(
            "decoding {}x{} image, {} channel(s), {:?} wavelet, {:?} rounding",
            header.width, header.height, channels, header.wavelet, header.rounding
        );

        let mut planes: Vec<Plane> = vec![vec![0.0; grid.width * grid.height]; channels];
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                for (channel, plane) in planes.iter_mut().enumerate() {
                    let step = header.quantizers[channel];
                    let direction = self.read_direction(col, row)?;
                    on_tile(col, row, channel, direction);
                    decode_tile(&mut self.reader, &mut pipeline.tile, &pipeline.curve)?;
                    pipeline.reconstruct(channel, col, direction, step);
                    grid.copy_out(&pipeline.tile, col, row, plane);
                }
            }
            pipeline.advance_row();
        }
        debug!("{} bits decoded", self.reader.bits_read());
        color::to_display_space(&planes, header.width, header.height)
    }
}
