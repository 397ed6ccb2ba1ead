//! Per-tile work shared by the encoder and decoder.
//!
//! The encoder runs `analyze` and then `reconstruct` on every tile, the
//! decoder only `reconstruct`. Both therefore leave bit-identical blocks in
//! the row buffers, which keeps prediction in sync despite quantization.

use crate::constants::DECOMPOSITION_LEVELS;
use crate::lossy::header::StreamHeader;
use crate::lossy::hilbert::HilbertCurve;
use crate::lossy::predictor::{self, Direction, RowBuffers};
use crate::lossy::quantization::{self, RoundingMode};
use crate::lossy::tile::TileGrid;
use crate::lossy::wavelet::{self, WaveletKind, WaveletScratch};

pub(crate) struct TilePipeline {
    pub grid: TileGrid,
    pub curve: HilbertCurve,
    /// Working tile: pixels, residual or coefficients depending on the stage.
    pub tile: Vec<f32>,
    wavelet: WaveletKind,
    rounding: RoundingMode,
    scratch: WaveletScratch,
    buffers: Vec<RowBuffers>,
}

impl TilePipeline {
    pub fn new(header: &StreamHeader, channels: usize) -> Self {
        let length = header.tile_length as usize;
        let grid = TileGrid::new(header.width as usize, header.height as usize, length);
        let buffers = (0..channels).map(|_| RowBuffers::new(grid.cols, grid.tile_pixels())).collect();
        Self {
            grid,
            curve: HilbertCurve::new(length),
            tile: vec![0.0; grid.tile_pixels()],
            wavelet: header.wavelet,
            rounding: header.rounding,
            scratch: WaveletScratch::default(),
            buffers,
        }
    }

    /// Loads tile (`col`, `row`) of `plane`, predicts, transforms and quantizes it.
    pub fn analyze(&mut self, plane: &[f32], channel: usize, col: usize, row: usize, step: u32) -> Direction {
        let grid = self.grid;
        let (width, height) = grid.valid_extent(col, row);
        grid.copy_in(plane, col, row, &mut self.tile);

        let rows = &self.buffers[channel];
        let direction = predictor::choose_direction(&self.tile, rows, col, row, grid.length, width, height);
        predictor::subtract(&mut self.tile, rows.reference(direction, col));

        wavelet::forward_2d(self.wavelet, &mut self.tile, grid.length, DECOMPOSITION_LEVELS, &mut self.scratch);
        quantization::quantize(&mut self.tile, step, self.rounding);
        direction
    }

    /// Turns the quantized coefficients in `tile` back into pixels and records them for prediction.
    pub fn reconstruct(&mut self, channel: usize, col: usize, direction: Direction, step: u32) {
        quantization::dequantize(&mut self.tile, step, self.rounding);
        wavelet::inverse_2d(self.wavelet, &mut self.tile, self.grid.length, DECOMPOSITION_LEVELS, &mut self.scratch);

        let rows = &mut self.buffers[channel];
        predictor::add(&mut self.tile, rows.reference(direction, col));
        rows.store(col, &self.tile);
    }

    /// Ping-pongs the row buffers of every channel once a tile row is complete.
    pub fn advance_row(&mut self) {
        for rows in &mut self.buffers {
            rows.advance_row();
        }
    }
}
