//! Tile-level spatial prediction.
//!
//! A tile is predicted from one already reconstructed neighbour: the tile to
//! its left, the tile above, or the tile above-left. Only two tile rows per
//! channel are kept: the completed previous row and the row being filled.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Prediction direction, sent as a 2-bit code per tile and channel.
///
/// When several candidates have equal residual energy the encoder picks the
/// lowest code, so `None` wins over `Left`, `Left` over `Above` and `Above`
/// over `AboveLeft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Direction {
    None = 0,
    Left = 1,
    Above = 2,
    AboveLeft = 3,
}

pub const DIRECTION_BITS: u32 = 2;

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::None, Direction::Left, Direction::Above, Direction::AboveLeft];

    /// Whether the neighbour this direction refers to exists for tile (`col`, `row`).
    pub fn is_available(self, col: usize, row: usize) -> bool {
        match self {
            Direction::None => true,
            Direction::Left => col > 0,
            Direction::Above => row > 0,
            Direction::AboveLeft => col > 0 && row > 0,
        }
    }
}

/// The previous/current tile-row pair of one channel.
pub struct RowBuffers {
    tile_pixels: usize,
    previous: Vec<f32>,
    current: Vec<f32>,
}

impl RowBuffers {
    pub fn new(cols: usize, tile_pixels: usize) -> Self {
        Self {
            tile_pixels,
            previous: vec![0.0; cols * tile_pixels],
            current: vec![0.0; cols * tile_pixels],
        }
    }

    fn slot(buffer: &[f32], col: usize, tile_pixels: usize) -> &[f32] {
        &buffer[col * tile_pixels..(col + 1) * tile_pixels]
    }

    /// Reconstructed block `direction` points at, `None` for no prediction.
    ///
    /// The caller has to make sure the direction is available for `col`.
    pub fn reference(&self, direction: Direction, col: usize) -> Option<&[f32]> {
        match direction {
            Direction::None => None,
            Direction::Left => Some(Self::slot(&self.current, col - 1, self.tile_pixels)),
            Direction::Above => Some(Self::slot(&self.previous, col, self.tile_pixels)),
            Direction::AboveLeft => Some(Self::slot(&self.previous, col - 1, self.tile_pixels)),
        }
    }

    /// Stores the reconstructed tile at `col` of the current row.
    pub fn store(&mut self, col: usize, tile: &[f32]) {
        self.current[col * self.tile_pixels..(col + 1) * self.tile_pixels].copy_from_slice(tile);
    }

    /// Finishes a tile row: the current row becomes the previous one.
    pub fn advance_row(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
    }
}

fn energy(tile: &[f32], reference: Option<&[f32]>, length: usize, width: usize, height: usize) -> f32 {
    let mut sum = 0.0f32;
    for y in 0..height {
        for x in 0..width {
            let i = y * length + x;
            let diff = tile[i] - reference.map_or(0.0, |r| r[i]);
            sum += diff * diff;
        }
    }
    sum
}

/// Picks the direction with the smallest residual energy for tile (`col`, `row`).
///
/// Only the `width` x `height` part inside the image is compared, padding
/// does not influence the choice.
pub fn choose_direction(
    tile: &[f32],
    buffers: &RowBuffers,
    col: usize,
    row: usize,
    length: usize,
    width: usize,
    height: usize,
) -> Direction {
    let mut best = Direction::None;
    let mut best_energy = f32::INFINITY;
    for direction in Direction::ALL {
        if !direction.is_available(col, row) {
            continue;
        }
        let sum = energy(tile, buffers.reference(direction, col), length, width, height);
        if sum < best_energy {
            best = direction;
            best_energy = sum;
        }
    }
    best
}

pub fn subtract(tile: &mut [f32], reference: Option<&[f32]>) {
    if let Some(reference) = reference {
        for (value, r) in tile.iter_mut().zip(reference) {
            *value -= r;
        }
    }
}

pub fn add(tile: &mut [f32], reference: Option<&[f32]>) {
    if let Some(reference) = reference {
        for (value, r) in tile.iter_mut().zip(reference) {
            *value += r;
        }
    }
}
