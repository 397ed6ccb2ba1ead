//! Tile grid geometry and moving tiles in and out of full-size planes.

/// Row-major grid of `length` x `length` tiles covering a `width` x `height` plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub length: usize,
    pub cols: usize,
    pub rows: usize,
}

impl TileGrid {
    pub fn new(width: usize, height: usize, length: usize) -> Self {
        Self {
            width,
            height,
            length,
            cols: width.div_ceil(length),
            rows: height.div_ceil(length),
        }
    }

    pub fn tile_pixels(&self) -> usize {
        self.length * self.length
    }

    /// Width and height of the part of tile (`col`, `row`) that lies inside the image.
    pub fn valid_extent(&self, col: usize, row: usize) -> (usize, usize) {
        let w = (self.width - col * self.length).min(self.length);
        let h = (self.height - row * self.length).min(self.length);
        (w, h)
    }

    /// Copies tile (`col`, `row`) of `plane` into `tile`, zero padding outside the image.
    pub fn copy_in(&self, plane: &[f32], col: usize, row: usize, tile: &mut [f32]) {
        let (w, h) = self.valid_extent(col, row);
        tile.fill(0.0);
        for j in 0..h {
            let src = (row * self.length + j) * self.width + col * self.length;
            tile[j * self.length..j * self.length + w].copy_from_slice(&plane[src..src + w]);
        }
    }

    /// Copies the inside-the-image part of `tile` back into `plane`, dropping the padding.
    pub fn copy_out(&self, tile: &[f32], col: usize, row: usize, plane: &mut [f32]) {
        let (w, h) = self.valid_extent(col, row);
        for j in 0..h {
            let dst = (row * self.length + j) * self.width + col * self.length;
            plane[dst..dst + w].copy_from_slice(&tile[j * self.length..j * self.length + w]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rounds_up() {
        let grid = TileGrid::new(33, 16, 16);
        assert_eq!((grid.cols, grid.rows), (3, 1));
        assert_eq!(grid.valid_extent(2, 0), (1, 16));
        assert_eq!(grid.valid_extent(0, 0), (16, 16));
    }

    #[test]
    fn test_copy_in_zero_pads() {
        let grid = TileGrid::new(6, 5, 4);
        let plane: Vec<f32> = (1..=30).map(|v| v as f32).collect();
        let mut tile = vec![-1.0f32; 16];
        grid.copy_in(&plane, 1, 1, &mut tile);
        // Tile (1, 1) covers x 4..6 and y 4..5.
        assert_eq!(tile[0], plane[4 * 6 + 4]);
        assert_eq!(tile[1], plane[4 * 6 + 5]);
        assert!(tile[2..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_copy_out_never_touches_outside_pixels() {
        let grid = TileGrid::new(6, 5, 4);
        let mut plane = vec![7.0f32; 30];
        let tile = vec![99.0f32; 16];
        grid.copy_out(&tile, 1, 1, &mut plane);
        let changed: Vec<usize> = (0..30).filter(|&i| plane[i] != 7.0).collect();
        assert_eq!(changed, vec![28, 29]);
    }
}
