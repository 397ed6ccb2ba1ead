//! Hilbert curve ordering over a square tile.
//!
//! Scan position 0 starts in the top-left corner and the first quarter of the
//! curve stays inside the top-left quadrant, so the low frequency quadrant of
//! a wavelet tile is visited before the high frequency ones.

fn rotate(n: usize, x: &mut usize, y: &mut usize, rx: usize, ry: usize) {
    if ry == 0 {
        if rx == 1 {
            *x = n - 1 - *x;
            *y = n - 1 - *y;
        }
        std::mem::swap(x, y);
    }
}

/// Maps a scan position along the curve to a row-major offset.
pub fn scan_to_offset(length: usize, scan: usize) -> usize {
    debug_assert!(length.is_power_of_two() && scan < length * length);
    let (mut x, mut y) = (0, 0);
    let mut t = scan;
    let mut s = 1;
    while s < length {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        rotate(s, &mut x, &mut y, rx, ry);
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    length * y + x
}

/// Inverse of [`scan_to_offset`].
pub fn offset_to_scan(length: usize, offset: usize) -> usize {
    debug_assert!(length.is_power_of_two() && offset < length * length);
    let (mut x, mut y) = (offset % length, offset / length);
    let mut scan = 0;
    let mut s = length / 2;
    while s > 0 {
        let rx = usize::from(x & s != 0);
        let ry = usize::from(y & s != 0);
        scan += s * s * ((3 * rx) ^ ry);
        rotate(length, &mut x, &mut y, rx, ry);
        s /= 2;
    }
    scan
}

/// Precomputed scan order for one tile edge length.
pub struct HilbertCurve {
    offsets: Vec<usize>,
}

impl HilbertCurve {
    pub fn new(length: usize) -> Self {
        let offsets = (0..length * length).map(|scan| scan_to_offset(length, scan)).collect();
        Self { offsets }
    }

    /// Row-major offset visited at `scan`.
    pub fn offset(&self, scan: usize) -> usize {
        self.offsets[scan]
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}
