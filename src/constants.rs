/// Tile edge used when the caller does not ask for another one.
pub const DEFAULT_TILE_LENGTH: u32 = 16;

// A tile has to survive DECOMPOSITION_LEVELS halvings and still hold one sample.
pub const MINIMUM_TILE_LENGTH: u32 = 1 << DECOMPOSITION_LEVELS;
pub const MAXIMUM_TILE_LENGTH: u32 = 256;

/// Number of nested low/high quadrant levels produced by the 2-D wavelet.
pub const DECOMPOSITION_LEVELS: u32 = 2;

/// Quantizer steps for luma and the two chroma planes.
pub const DEFAULT_QUANTIZERS: [u32; 3] = [128, 32, 32];

/// Offset added to truncated coefficients on reconstruction (deadzone compensation).
pub const TRUNCATION_BIAS: f32 = 0.375;

pub const MAXIMUM_CHANNEL_COUNT: usize = 3;

// Lossy stream dimensions travel as VLIs, this only keeps the sample count addressable.
pub const MAXIMUM_LOSSY_DIMENSION: u32 = 1 << 20;

// The IMG container stores (dimension - 1) as u16.
pub const MAXIMUM_LOSSLESS_DIMENSION: u32 = 1 << 16;

pub const LOSSLESS_MAGIC: &[u8; 3] = b"IMG";
pub const LOSSLESS_HEADER_SIZE: usize = 8;

// Row flags of the lossless container.
pub const ROW_RAW: u8 = 0;
pub const ROW_RUN_LENGTH: u8 = 1;

/// Sample value that maps to 0.0 in the working space.
pub const LEVEL_SHIFT: f32 = 128.0;
pub const SAMPLE_SCALE: f32 = 255.0;
