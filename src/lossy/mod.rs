//! Lossy codec: tile prediction, 2-D wavelet, quantization and Hilbert-ordered
//! zero-run coefficient coding.
//!
//! - `header`: Stream header (wavelet, rounding, dimensions, tile edge, quantizers).
//! - `tile`: Tile grid geometry, zero padded copy-in and cropped copy-out.
//! - `predictor`: Direction choice and the ping-pong tile-row buffers.
//! - `wavelet`: Haar and CDF 9/7 kernels and the multi-level 2-D driver.
//! - `quantization`: Scalar quantization with deadzone reconstruction bias.
//! - `hilbert`: Hilbert curve scan order.
//! - `coefficient_coder`: Zero-run / magnitude / sign tokens.
//! - `encoder` / `decoder`: Orchestration over tile rows, tiles and channels.

pub mod coefficient_coder;
pub mod decoder;
pub mod encoder;
pub mod header;
pub mod hilbert;
mod pipeline;
pub mod predictor;
pub mod quantization;
pub mod tile;
pub mod wavelet;

pub use decoder::TileDecoder;
pub use encoder::{EncoderConfig, TileEncoder};

use crate::error::CodecError;
use crate::image::Image;

/// Encodes `image` into a new buffer.
pub fn encode(image: &Image, config: EncoderConfig) -> Result<Vec<u8>, CodecError> {
    let mut data = Vec::new();
    TileEncoder::new(config).encode(image, &mut data)?;
    Ok(data)
}

/// Decodes a complete lossy stream.
pub fn decode(data: &[u8]) -> Result<Image, CodecError> {
    TileDecoder::new(data).decode()
}
