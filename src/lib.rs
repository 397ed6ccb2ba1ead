//! Tile-predicted wavelet image codec.
//!
//! The [`lossy`] path predicts every tile from a reconstructed neighbour,
//! transforms the residual with a Haar or CDF 9/7 wavelet, quantizes it and
//! codes the coefficients along a Hilbert curve with zero-run suppression.
//! The [`lossless`] path stores per-row vertical deltas, run-length coded.
//! Both read and write 8-bit grey or RGB images, see [`pnm`] for file I/O.

pub mod bit_io;
pub mod color;
pub mod constants;
pub mod error;
pub mod image;
pub mod lossless;
pub mod lossy;
pub mod pnm;
pub mod vli;

pub use error::CodecError;
pub use image::Image;
pub use lossy::quantization::RoundingMode;
pub use lossy::wavelet::WaveletKind;
pub use lossy::{EncoderConfig, TileDecoder, TileEncoder};
