//! Lossless codec: per-row vertical delta with run-length coding, stored in
//! the `IMG` container.

pub mod container;
pub mod decoder;
pub mod encoder;

pub use decoder::LosslessDecoder;
pub use encoder::LosslessEncoder;
