//! In-memory 8-bit image shared by both codec paths.

use crate::error::CodecError;

/// An 8-bit image with 1 (grey) or 3 (RGB) interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub pixels: Vec<u8>,
}

impl Image {
    /// Creates a black image.
    pub fn new(width: u32, height: u32, channels: usize) -> Result<Self, CodecError> {
        Self::validate(width, height, channels)?;
        let len = width as usize * height as usize * channels;
        Ok(Self {
            width,
            height,
            channels,
            pixels: vec![0; len],
        })
    }

    /// Wraps an existing interleaved sample buffer.
    pub fn from_pixels(width: u32, height: u32, channels: usize, pixels: Vec<u8>) -> Result<Self, CodecError> {
        Self::validate(width, height, channels)?;
        let expected = width as usize * height as usize * channels;
        if pixels.len() != expected {
            return Err(CodecError::invalid_data(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    fn validate(width: u32, height: u32, channels: usize) -> Result<(), CodecError> {
        if channels != 1 && channels != 3 {
            return Err(CodecError::unsupported(format!(
                "only one or three channels supported, got {}",
                channels
            )));
        }
        if width == 0 || height == 0 {
            return Err(CodecError::unsupported(format!("invalid dimensions {}x{}", width, height)));
        }
        Ok(())
    }

    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
