//! Conversion between 8-bit images and the normalized planar working space.
//!
//! Three channel images go through full range BT.601 YCbCr. Every channel is
//! then shifted by 128 and scaled by 1/255, so mid grey lands on exactly 0.0.

use crate::constants::{LEVEL_SHIFT, SAMPLE_SCALE};
use crate::error::CodecError;
use crate::image::Image;

/// One full-size channel of the working space, row-major.
pub type Plane = Vec<f32>;

fn normalize(value: f32) -> f32 {
    (value - LEVEL_SHIFT) / SAMPLE_SCALE
}

fn denormalize(value: f32) -> f32 {
    value * SAMPLE_SCALE + LEVEL_SHIFT
}

fn to_sample(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Splits `image` into working-space planes (Y, Cb, Cr or a single grey plane).
pub fn to_working_space(image: &Image) -> Vec<Plane> {
    let count = image.sample_count();
    let mut planes = vec![vec![0.0f32; count]; image.channels];
    if image.channels == 1 {
        for (out, &value) in planes[0].iter_mut().zip(&image.pixels) {
            *out = normalize(value as f32);
        }
        return planes;
    }
    for (i, rgb) in image.pixels.chunks_exact(3).enumerate() {
        let r = rgb[0] as f32;
        let g = rgb[1] as f32;
        let b = rgb[2] as f32;

        let luma = 0.299 * r + 0.587 * g + 0.114 * b;
        let cb = -0.168_736 * r - 0.331_264 * g + 0.5 * b + 128.0;
        let cr = 0.5 * r - 0.418_688 * g - 0.081_312 * b + 128.0;

        planes[0][i] = normalize(luma);
        planes[1][i] = normalize(cb);
        planes[2][i] = normalize(cr);
    }
    planes
}

/// Recombines working-space planes into an 8-bit image.
pub fn to_display_space(planes: &[Plane], width: u32, height: u32) -> Result<Image, CodecError> {
    let mut image = Image::new(width, height, planes.len())?;
    let count = image.sample_count();
    if planes.iter().any(|plane| plane.len() != count) {
        return Err(CodecError::invalid_data("plane size does not match image dimensions"));
    }
    if image.channels == 1 {
        for (out, &value) in image.pixels.iter_mut().zip(&planes[0]) {
            *out = to_sample(denormalize(value));
        }
        return Ok(image);
    }
    for (i, rgb) in image.pixels.chunks_exact_mut(3).enumerate() {
        let luma = denormalize(planes[0][i]);
        let cb = denormalize(planes[1][i]) - 128.0;
        let cr = denormalize(planes[2][i]) - 128.0;

        rgb[0] = to_sample(luma + 1.402 * cr);
        rgb[1] = to_sample(luma - 0.344_136 * cb - 0.714_136 * cr);
        rgb[2] = to_sample(luma + 1.772 * cb);
    }
    Ok(image)
}
