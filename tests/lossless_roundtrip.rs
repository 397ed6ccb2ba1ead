//! Byte-exact round trips through the lossless delta/run-length codec.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tilewave::lossless::{LosslessDecoder, LosslessEncoder};
use tilewave::{CodecError, Image};

fn random_image(width: u32, height: u32, channels: usize, seed: u64) -> Image {
    let mut rng = StdRng::seed_from_u64(seed);
    let pixels = (0..width as usize * height as usize * channels).map(|_| rng.random::<u8>()).collect();
    Image::from_pixels(width, height, channels, pixels).unwrap()
}

fn assert_roundtrip(image: &Image) -> usize {
    let data = LosslessEncoder::encode(image).unwrap();
    assert_eq!(&LosslessDecoder::decode(&data).unwrap(), image);
    data.len()
}

#[test]
fn test_random_grey() {
    assert_roundtrip(&random_image(33, 17, 1, 1));
}

#[test]
fn test_random_rgb() {
    assert_roundtrip(&random_image(64, 9, 3, 2));
}

#[test]
fn test_single_pixel() {
    assert_roundtrip(&Image::from_pixels(1, 1, 3, vec![1, 2, 3]).unwrap());
}

#[test]
fn test_flat_image_compresses() {
    let image = Image::from_pixels(100, 50, 3, vec![200; 100 * 50 * 3]).unwrap();
    let size = assert_roundtrip(&image);
    assert!(size < image.pixels.len() / 10, "flat image took {} bytes", size);
}

#[test]
fn test_vertical_stripes_compress() {
    // Every row equals the previous one, so all rows after the first are a single zero run.
    let mut pixels = Vec::new();
    for _ in 0..40 {
        pixels.extend((0..300u32).map(|x| (x % 251) as u8));
    }
    let image = Image::from_pixels(300, 40, 1, pixels).unwrap();
    let size = assert_roundtrip(&image);
    assert_eq!(size, 8 + 301 + 39 * 4);
}

#[test]
fn test_long_runs_use_multibyte_counts() {
    let image = Image::from_pixels(1000, 2, 1, vec![9; 2000]).unwrap();
    let data = LosslessEncoder::encode(&image).unwrap();
    // flag, diff 9, 999 as LEB128
    assert_eq!(&data[8..12], &[1, 9, 0xE7, 0x07]);
    assert_eq!(LosslessDecoder::decode(&data).unwrap(), image);
}

#[test]
fn test_truncated_stream() {
    let image = random_image(16, 16, 1, 3);
    let data = LosslessEncoder::encode(&image).unwrap();
    for cut in [0, 5, 8, data.len() / 2, data.len() - 1] {
        let err = LosslessDecoder::decode(&data[..cut]).unwrap_err();
        assert!(err.is_truncated(), "cut at {} gave {:?}", cut, err);
    }
}

#[test]
fn test_oversized_image_is_rejected() {
    let image = Image::new(70_000, 1, 1).unwrap();
    assert!(matches!(LosslessEncoder::encode(&image), Err(CodecError::UnsupportedFormat(_))));
}
