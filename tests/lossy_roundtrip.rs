//! Lossy encode/decode round trips through the public API.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tilewave::lossy::{self, TileDecoder};
use tilewave::{CodecError, EncoderConfig, Image, RoundingMode, WaveletKind};

fn random_image(width: u32, height: u32, channels: usize, seed: u64) -> Image {
    let mut rng = StdRng::seed_from_u64(seed);
    let pixels = (0..width as usize * height as usize * channels).map(|_| rng.random::<u8>()).collect();
    Image::from_pixels(width, height, channels, pixels).unwrap()
}

fn gradient_image(width: u32, height: u32) -> Image {
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 3 + y * 5) % 256) as u8);
        }
    }
    Image::from_pixels(width, height, 1, pixels).unwrap()
}

fn max_difference(a: &Image, b: &Image) -> u8 {
    a.pixels.iter().zip(&b.pixels).map(|(x, y)| x.abs_diff(*y)).max().unwrap_or(0)
}

fn mean_squared_error(a: &Image, b: &Image) -> f64 {
    let sum: f64 = a
        .pixels
        .iter()
        .zip(&b.pixels)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    sum / a.pixels.len() as f64
}

fn roundtrip(image: &Image, config: EncoderConfig) -> Image {
    let data = lossy::encode(image, config).unwrap();
    let decoded = lossy::decode(&data).unwrap();
    assert_eq!(decoded.width, image.width);
    assert_eq!(decoded.height, image.height);
    assert_eq!(decoded.channels, image.channels);
    decoded
}

#[test]
fn test_mid_grey_is_exact() {
    let image = Image::from_pixels(32, 32, 1, vec![128; 32 * 32]).unwrap();
    let config = EncoderConfig {
        wavelet: WaveletKind::Haar,
        rounding: RoundingMode::Nearest,
        tile_length: 16,
        quantizers: [1, 0, 0],
    };
    assert_eq!(roundtrip(&image, config), image);
}

#[test]
fn test_grey_haar_fine_step() {
    let image = random_image(37, 23, 1, 7);
    let config = EncoderConfig {
        wavelet: WaveletKind::Haar,
        rounding: RoundingMode::Nearest,
        tile_length: 16,
        quantizers: [1024, 0, 0],
    };
    let decoded = roundtrip(&image, config);
    assert!(max_difference(&image, &decoded) <= 1);
}

#[test]
fn test_rgb_haar_fine_step() {
    let image = random_image(20, 13, 3, 11);
    let config = EncoderConfig {
        wavelet: WaveletKind::Haar,
        rounding: RoundingMode::Nearest,
        tile_length: 8,
        quantizers: [1024, 1024, 1024],
    };
    let decoded = roundtrip(&image, config);
    assert!(max_difference(&image, &decoded) <= 3);
}

#[test]
fn test_grey_cdf97_truncate_fine_step() {
    let image = random_image(40, 40, 1, 3);
    let config = EncoderConfig {
        wavelet: WaveletKind::Cdf97,
        rounding: RoundingMode::Truncate,
        tile_length: 16,
        quantizers: [4096, 0, 0],
    };
    let decoded = roundtrip(&image, config);
    assert!(max_difference(&image, &decoded) <= 3);
}

#[test]
fn test_default_config_roundtrip_rgb() {
    let image = random_image(48, 17, 3, 21);
    let decoded = roundtrip(&image, EncoderConfig::default());
    // Coarse default steps still keep the image recognisable.
    assert!(mean_squared_error(&image, &decoded) < 64.0 * 64.0);
}

#[test]
fn test_larger_step_keeps_more_detail() {
    let image = gradient_image(64, 48);
    let config = |step| EncoderConfig {
        wavelet: WaveletKind::Cdf97,
        rounding: RoundingMode::Nearest,
        tile_length: 16,
        quantizers: [step, 0, 0],
    };
    let coarse = mean_squared_error(&image, &roundtrip(&image, config(4)));
    let fine = mean_squared_error(&image, &roundtrip(&image, config(256)));
    assert!(fine <= coarse, "fine {} coarse {}", fine, coarse);
}

#[test]
fn test_smaller_step_produces_smaller_stream() {
    let image = gradient_image(64, 64);
    let size = |step| {
        let config = EncoderConfig {
            quantizers: [step, 0, 0],
            ..EncoderConfig::default()
        };
        lossy::encode(&image, config).unwrap().len()
    };
    assert!(size(8) <= size(512));
}

#[test]
fn test_image_smaller_than_one_tile() {
    let image = random_image(3, 2, 1, 5);
    let config = EncoderConfig {
        wavelet: WaveletKind::Haar,
        rounding: RoundingMode::Nearest,
        tile_length: 4,
        quantizers: [1024, 0, 0],
    };
    let decoded = roundtrip(&image, config);
    assert!(max_difference(&image, &decoded) <= 1);
}

#[test]
fn test_truncated_stream() {
    let image = random_image(32, 32, 3, 9);
    let data = lossy::encode(&image, EncoderConfig::default()).unwrap();
    let err = lossy::decode(&data[..data.len() / 2]).unwrap_err();
    assert!(err.is_truncated(), "unexpected error {:?}", err);
}

#[test]
fn test_header_is_readable_without_decoding() {
    let image = random_image(30, 10, 1, 1);
    let config = EncoderConfig {
        wavelet: WaveletKind::Haar,
        rounding: RoundingMode::Truncate,
        tile_length: 8,
        quantizers: [77, 0, 0],
    };
    let data = lossy::encode(&image, config).unwrap();
    let header = TileDecoder::new(&data).read_header().unwrap();
    assert_eq!((header.width, header.height), (30, 10));
    assert_eq!(header.wavelet, WaveletKind::Haar);
    assert_eq!(header.rounding, RoundingMode::Truncate);
    assert_eq!(header.tile_length, 8);
    assert_eq!(header.channel_count(), 1);
}

#[test]
fn test_invalid_tile_length_is_rejected() {
    let image = random_image(8, 8, 1, 2);
    let config = EncoderConfig {
        tile_length: 12,
        ..EncoderConfig::default()
    };
    assert!(matches!(lossy::encode(&image, config), Err(CodecError::InvalidConfig(_))));
}
