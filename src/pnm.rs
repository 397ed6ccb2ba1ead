//! Binary PGM (P5) and PPM (P6) reading and writing, 8 bits per sample only.

use std::io::Write;

use crate::error::CodecError;
use crate::image::Image;

struct HeaderParser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderParser<'a> {
    fn skip_whitespace_and_comments(&mut self) -> Result<(), CodecError> {
        loop {
            let byte = *self.data.get(self.pos).ok_or(CodecError::Truncated)?;
            if byte == b'#' {
                while *self.data.get(self.pos).ok_or(CodecError::Truncated)? != b'\n' {
                    self.pos += 1;
                }
            } else if !byte.is_ascii_whitespace() {
                return Ok(());
            }
            self.pos += 1;
        }
    }

    fn read_integer(&mut self) -> Result<u32, CodecError> {
        self.skip_whitespace_and_comments()?;
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(CodecError::unsupported("malformed pixel-map header"));
        }
        // At most 9 digits keeps the value inside u32.
        if self.pos - start > 9 {
            return Err(CodecError::unsupported("pixel-map header value out of range"));
        }
        let value = self.data[start..self.pos]
            .iter()
            .fold(0u32, |acc, &digit| acc * 10 + u32::from(digit - b'0'));
        Ok(value)
    }
}

/// Parses a complete P5/P6 file.
pub fn read(data: &[u8]) -> Result<Image, CodecError> {
    if data.len() < 2 {
        return Err(CodecError::Truncated);
    }
    let channels = match (data[0], data[1]) {
        (b'P', b'5') => 1,
        (b'P', b'6') => 3,
        _ => return Err(CodecError::unsupported("neither P5 nor P6 image")),
    };
    let mut parser = HeaderParser { data, pos: 2 };
    let width = parser.read_integer()?;
    let height = parser.read_integer()?;
    let max_value = parser.read_integer()?;
    if width == 0 || height == 0 {
        return Err(CodecError::unsupported(format!("invalid dimensions {}x{}", width, height)));
    }
    if max_value != 255 {
        return Err(CodecError::unsupported(format!(
            "only 8 bit per channel supported, maximum sample value is {}",
            max_value
        )));
    }
    // Exactly one whitespace byte separates the header from the samples.
    let separator = *data.get(parser.pos).ok_or(CodecError::Truncated)?;
    if !separator.is_ascii_whitespace() {
        return Err(CodecError::unsupported("malformed pixel-map header"));
    }
    let start = parser.pos + 1;
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| CodecError::unsupported("pixel-map dimensions overflow"))?;
    let end = start.checked_add(len).ok_or(CodecError::Truncated)?;
    let pixels = data.get(start..end).ok_or(CodecError::Truncated)?;
    Image::from_pixels(width, height, channels, pixels.to_vec())
}

/// Writes `image` as P5 (grey) or P6 (RGB).
pub fn write<W: Write>(image: &Image, mut writer: W) -> Result<(), CodecError> {
    let number = if image.channels == 1 { 5 } else { 6 };
    write!(writer, "P{}\n{} {}\n255\n", number, image.width, image.height)?;
    writer.write_all(&image.pixels)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with_comments() {
        let mut data = b"P5\n# created by hand\n3 2\n# max\n255\n".to_vec();
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        let image = read(&data).unwrap();
        assert_eq!((image.width, image.height, image.channels), (3, 2, 1));
        assert_eq!(image.pixels, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_write_then_read_color() {
        let image = Image::from_pixels(2, 1, 3, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let mut data = Vec::new();
        write(&image, &mut data).unwrap();
        assert!(data.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(read(&data).unwrap(), image);
    }

    #[test]
    fn test_rejects_16_bit() {
        let data = b"P5 2 2 65535\n\0\0\0\0\0\0\0\0".to_vec();
        assert!(matches!(read(&data), Err(CodecError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_rejects_wrong_magic() {
        assert!(matches!(read(b"P3 1 1 255\n0 0 0"), Err(CodecError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_truncated_samples() {
        let data = b"P6 2 2 255\n\x01\x02\x03".to_vec();
        assert!(read(&data).unwrap_err().is_truncated());
    }
}
