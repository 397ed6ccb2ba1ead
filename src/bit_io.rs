//! Bit-granular stream reader and writer.
//!
//! Bits are packed most-significant-bit first within each byte. The final
//! byte of a stream is padded with zero bits.

use std::io::Write;

use crate::error::CodecError;

pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_buffer: u8,
    bits_left: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit_buffer: 0,
            bits_left: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, CodecError> {
        if self.bits_left == 0 {
            let b = *self.data.get(self.pos).ok_or(CodecError::Truncated)?;
            self.pos += 1;
            self.bit_buffer = b;
            self.bits_left = 8;
        }

        self.bits_left -= 1;
        Ok((self.bit_buffer >> self.bits_left) & 1 != 0)
    }

    /// Reads a `count`-bit field, first bit read is the most significant.
    pub fn read_bits(&mut self, count: u32) -> Result<u64, CodecError> {
        debug_assert!(count <= 64);
        let mut bits = 0u64;
        for _ in 0..count {
            bits = (bits << 1) | u64::from(self.read_bit()?);
        }
        Ok(bits)
    }

    /// Number of bits that can still be read.
    pub fn bits_remaining(&self) -> u64 {
        (self.data.len() - self.pos) as u64 * 8 + u64::from(self.bits_left)
    }

    /// Number of bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.pos as u64 * 8 - u64::from(self.bits_left)
    }
}

pub struct BitWriter<W: Write> {
    sink: W,
    bit_buffer: u8,
    bits_count: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            bit_buffer: 0,
            bits_count: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<(), CodecError> {
        self.bit_buffer = (self.bit_buffer << 1) | u8::from(bit);
        self.bits_count += 1;
        self.bits_written += 1;
        if self.bits_count == 8 {
            self.flush_byte()?;
        }
        Ok(())
    }

    /// Writes the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, count: u32) -> Result<(), CodecError> {
        debug_assert!(count <= 64);
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 != 0)?;
        }
        Ok(())
    }

    fn flush_byte(&mut self) -> Result<(), CodecError> {
        self.sink.write_all(&[self.bit_buffer])?;
        self.bit_buffer = 0;
        self.bits_count = 0;
        Ok(())
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pads the last byte, flushes the sink and returns the number of payload bits.
    pub fn finish(mut self) -> Result<u64, CodecError> {
        if self.bits_count > 0 {
            self.bit_buffer <<= 8 - self.bits_count;
            self.flush_byte()?;
        }
        self.sink.flush()?;
        Ok(self.bits_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_packing() {
        let mut data = Vec::new();
        let mut writer = BitWriter::new(&mut data);
        writer.write_bit(true).unwrap();
        writer.write_bits(0b01, 2).unwrap();
        writer.write_bits(0xA5, 8).unwrap();
        assert_eq!(writer.finish().unwrap(), 11);
        // 1 01 10100101 + 5 padding zeros
        assert_eq!(data, vec![0b1011_0100, 0b1010_0000]);
    }

    #[test]
    fn test_read_back_fields() {
        let data = [0b1011_0100, 0b1010_0000];
        let mut reader = BitReader::new(&data);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(2).unwrap(), 0b01);
        assert_eq!(reader.read_bits(8).unwrap(), 0xA5);
        assert_eq!(reader.bits_read(), 11);
        assert_eq!(reader.bits_remaining(), 5);
    }

    #[test]
    fn test_read_past_end_fails() {
        let data = [0xFF];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
        assert_eq!(reader.bits_remaining(), 0);
        assert!(reader.read_bit().unwrap_err().is_truncated());
    }

    #[test]
    fn test_partial_field_at_end_fails() {
        let data = [0x0F];
        let mut reader = BitReader::new(&data);
        assert!(reader.read_bits(12).unwrap_err().is_truncated());
    }
}
