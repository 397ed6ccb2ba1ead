//! LEB128 style variable-length integers.
//!
//! Seven payload bits per byte, least significant group first, the high bit
//! of each byte flags that another byte follows. The lossy stream writes these
//! bytes through a [`BitWriter`], the lossless container stores them as plain
//! bytes.

use std::io::Write;

use crate::bit_io::{BitReader, BitWriter};
use crate::error::CodecError;

const PAYLOAD_MASK: u64 = 0x7F;
const CONTINUATION: u8 = 0x80;

fn next_group(value: &mut u64) -> u8 {
    let mut byte = (*value & PAYLOAD_MASK) as u8;
    *value >>= 7;
    if *value != 0 {
        byte |= CONTINUATION;
    }
    byte
}

/// Folds one encoded byte into `value`, returns true while more bytes follow.
fn accumulate(value: &mut u64, shift: &mut u32, byte: u8) -> Result<bool, CodecError> {
    let payload = u64::from(byte) & PAYLOAD_MASK;
    if *shift >= u64::BITS || (payload << *shift) >> *shift != payload {
        return Err(CodecError::invalid_data("variable-length integer overflows 64 bits"));
    }
    *value |= payload << *shift;
    *shift += 7;
    Ok(byte & CONTINUATION != 0)
}

pub fn put_vli<W: Write>(writer: &mut BitWriter<W>, mut value: u64) -> Result<(), CodecError> {
    loop {
        let byte = next_group(&mut value);
        writer.write_bits(u64::from(byte), 8)?;
        if byte & CONTINUATION == 0 {
            return Ok(());
        }
    }
}

pub fn get_vli(reader: &mut BitReader) -> Result<u64, CodecError> {
    let mut value = 0;
    let mut shift = 0;
    loop {
        let byte = reader.read_bits(8)? as u8;
        if !accumulate(&mut value, &mut shift, byte)? {
            return Ok(value);
        }
    }
}

pub fn write_leb128(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = next_group(&mut value);
        out.push(byte);
        if byte & CONTINUATION == 0 {
            return;
        }
    }
}

/// Reads one value starting at `*position` and advances the position past it.
pub fn read_leb128(data: &[u8], position: &mut usize) -> Result<u64, CodecError> {
    let mut value = 0;
    let mut shift = 0;
    loop {
        let byte = *data.get(*position).ok_or(CodecError::Truncated)?;
        *position += 1;
        if !accumulate(&mut value, &mut shift, byte)? {
            return Ok(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vli_round_trip(value: u64) -> u64 {
        let mut data = Vec::new();
        let mut writer = BitWriter::new(&mut data);
        // Misalign the stream so VLI bytes straddle byte boundaries.
        writer.write_bits(0b101, 3).unwrap();
        put_vli(&mut writer, value).unwrap();
        writer.finish().unwrap();

        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        get_vli(&mut reader).unwrap()
    }

    #[test]
    fn test_vli_boundaries() {
        for value in [0, 1, 127, 128, 255, 16_383, 16_384, 65_536, u32::MAX as u64, u64::MAX - 1, u64::MAX] {
            assert_eq!(vli_round_trip(value), value);
        }
    }

    #[test]
    fn test_leb128_known_bytes() {
        let mut out = Vec::new();
        write_leb128(&mut out, 0);
        write_leb128(&mut out, 127);
        write_leb128(&mut out, 300);
        assert_eq!(out, vec![0x00, 0x7F, 0xAC, 0x02]);

        let mut pos = 0;
        assert_eq!(read_leb128(&out, &mut pos).unwrap(), 0);
        assert_eq!(read_leb128(&out, &mut pos).unwrap(), 127);
        assert_eq!(read_leb128(&out, &mut pos).unwrap(), 300);
        assert_eq!(pos, out.len());
    }

    #[test]
    fn test_truncated_vli() {
        let data = [0x80];
        let mut reader = BitReader::new(&data);
        assert!(get_vli(&mut reader).unwrap_err().is_truncated());

        let mut pos = 0;
        assert!(read_leb128(&[0xFF, 0xFF], &mut pos).unwrap_err().is_truncated());
    }

    #[test]
    fn test_overflowing_vli_is_rejected() {
        let mut data = vec![0xFF; 10];
        data.push(0x01);
        let mut pos = 0;
        let err = read_leb128(&data, &mut pos).unwrap_err();
        assert!(matches!(err, CodecError::InvalidData(_)));
    }
}
