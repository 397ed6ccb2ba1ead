//! `IMG` container header: magic, channel count, (width - 1) and (height - 1) as little-endian u16.

use crate::constants::{LOSSLESS_HEADER_SIZE, LOSSLESS_MAGIC, MAXIMUM_LOSSLESS_DIMENSION};
use crate::error::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
}

impl ContainerHeader {
    pub fn write(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAXIMUM_LOSSLESS_DIMENSION {
                return Err(CodecError::unsupported(format!(
                    "{} {} out of range, max supported width or height is {}",
                    name, value, MAXIMUM_LOSSLESS_DIMENSION
                )));
            }
        }
        out.extend_from_slice(LOSSLESS_MAGIC);
        out.push(self.channels as u8);
        out.extend_from_slice(&((self.width - 1) as u16).to_le_bytes());
        out.extend_from_slice(&((self.height - 1) as u16).to_le_bytes());
        Ok(())
    }

    pub fn read(data: &[u8]) -> Result<Self, CodecError> {
        let bytes = data.get(..LOSSLESS_HEADER_SIZE).ok_or(CodecError::Truncated)?;
        if &bytes[..3] != LOSSLESS_MAGIC {
            return Err(CodecError::unsupported("missing IMG magic"));
        }
        let channels = bytes[3] as usize;
        if channels != 1 && channels != 3 {
            return Err(CodecError::unsupported("only one or three channels supported"));
        }
        let width = u32::from(u16::from_le_bytes([bytes[4], bytes[5]])) + 1;
        let height = u32::from(u16::from_le_bytes([bytes[6], bytes[7]])) + 1;
        Ok(Self {
            width,
            height,
            channels,
        })
    }
}
