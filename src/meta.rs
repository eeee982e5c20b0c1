
//! Describes the fixed twelve byte header preceding each compressed payload.

use crate::error::{Error, Result, UnitResult, u32_to_usize};
use crate::io::{Read, Write};
use crate::math::Vec2;

use lebe::prelude::*;
use std::convert::TryFrom;
use std::io::ErrorKind;


/// The three ascii bytes that identify a gwd header.
/// They sit at offset four, behind the payload size.
pub mod magic_number {

    /// The ascii bytes `GWD`.
    pub const BYTES: [u8; 3] = *b"GWD";

    /// Whether the bytes at the magic position identify a gwd header.
    pub fn is_gwd(bytes: &[u8]) -> bool {
        bytes == BYTES
    }
}


/// How many bits encode one pixel across all of its channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {

    /// A single eight bit channel.
    Gray8,

    /// Three eight bit channels.
    Rgb24,

    /// Three eight bit channels plus a merged alpha plane.
    /// This is the shape of a decoded image after its alpha sub-image
    /// has been merged in. No compressed payload layout exists for it,
    /// so it never occurs in a file written by this crate.
    Rgba32,
}

impl PixelFormat {

    /// The format a header with this depth byte declares.
    /// Fails for depths this crate cannot interpret.
    pub fn from_bits_per_pixel(bits: u8) -> Result<Self> {
        match bits {
            8 => Ok(PixelFormat::Gray8),
            24 => Ok(PixelFormat::Rgb24),
            32 => Ok(PixelFormat::Rgba32),
            other => Err(Error::unsupported(format!("{} bits per pixel", other))),
        }
    }

    /// The depth byte a header with this format declares.
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            PixelFormat::Gray8 => 8,
            PixelFormat::Rgb24 => 24,
            PixelFormat::Rgba32 => 32,
        }
    }

    /// How many sample planes an image of this format owns.
    pub fn channel_count(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Rgba32 => 4,
        }
    }
}


/// The contents of one fixed twelve byte gwd header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaData {

    /// Width and height of the image in pixels.
    pub resolution: Vec2<usize>,

    /// Channel layout of the compressed payload.
    pub format: PixelFormat,

    /// The declared length of the compressed payload behind this header.
    /// Only ever used to locate the alpha marker byte behind the payload,
    /// never to bound the payload itself.
    pub payload_size: usize,
}

impl MetaData {

    /// Number of bytes in a serialized header.
    pub const BYTE_SIZE: usize = 12;

    /// Read one header.
    /// Returns `Error::NotGwd` where fewer than twelve bytes are available
    /// or the magic bytes mismatch, so that callers can distinguish
    /// "not this format" from an actually broken file.
    pub fn read_from_buffered(read: &mut impl Read) -> Result<Self> {
        let mut header = [0_u8; Self::BYTE_SIZE];

        read.read_exact(&mut header).map_err(|error| match error.kind() {
            ErrorKind::UnexpectedEof => Error::NotGwd,
            _ => Error::Io(error),
        })?;

        if !magic_number::is_gwd(&header[4..7]) {
            return Err(Error::NotGwd);
        }

        let payload_size = u32::read_from_little_endian(&mut &header[0..4])?;
        let width = u16::read_from_big_endian(&mut &header[7..9])?;
        let height = u16::read_from_big_endian(&mut &header[9..11])?;
        let format = PixelFormat::from_bits_per_pixel(header[11])?;

        Ok(MetaData {
            resolution: Vec2(usize::from(width), usize::from(height)),
            format,
            payload_size: u32_to_usize(payload_size),
        })
    }

    /// Validate and write this header.
    pub fn write_to_buffered(&self, write: &mut impl Write) -> UnitResult {
        self.validate()?;

        write.write_as_little_endian(&(self.payload_size as u32))?;
        write.write_all(&magic_number::BYTES)?;
        write.write_as_big_endian(&(self.resolution.0 as u16))?;
        write.write_as_big_endian(&(self.resolution.1 as u16))?;
        write.write_all(&[ self.format.bits_per_pixel() ])?;

        Ok(())
    }

    /// Check that this header can be serialized losslessly.
    pub fn validate(&self) -> UnitResult {
        let Vec2(width, height) = self.resolution;

        if u16::try_from(width).is_err() || u16::try_from(height).is_err() {
            return Err(Error::invalid("image resolution too large for a gwd header"));
        }

        if u32::try_from(self.payload_size).is_err() {
            return Err(Error::invalid("payload size too large for a gwd header"));
        }

        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    #[test]
    fn roundtrip(){
        let meta = MetaData {
            resolution: Vec2(640, 480),
            format: PixelFormat::Rgb24,
            payload_size: 640 * 480 * 3,
        };

        let mut bytes = Vec::new();
        meta.write_to_buffered(&mut bytes).unwrap();
        assert_eq!(bytes.len(), MetaData::BYTE_SIZE);

        let decoded = MetaData::read_from_buffered(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, meta);
    }

    #[test]
    fn byte_layout(){
        let meta = MetaData {
            resolution: Vec2(0x0102, 0x0304),
            format: PixelFormat::Gray8,
            payload_size: 0x0A0B0C0D,
        };

        let mut bytes = Vec::new();
        meta.write_to_buffered(&mut bytes).unwrap();

        assert_eq!(bytes, vec![
            0x0D, 0x0C, 0x0B, 0x0A,     // payload size, little endian
            b'G', b'W', b'D',           // magic
            0x01, 0x02,                 // width, big endian
            0x03, 0x04,                 // height, big endian
            8,                          // bits per pixel
        ]);
    }

    #[test]
    fn short_input_is_not_gwd(){
        let bytes = [ 0_u8; 11 ];
        assert!(matches!(
            MetaData::read_from_buffered(&mut bytes.as_slice()),
            Err(Error::NotGwd)
        ));

        assert!(matches!(
            MetaData::read_from_buffered(&mut [].as_slice()),
            Err(Error::NotGwd)
        ));
    }

    #[test]
    fn wrong_magic_is_not_gwd(){
        let mut bytes = Vec::new();

        let meta = MetaData {
            resolution: Vec2(4, 4),
            format: PixelFormat::Gray8,
            payload_size: 16,
        };

        meta.write_to_buffered(&mut bytes).unwrap();
        bytes[5] = b'X';

        assert!(matches!(
            MetaData::read_from_buffered(&mut bytes.as_slice()),
            Err(Error::NotGwd)
        ));
    }

    #[test]
    fn unknown_depth_is_unsupported(){
        let mut bytes = Vec::new();

        let meta = MetaData {
            resolution: Vec2(4, 4),
            format: PixelFormat::Gray8,
            payload_size: 16,
        };

        meta.write_to_buffered(&mut bytes).unwrap();
        bytes[11] = 16;

        assert!(matches!(
            MetaData::read_from_buffered(&mut bytes.as_slice()),
            Err(Error::NotSupported(_))
        ));
    }

    #[test]
    fn oversized_dimensions_fail_validation(){
        let meta = MetaData {
            resolution: Vec2(100_000, 2),
            format: PixelFormat::Rgb24,
            payload_size: 100_000 * 2 * 3,
        };

        assert!(matches!(meta.validate(), Err(Error::Invalid(_))));
    }
}
