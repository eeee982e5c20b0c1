
//! The decoded raster image, and reading and writing of whole files.

use crate::compression;
use crate::error::{Error, Result, UnitResult};
use crate::io::{BitReader, BitWriter, Read, Write};
use crate::math::Vec2;
use crate::meta::{MetaData, PixelFormat};

use smallvec::SmallVec;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;


/// The channel planes of one image. At most four entries.
pub type ChannelPlanes = SmallVec<[Vec<u8>; 4]>;

/// The marker byte that announces an alpha sub-image behind the payload.
const ALPHA_PRESENT: u8 = 0x01;

/// The absolute position of the alpha marker byte, derived from the
/// declared payload size. For files written by this crate that position
/// usually lies past the end of the file, which reads as "no alpha".
fn alpha_marker_position(meta: &MetaData) -> u64 {
    4 + meta.payload_size as u64
}


/// A decoded raster image: one byte plane per channel, in stored channel
/// order. The stored order is the reverse of the display order, see the
/// converters. Each plane holds all rows of one channel, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {

    /// Width and height of all planes in pixels.
    pub resolution: Vec2<usize>,

    /// Channel interpretation of the planes.
    pub format: PixelFormat,

    /// One `width * height` plane per channel.
    pub channels: ChannelPlanes,
}

impl Image {

    /// Bundle existing channel planes into an image,
    /// checking the plane count and plane sizes against the format.
    pub fn from_planes(resolution: Vec2<usize>, format: PixelFormat, channels: ChannelPlanes) -> Result<Self> {
        if channels.len() != format.channel_count() {
            return Err(Error::invalid("channel count does not match the pixel format"));
        }

        if channels.iter().any(|plane| plane.len() != resolution.area()) {
            return Err(Error::invalid("channel plane size does not match the resolution"));
        }

        Ok(Image { resolution, format, channels })
    }

    /// Decode the gwd file at the specified path.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_from_buffered(BufReader::new(File::open(path)?))
    }

    /// Decode a gwd image from any buffered byte source.
    pub fn read_from_buffered(mut read: impl Read + Seek) -> Result<Self> {
        let meta = MetaData::read_from_buffered(&mut read)?;

        match meta.format {
            PixelFormat::Gray8 | PixelFormat::Rgb24 => {},

            // the depth of a merged result, not of a payload
            PixelFormat::Rgba32 =>
                return Err(Error::unsupported("compressed 32 bit payloads")),
        }

        let mut channels = decode_planes(&mut read, meta.resolution, meta.format.channel_count())?;

        if meta.format == PixelFormat::Rgb24 {
            if let Some(alpha) = read_alpha_plane(&mut read, &meta)? {
                channels.push(alpha);

                return Ok(Image {
                    resolution: meta.resolution,
                    format: PixelFormat::Rgba32,
                    channels,
                });
            }
        }

        Ok(Image { resolution: meta.resolution, format: meta.format, channels })
    }

    /// Encode this image into the file at the specified path.
    /// The whole file is assembled in memory first,
    /// so that a failed encode leaves no partial file behind.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> UnitResult {
        let mut bytes = Vec::new();
        self.write_to_buffered(&mut bytes)?;

        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Encode this image. Only 24 bit images can be written by this tool;
    /// neither single-channel images nor alpha planes are ever emitted.
    pub fn write_to_buffered(&self, write: &mut impl Write) -> UnitResult {
        if self.format != PixelFormat::Rgb24 {
            return Err(Error::unsupported("writing images other than 24 bits per pixel"));
        }

        if self.channels.len() != self.format.channel_count()
            || self.channels.iter().any(|plane| plane.len() != self.resolution.area()) {
            return Err(Error::invalid("channel planes do not match the image resolution"));
        }

        let meta = MetaData {
            resolution: self.resolution,
            format: self.format,
            payload_size: self.resolution.area() * 3,
        };

        meta.write_to_buffered(write)?;

        let Vec2(width, height) = self.resolution;
        let mut output = BitWriter::new(write);

        for y in 0 .. height {
            for channel in self.channels.iter() {
                compression::compress_line(&mut output, &channel[y * width .. (y + 1) * width])?;
            }
        }

        // the single flush of the stream, padding the very last byte
        output.flush()
    }
}


/// Decode `channel_count` planes from one continuous bit stream,
/// row-major and channel-minor: all channel lines of a row
/// precede the first line of the next row.
fn decode_planes(read: &mut impl Read, resolution: Vec2<usize>, channel_count: usize) -> Result<ChannelPlanes> {
    let Vec2(width, height) = resolution;

    let mut channels: ChannelPlanes =
        (0 .. channel_count).map(|_| vec![ 0_u8; resolution.area() ]).collect();

    let mut input = BitReader::new(read);

    for y in 0 .. height {
        for channel in channels.iter_mut() {
            compression::decompress_line(&mut input, &mut channel[y * width .. (y + 1) * width])?;
        }
    }

    Ok(channels)
}

/// Look for the alpha marker behind the declared payload and, if a matching
/// sub-image follows it, decode and invert its single plane.
///
/// A missing or mismatched marker, and a sub-header that is absent, not gwd,
/// of an unknown depth, not eight bits per pixel, or of different dimensions,
/// all yield no alpha instead of an error. A broken sub-image *payload*
/// remains a hard failure.
fn read_alpha_plane(read: &mut (impl Read + Seek), meta: &MetaData) -> Result<Option<Vec<u8>>> {
    if read.seek(SeekFrom::Start(alpha_marker_position(meta))).is_err() {
        return Ok(None);
    }

    let mut marker = [0_u8; 1];
    match read.read_exact(&mut marker) {
        Ok(()) if marker[0] == ALPHA_PRESENT => {},
        _ => return Ok(None),
    }

    let alpha_meta = match MetaData::read_from_buffered(read) {
        Ok(alpha_meta) => alpha_meta,
        Err(Error::NotGwd) | Err(Error::NotSupported(_)) => return Ok(None),
        Err(other) => return Err(other),
    };

    if alpha_meta.format != PixelFormat::Gray8 || alpha_meta.resolution != meta.resolution {
        return Ok(None);
    }

    let mut planes = decode_planes(read, meta.resolution, 1)?;
    let mut plane = planes.swap_remove(0);

    // the stored plane is inverted
    for sample in plane.iter_mut() {
        *sample = 255 - *sample;
    }

    Ok(Some(plane))
}
