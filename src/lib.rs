
//! Read and write GWD files, a compressed raster image container.
//!
//! A gwd file is a twelve byte header followed by a bit-packed payload:
//! every scanline of every channel is run-length coded over mirrored-delta
//! symbols. A 24 bit image may carry a nested single-channel sub-image
//! holding its inverted alpha plane.
//!
//! Use `image::Image::read_from_file` and `image::Image::write_to_file`,
//! or the `gwd2png` and `png2gwd` converter binaries
//! for whole directories of images.

#![forbid(unsafe_code)]

pub mod io;
pub mod math;
pub mod compression;
pub mod meta;
pub mod image;
pub mod error;


pub mod prelude {

    // main exports
    pub use crate::image::Image;
    pub use crate::meta::{MetaData, PixelFormat};

    // secondary data types
    pub use crate::error::{Error, Result, UnitResult};
    pub use crate::math::Vec2;
}
