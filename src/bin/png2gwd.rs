
//! Converts every png image in a directory into a gwd image.
//! Files that fail to convert are reported and skipped.

extern crate image as png;

use gwd::error::{Error, Result};
use gwd::image::{ChannelPlanes, Image};
use gwd::math::Vec2;
use gwd::meta::PixelFormat;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

fn main() {
    let mut arguments = std::env::args().skip(1);

    let (input_dir, output_dir) = match (arguments.next(), arguments.next()) {
        (Some(input), Some(output)) => (PathBuf::from(input), PathBuf::from(output)),
        _ => {
            eprintln!("usage: png2gwd <input_dir> <output_dir>");
            std::process::exit(1);
        },
    };

    if let Err(error) = std::fs::create_dir_all(&output_dir) {
        eprintln!("cannot create {}: {}", output_dir.display(), error);
        std::process::exit(1);
    }

    let entries = walkdir::WalkDir::new(&input_dir)
        .min_depth(1).max_depth(1).into_iter()
        .filter_map(std::result::Result::ok);

    for entry in entries {
        let path = entry.path();
        if path.extension() != Some(OsStr::new("png")) { continue; }

        let mut output_file = output_dir.join(entry.file_name());
        output_file.set_extension("gwd");

        match convert(path, &output_file) {
            Ok(()) => println!("converted {} to {}", path.display(), output_file.display()),
            Err(error) => println!("error processing {}: {}", path.display(), error),
        }
    }
}

fn convert(input_file: &Path, output_file: &Path) -> Result<()> {
    let loaded = png::open(input_file)
        .map_err(|error| Error::invalid(error.to_string()))?
        .into_rgb8();

    let resolution = Vec2(loaded.width() as usize, loaded.height() as usize);

    // the loaded r, g, b planes are stored in buffer order, unmodified,
    // even though the decoding tool reverses channel order for display
    let mut channels: ChannelPlanes =
        (0 .. 3).map(|_| Vec::with_capacity(resolution.area())).collect();

    for pixel in loaded.pixels() {
        for (channel, &sample) in channels.iter_mut().zip(pixel.0.iter()) {
            channel.push(sample);
        }
    }

    let image = Image::from_planes(resolution, PixelFormat::Rgb24, channels)?;
    image.write_to_file(output_file)
}
