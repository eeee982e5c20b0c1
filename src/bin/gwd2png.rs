
//! Converts every gwd image in a directory into a png image.
//! Files that fail to convert are reported and skipped.

extern crate image as png;

use gwd::error::{Error, Result};
use gwd::image::Image;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

fn main() {
    let mut arguments = std::env::args().skip(1);

    let (input_dir, output_dir) = match (arguments.next(), arguments.next()) {
        (Some(input), Some(output)) => (PathBuf::from(input), PathBuf::from(output)),
        _ => {
            eprintln!("usage: gwd2png <input_dir> <output_dir>");
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
        if path.extension() != Some(OsStr::new("gwd")) { continue; }

        let mut output_file = output_dir.join(entry.file_name());
        output_file.set_extension("png");

        match convert(path, &output_file) {
            Ok(()) => println!("converted {} to {}", path.display(), output_file.display()),
            Err(Error::NotGwd) => println!("invalid gwd file: {}", path.display()),
            Err(error) => println!("error processing {}: {}", path.display(), error),
        }
    }
}

fn convert(input_file: &Path, output_file: &Path) -> Result<()> {
    let image = Image::read_from_file(input_file)?;

    let width = image.resolution.0 as u32;
    let height = image.resolution.1 as u32;

    // the stored channel order is the reverse of the display order,
    // a merged alpha plane stays last
    let saved = match image.channels.len() {
        1 => png::GrayImage::from_raw(width, height, image.channels[0].clone())
            .ok_or_else(|| Error::invalid("channel plane size"))?
            .save(output_file),

        3 => png::RgbImage::from_raw(width, height, interleave(&image, &[2, 1, 0]))
            .ok_or_else(|| Error::invalid("channel plane size"))?
            .save(output_file),

        4 => png::RgbaImage::from_raw(width, height, interleave(&image, &[2, 1, 0, 3]))
            .ok_or_else(|| Error::invalid("channel plane size"))?
            .save(output_file),

        _ => return Err(Error::invalid("channel count")),
    };

    saved.map_err(|error| Error::invalid(error.to_string()))
}

/// Collect the planar channels into one interleaved sample vector,
/// picking the channels in the specified order.
fn interleave(image: &Image, channel_order: &[usize]) -> Vec<u8> {
    let pixel_count = image.resolution.area();
    let mut samples = Vec::with_capacity(pixel_count * channel_order.len());

    for pixel in 0 .. pixel_count {
        for &channel in channel_order {
            samples.push(image.channels[channel][pixel]);
        }
    }

    samples
}
