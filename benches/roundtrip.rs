#[macro_use]
extern crate bencher;

extern crate gwd;
use gwd::prelude::*;
use gwd::image::ChannelPlanes;

use bencher::Bencher;
use std::io::Cursor;


/// A synthetic image with flat and gradient regions,
/// exercising both run and literal tokens.
fn sample_image() -> Image {
    let resolution = Vec2(512, 512);
    let Vec2(width, height) = resolution;

    let channels: ChannelPlanes = (0 .. 3_usize).map(|channel| {
        let mut plane = Vec::with_capacity(width * height);

        for y in 0 .. height {
            for x in 0 .. width {
                let sample =
                    if y % 2 == 0 { 170 }
                    else { ((x * 2 + y + channel * 85) % 256) as u8 };

                plane.push(sample);
            }
        }

        plane
    }).collect();

    Image::from_planes(resolution, PixelFormat::Rgb24, channels).unwrap()
}

fn encode_image(bench: &mut Bencher) {
    let image = sample_image();

    bench.iter(|| {
        let mut result = Vec::new();
        image.write_to_buffered(&mut result).unwrap();
        bencher::black_box(result);
    })
}

fn decode_image(bench: &mut Bencher) {
    let mut bytes = Vec::new();
    sample_image().write_to_buffered(&mut bytes).unwrap();

    bench.iter(|| {
        let image = Image::read_from_buffered(Cursor::new(&bytes)).unwrap();
        bencher::black_box(image);
    })
}

benchmark_group!(roundtrip,
    encode_image,
    decode_image
);

benchmark_main!(roundtrip);
