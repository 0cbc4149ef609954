// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};

use tileshuffle::codec::{self, DecodeLimits};
use tileshuffle::{
    decode_image_buffer, encode_image_buffer, ConfigBuilder, Error, GridAxis, GridError,
    GridSpec, Permutation, Pipeline, ShuffleMode,
};

fn png(img: &RgbaImage) -> Vec<u8> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)
        .unwrap();
    out
}

/// Every pixel distinct, so any misplaced byte shows up.
fn distinct(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, (x * 7 + y * 13) as u8, 255]))
}

fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes).unwrap().into_rgba8()
}

/// Bytes of cell `(gx, gy)` of a `tw × th` grid, packed row by row.
fn cell(img: &RgbaImage, gx: u32, gy: u32, tw: u32, th: u32) -> Vec<u8> {
    let mut out = Vec::new();
    for y in gy * th..(gy + 1) * th {
        for x in gx * tw..(gx + 1) * tw {
            out.extend_from_slice(&img.get_pixel(x, y).0);
        }
    }
    out
}

#[test]
fn test_dimensions_preserved() {
    let input = distinct(24, 18);
    for (xs, ys) in [(1, 1), (2, 3), (24, 18), (6, 9), (8, 1)] {
        let out = decode(&encode_image_buffer(&png(&input), xs, ys).unwrap());
        assert_eq!(out.dimensions(), (24, 18), "grid {xs}x{ys}");
    }
}

#[test]
fn test_every_tile_used_once() {
    let input = distinct(16, 12);
    let out = decode(&encode_image_buffer(&png(&input), 4, 3).unwrap());

    let mut before: Vec<_> = (0..3)
        .flat_map(|gy| (0..4).map(move |gx| (gx, gy)))
        .map(|(gx, gy)| cell(&input, gx, gy, 4, 4))
        .collect();
    let mut after: Vec<_> = (0..3)
        .flat_map(|gy| (0..4).map(move |gx| (gx, gy)))
        .map(|(gx, gy)| cell(&out, gx, gy, 4, 4))
        .collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn test_single_tile_is_identity() {
    let input = distinct(9, 5);
    let out = decode(&encode_image_buffer(&png(&input), 1, 1).unwrap());
    assert_eq!(out, input);
}

#[test]
fn test_identity_round_trip() {
    let input = distinct(8, 8);
    let p = Pipeline::new(
        ConfigBuilder::new()
            .split(4, 4)
            .shuffle(ShuffleMode::Identity)
            .build(),
    );
    let out = decode(&p.shuffle_bytes(&png(&input)).unwrap());
    assert_eq!(out, input);
}

#[test]
fn test_seeded_output_reproducible() {
    let bytes = png(&distinct(20, 20));
    let p = Pipeline::new(ConfigBuilder::new().split(5, 5).seed(2023).build());
    let a = p.shuffle_bytes(&bytes).unwrap();
    let b = p.shuffle_bytes(&bytes).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_four_tile_scenario() {
    let wanted = [2, 0, 3, 1];
    let seed = (0..10_000u64)
        .find(|&s| ShuffleMode::Seed(s).permutation(4).as_slice() == wanted)
        .expect("some seed yields [2, 0, 3, 1]");

    let input = distinct(4, 4);
    let p = Pipeline::new(ConfigBuilder::new().split(2, 2).seed(seed).build());
    let out = decode(&p.shuffle_bytes(&png(&input)).unwrap());

    // Destination cell 0 gets source tile 2, which sits at (gx, gy) = (0, 1).
    assert_eq!(cell(&out, 0, 0, 2, 2), cell(&input, 0, 1, 2, 2));
    assert_eq!(cell(&out, 1, 0, 2, 2), cell(&input, 0, 0, 2, 2));
    assert_eq!(cell(&out, 0, 1, 2, 2), cell(&input, 1, 1, 2, 2));
    assert_eq!(cell(&out, 1, 1, 2, 2), cell(&input, 1, 0, 2, 2));

    // The same arrangement through an explicit permutation.
    let buf = codec::decode(&png(&input), None, DecodeLimits::default()).unwrap();
    let explicit = p
        .arrange_pixels(&buf, &Permutation::from_vec(wanted.to_vec()).unwrap())
        .unwrap();
    assert_eq!(explicit.as_bytes(), out.as_raw().as_slice());
}

#[test]
fn test_invalid_grid() {
    let bytes = png(&distinct(10, 10));
    assert!(matches!(
        encode_image_buffer(&bytes, 3, 2),
        Err(Error::InvalidGrid(GridError::NotDivisible {
            axis: GridAxis::Width,
            split: 3,
            dimension: 10,
        }))
    ));
    assert!(matches!(
        encode_image_buffer(&bytes, 2, 20),
        Err(Error::InvalidGrid(GridError::SplitTooLarge { .. }))
    ));
    assert!(matches!(
        encode_image_buffer(&bytes, 2, 0),
        Err(Error::InvalidGrid(GridError::ZeroSplit {
            axis: GridAxis::Height
        }))
    ));
    assert_eq!(
        GridSpec::new(10, 10, 3, 2).unwrap_err().to_string(),
        "image width (10 px) is not divisible by 3"
    );
}

#[test]
fn test_malformed_input() {
    let bytes = png(&distinct(8, 8));
    for cut in [0, 3, 8, 16, 33, bytes.len() / 2] {
        let r = encode_image_buffer(&bytes[..cut], 2, 2);
        match r {
            Err(e @ Error::Decode(_)) => assert!(e.is_input_error()),
            other => panic!("cut at {cut}: {other:?}"),
        }
    }
}

#[test]
fn test_jpeg_input() {
    let rgb: Vec<u8> = (0..32 * 16).flat_map(|i| [(i % 32) as u8 * 8, 64, 200]).collect();
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 95)
        .write_image(&rgb, 32, 16, ColorType::Rgb8)
        .unwrap();

    let out = encode_image_buffer(&jpeg, 4, 2).unwrap();
    assert_eq!(codec::SourceFormat::sniff(&out).unwrap(), codec::SourceFormat::Png);
    assert_eq!(decode(&out).dimensions(), (32, 16));
}

#[test]
fn test_restore_by_borders() {
    // Red follows x, green follows y: only true neighbours blend seamlessly.
    let input = RgbaImage::from_fn(24, 15, |x, y| Rgba([x as u8 * 5, y as u8 * 9, 40, 255]));
    let shuffled = Pipeline::new(ConfigBuilder::new().split(6, 3).seed(8).build())
        .shuffle_bytes(&png(&input))
        .unwrap();
    assert_ne!(decode(&shuffled), input);

    let restored = decode(&decode_image_buffer(&shuffled, 6, 3).unwrap());
    assert_eq!(restored, input);
}

#[test]
fn test_parallel_invocations() {
    let bytes = png(&distinct(12, 12));
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| encode_image_buffer(&bytes, 3, 4)))
            .collect();
        for h in handles {
            let out = decode(&h.join().unwrap().unwrap());
            assert_eq!(out.dimensions(), (12, 12));
        }
    });
}
