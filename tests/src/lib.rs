/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(unused_imports, unused)]

use std::fs::{create_dir_all, read, remove_dir_all, write};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use hdr_bin::file_io::write_ldr_image;
use hdr_core::image::LdrImage;
use serde::Deserialize;
use xxhash_rust::xxh3::xxh3_128;

mod alignment;
mod metadata;
mod operators;
mod output;

/// Gains of the synthetic exposure stack, also used as exposure times
pub const GAINS: [f32; 3] = [0.6, 1.0, 1.3];

#[derive(Clone, Deserialize, Debug)]
pub struct OperatorCase {
    pub command:   String,
    pub fields:    Vec<(String, f32)>,
    pub algorithm: Option<String>,
    pub comment:   Option<String>
}

/// A fresh, empty directory for one test
pub fn scratch_dir(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join("hdr-tests").join(name);
    // leftovers from an earlier run
    let _ = remove_dir_all(&path);
    create_dir_all(&path).unwrap();
    path
}

/// Blocky scene scaled by `gain`, with its content moved by `offset`
///
/// Blocks take one of three well separated gray levels, so every exposure
/// thresholds to the same bitmap and edges are sharp. Channels are slightly
/// tinted, and at the gains used here the first byte is never ppm header
/// whitespace.
pub fn scene(width: usize, height: usize, gain: f32, offset: (isize, isize)) -> LdrImage {
    LdrImage::from_fn(width, height, |x, y, c| {
        let bx = (x as isize - offset.0).div_euclid(8);
        let by = (y as isize - offset.1).div_euclid(8);

        let value = match (bx * 7 + by * 3).rem_euclid(20) {
            0..=5 => 24.0,
            6..=13 => 45.0,
            k => 70.0 + (k * 11 % 41) as f32
        };
        let tint = 1.0 - 0.05 * c as f32;

        (value * gain * tint).round().clamp(0.0, 255.0) as u8
    })
}

/// Write an exposure stack of [`scene`] to `dir` as ppm files
///
/// `offsets` moves the content of each exposure, pass `None` for a still stack
pub fn write_stack(dir: &Path, offsets: Option<&[(isize, isize)]>) -> Vec<PathBuf> {
    write_exposures(dir, &GAINS, offsets)
}

/// Like [`write_stack`] with one image per entry of `gains`
pub fn write_exposures(
    dir: &Path, gains: &[f32], offsets: Option<&[(isize, isize)]>
) -> Vec<PathBuf> {
    gains
        .iter()
        .enumerate()
        .map(|(i, gain)| {
            let offset = offsets.map_or((0, 0), |x| x[i]);
            let path = dir.join(format!("exposure_{i}.ppm"));

            write_ldr_image(&scene(96, 80, *gain, offset), &path).unwrap();
            path
        })
        .collect()
}

/// Write [`scene`] as a jpeg whose exif carries `exposure` as its
/// `ExposureTime`, given as numerator and denominator
pub fn write_jpeg_with_exposure(path: &Path, gain: f32, exposure: (u32, u32)) {
    write_ldr_image(&scene(96, 80, gain, (0, 0)), path).unwrap();
    let jpeg = read(path).unwrap();

    let field = Field {
        tag:     Tag::ExposureTime,
        ifd_num: In::PRIMARY,
        value:   Value::Rational(vec![Rational {
            num:   exposure.0,
            denom: exposure.1
        }])
    };
    let mut tiff = Cursor::new(Vec::new());
    let mut writer = Writer::new();
    writer.push_field(&field);
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    // an APP1 segment right after the start of image marker
    let length = u16::try_from(2 + 6 + tiff.len()).unwrap();
    let mut output = Vec::with_capacity(jpeg.len() + tiff.len() + 10);

    output.extend_from_slice(&jpeg[..2]);
    output.extend_from_slice(&[0xFF, 0xE1]);
    output.extend_from_slice(&length.to_be_bytes());
    output.extend_from_slice(b"Exif\0\0");
    output.extend_from_slice(&tiff);
    output.extend_from_slice(&jpeg[2..]);

    write(path, output).unwrap();
}

/// Exposure list matching [`GAINS`]
pub fn exposure_list() -> String {
    GAINS
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<String>>()
        .join(",")
}

fn hash(path: &Path) -> u128 {
    xxh3_128(&read(path).unwrap())
}
