/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::errors::HdrErrors;
use crate::image::{HdrImage, LdrImage};

/// Suffix inserted before the extension of derived output names
pub const OUTPUT_SUFFIX: &str = "_hdr";

/// Derive the output file name from the input images
///
/// The name is taken from the second image, with [`OUTPUT_SUFFIX`]
/// inserted right before its extension, e.g `shots/b.jpg` becomes
/// `shots/b_hdr.jpg`.
///
/// # Errors
/// [`HdrErrors::NotEnoughImages`] when fewer than two images are given
pub fn default_output_path(images: &[PathBuf]) -> Result<PathBuf, HdrErrors> {
    let Some(second) = images.get(1) else {
        return Err(HdrErrors::NotEnoughImages(images.len()));
    };
    Ok(with_suffix(second))
}

fn with_suffix(path: &Path) -> PathBuf {
    let mut name = OsString::new();

    if let Some(stem) = path.file_stem() {
        name.push(stem);
    }
    name.push(OUTPUT_SUFFIX);

    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}

/// Scale a single tonemapped component to a byte
///
/// Values are clamped to `[0, 1]` before scaling, NaN maps to zero.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scale_component(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert a tonemapped image into an 8-bit image ready for encoding
pub fn to_ldr(image: &HdrImage) -> LdrImage {
    image.map(scale_component)
}
