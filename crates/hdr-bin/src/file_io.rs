/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Reading and writing images and their exposure metadata
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Reader, Tag, Value};
use hdr_core::errors::HdrErrors;
use hdr_core::exposure::exposure_from_rational;
use hdr_core::image::LdrImage;
use log::{debug, trace};
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_image::core_filters::colorspace::ColorspaceConv;
use zune_image::core_filters::depth::Depth;
use zune_image::image::Image;
use zune_image::traits::OperationsTrait;

/// Decode `path` into 8-bit interleaved RGB
///
/// Other depths are scaled down, grayscale is expanded and alpha dropped.
/// Only the first frame of animated images is used.
pub fn read_ldr_image(path: &Path) -> Result<LdrImage, HdrErrors> {
    let load_error = |reason: String| HdrErrors::ImageLoadError(path.to_path_buf(), reason);

    let mut image = Image::open(path).map_err(|e| load_error(format!("{e:?}")))?;

    Depth::new(BitDepth::Eight)
        .execute(&mut image)
        .map_err(|e| load_error(format!("{e:?}")))?;
    ColorspaceConv::new(ColorSpace::RGB)
        .execute(&mut image)
        .map_err(|e| load_error(format!("{e:?}")))?;

    let (width, height) = image.dimensions();

    let pixels = image
        .flatten_to_u8()
        .into_iter()
        .next()
        .ok_or_else(|| load_error("image contains no frames".to_string()))?;

    trace!("Decoded {:?}, {width}x{height}", path);

    LdrImage::new(pixels, width, height).map_err(|e| load_error(format!("{e:?}")))
}

/// Encode `image` to `path`, the format is picked from the extension
pub fn write_ldr_image(image: &LdrImage, path: &Path) -> Result<(), HdrErrors> {
    let write_error = |reason: String| HdrErrors::OutputWriteError(path.to_path_buf(), reason);

    if path.extension().is_none() {
        return Err(write_error(
            "no file extension to pick an image format from".to_string()
        ));
    }
    let (width, height) = image.dimensions();

    Image::from_u8(image.pixels(), width, height, ColorSpace::RGB)
        .save(path)
        .map_err(|e| write_error(format!("{e:?}")))?;

    debug!("Wrote {width}x{height} image to {:?}", path);
    Ok(())
}

/// Read the `ExposureTime` tag of `path`, in seconds
pub fn read_exposure_time(path: &Path) -> Result<f32, HdrErrors> {
    let missing = || HdrErrors::MissingExposureMetadata(path.to_path_buf());

    let file = File::open(path)
        .map_err(|e| HdrErrors::ImageLoadError(path.to_path_buf(), e.to_string()))?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(err) => {
            debug!("No exif data in {:?}: {err}", path);
            return Err(missing());
        }
    };

    let field = exif
        .get_field(Tag::ExposureTime, In::PRIMARY)
        .ok_or_else(missing)?;

    match &field.value {
        Value::Rational(values) => {
            let Some(value) = values.first() else {
                return Err(missing());
            };
            exposure_from_rational(value.num, value.denom, path)
        }
        other => {
            debug!("ExposureTime of {:?} has unexpected type {other:?}", path);
            Err(missing())
        }
    }
}
