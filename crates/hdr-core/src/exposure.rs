/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Exposure time resolution
//!
//! Exposure times come either from a user supplied comma separated list
//! or from the `ExposureTime` tag of each image.
use std::path::PathBuf;

use log::{debug, trace};

use crate::engine::RadianceEngine;
use crate::errors::HdrErrors;

/// Parse a comma separated list of exposure times, in seconds
///
/// # Errors
/// [`HdrErrors::InvalidExposureFormat`] if the list does not hold exactly
/// `expected` values or any value is not a finite positive number
pub fn parse_exposures(list: &str, expected: usize) -> Result<Vec<f32>, HdrErrors> {
    let values: Vec<&str> = list.split(',').map(str::trim).collect();

    if values.len() != expected {
        return Err(HdrErrors::InvalidExposureFormat(format!(
            "expected {expected} comma separated exposures, one per image, but found {}",
            values.len()
        )));
    }

    let mut exposures = Vec::with_capacity(expected);

    for value in values {
        let exposure = value.parse::<f32>().map_err(|e| {
            HdrErrors::InvalidExposureFormat(format!("could not parse {value:?} as a number, {e}"))
        })?;

        if !exposure.is_finite() || exposure <= 0.0 {
            return Err(HdrErrors::InvalidExposureFormat(format!(
                "exposure {value:?} must be a positive number of seconds"
            )));
        }
        exposures.push(exposure);
    }
    Ok(exposures)
}

/// Turn an `ExposureTime` rational into seconds
///
/// # Errors
/// [`HdrErrors::MissingExposureMetadata`] if either side of the rational is zero
pub fn exposure_from_rational(
    numerator: u32, denominator: u32, path: &std::path::Path
) -> Result<f32, HdrErrors> {
    if numerator == 0 || denominator == 0 {
        return Err(HdrErrors::MissingExposureMetadata(path.to_path_buf()));
    }
    Ok((f64::from(numerator) / f64::from(denominator)) as f32)
}

/// Resolve one exposure time per image
///
/// If `list` is present it is parsed, otherwise the engine is asked for the
/// exposure time embedded in each image.
///
/// # Errors
/// - [`HdrErrors::InvalidExposureFormat`] for a bad list
/// - [`HdrErrors::MissingExposureMetadata`] if an image carries no exposure time
pub fn resolve_exposures<E: RadianceEngine + ?Sized>(
    engine: &E, list: Option<&str>, images: &[PathBuf]
) -> Result<Vec<f32>, HdrErrors> {
    if let Some(list) = list {
        debug!("Using exposures supplied on the command line");
        return parse_exposures(list, images.len());
    }

    debug!("Reading exposure times from image metadata");

    let mut exposures = Vec::with_capacity(images.len());

    for path in images {
        let exposure = engine.exposure_time(path)?;

        if !exposure.is_finite() || exposure <= 0.0 {
            return Err(HdrErrors::MissingExposureMetadata(path.clone()));
        }
        trace!("Exposure of {:?} is {exposure}s", path);
        exposures.push(exposure);
    }
    Ok(exposures)
}
