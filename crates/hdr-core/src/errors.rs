/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors that may occur while building an HDR image
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

/// All errors raised by the hdr pipeline
pub enum HdrErrors {
    /// The user supplied exposure list could not be used
    InvalidExposureFormat(String),
    /// An image carries no usable `ExposureTime` tag
    MissingExposureMetadata(PathBuf),
    /// An image could not be read or decoded, with the reason
    ImageLoadError(PathBuf, String),
    /// Merging needs at least two images, contains how many were given
    NotEnoughImages(usize),
    /// A merge or tonemap algorithm name that we do not know about
    UnsupportedAlgorithm(String),
    /// The output image could not be encoded or written
    OutputWriteError(PathBuf, String),
    /// A tonemap parameter does not belong to the operator or is out of range
    ///
    /// Contains the operator name and a description of the offending field
    InvalidParameter(&'static str, String),
    /// Response curve recovery failed
    CalibrationError(String),
    /// Static message
    GenericStr(&'static str),
    /// Generic message
    GenericString(String)
}

impl Debug for HdrErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HdrErrors::InvalidExposureFormat(reason) => {
                writeln!(f, "Invalid exposure list: {reason}")
            }
            HdrErrors::MissingExposureMetadata(path) => {
                writeln!(
                    f,
                    "Image {:?} has no exposure time metadata, pass exposures explicitly with --exposures",
                    path
                )
            }
            HdrErrors::ImageLoadError(path, reason) => {
                writeln!(f, "Could not load image {:?}: {reason}", path)
            }
            HdrErrors::NotEnoughImages(found) => {
                writeln!(
                    f,
                    "At least two images are needed to create an HDR image, found {found}"
                )
            }
            HdrErrors::UnsupportedAlgorithm(name) => {
                writeln!(f, "Unsupported algorithm {name:?}")
            }
            HdrErrors::OutputWriteError(path, reason) => {
                writeln!(f, "Could not write output image {:?}: {reason}", path)
            }
            HdrErrors::InvalidParameter(operator, reason) => {
                writeln!(f, "Invalid parameter for {operator}: {reason}")
            }
            HdrErrors::CalibrationError(reason) => {
                writeln!(f, "Camera response calibration failed: {reason}")
            }
            HdrErrors::GenericStr(err) => writeln!(f, "{err}"),
            HdrErrors::GenericString(err) => writeln!(f, "{err}")
        }
    }
}

impl Display for HdrErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for HdrErrors {}

impl From<&'static str> for HdrErrors {
    fn from(value: &'static str) -> Self {
        HdrErrors::GenericStr(value)
    }
}

impl From<String> for HdrErrors {
    fn from(value: String) -> Self {
        HdrErrors::GenericString(value)
    }
}
