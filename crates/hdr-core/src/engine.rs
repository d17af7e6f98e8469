/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use crate::algorithm::MergeAlgorithm;
use crate::errors::HdrErrors;
use crate::image::{HdrImage, LdrImage};
use crate::tonemap::{MertensParams, ToneMapSettings};

/// Capabilities the pipeline needs from an image processing backend
///
/// The pipeline never touches pixels or files itself, every stage goes
/// through this trait. This keeps orchestration testable against a fake
/// engine and lets the numerical backend be swapped out.
pub trait RadianceEngine {
    /// Decode an image from disk into 8-bit RGB
    ///
    /// # Errors
    /// [`HdrErrors::ImageLoadError`] naming `path`
    fn read_image(&self, path: &Path) -> Result<LdrImage, HdrErrors>;

    /// Read the exposure time in seconds from the camera metadata of `path`
    ///
    /// # Errors
    /// [`HdrErrors::MissingExposureMetadata`] if there is no usable tag
    fn exposure_time(&self, path: &Path) -> Result<f32, HdrErrors>;

    /// Align a batch of exposures against each other, in place
    ///
    /// Implementations may crop every image to the region all of them
    /// share, so all images must have equal dimensions afterwards.
    fn align(&self, images: &mut [LdrImage]) -> Result<(), HdrErrors>;

    /// Calibrate a camera response and merge the exposures into radiance
    ///
    /// `exposures` is parallel to `images`.
    fn merge(
        &self, images: &[LdrImage], exposures: &[f32], algorithm: MergeAlgorithm
    ) -> Result<HdrImage, HdrErrors>;

    /// Blend exposures directly by per-pixel quality weights
    ///
    /// The result is display referred but has not been gamma corrected.
    fn fuse(&self, images: &[LdrImage], params: &MertensParams) -> Result<HdrImage, HdrErrors>;

    /// Compress a radiance map with the operator described by `settings`
    fn tonemap(&self, image: &HdrImage, settings: &ToneMapSettings)
        -> Result<HdrImage, HdrErrors>;

    /// Encode and write an image, the format follows the extension of `path`
    ///
    /// # Errors
    /// [`HdrErrors::OutputWriteError`] naming `path`
    fn write_image(&self, image: &LdrImage, path: &Path) -> Result<(), HdrErrors>;
}
