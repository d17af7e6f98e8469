/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use hdr_core::algorithm::MergeAlgorithm;
use hdr_core::engine::RadianceEngine;
use hdr_core::errors::HdrErrors;
use hdr_core::image::{HdrImage, LdrImage};
use hdr_core::tonemap::{MertensParams, ToneMapSettings};
use hdr_imageprocs::align::AlignMtb;
use hdr_imageprocs::merge::merge_exposures;
use hdr_imageprocs::mertens::MergeMertens;
use hdr_imageprocs::tonemap::tonemap;
use log::debug;

use crate::file_io::{read_exposure_time, read_ldr_image, write_ldr_image};

/// Engine backed by zune-image for files and hdr-imageprocs for pixels
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeEngine {
    align: AlignMtb
}

impl NativeEngine {
    #[must_use]
    pub fn new() -> NativeEngine {
        NativeEngine::default()
    }

    /// Use a different alignment configuration
    #[must_use]
    pub fn set_align(mut self, align: AlignMtb) -> Self {
        self.align = align;
        self
    }
}

impl RadianceEngine for NativeEngine {
    fn read_image(&self, path: &Path) -> Result<LdrImage, HdrErrors> {
        read_ldr_image(path)
    }

    fn exposure_time(&self, path: &Path) -> Result<f32, HdrErrors> {
        read_exposure_time(path)
    }

    fn align(&self, images: &mut [LdrImage]) -> Result<(), HdrErrors> {
        let shifts = self.align.process(images)?;
        debug!("Alignment shifts: {:?}", shifts);
        Ok(())
    }

    fn merge(
        &self, images: &[LdrImage], exposures: &[f32], algorithm: MergeAlgorithm
    ) -> Result<HdrImage, HdrErrors> {
        merge_exposures(images, exposures, algorithm)
    }

    fn fuse(&self, images: &[LdrImage], params: &MertensParams) -> Result<HdrImage, HdrErrors> {
        let fusion = MergeMertens::new(params);
        debug!("Running {}", fusion.name());
        fusion.process(images)
    }

    fn tonemap(
        &self, image: &HdrImage, settings: &ToneMapSettings
    ) -> Result<HdrImage, HdrErrors> {
        tonemap(image, settings)
    }

    fn write_image(&self, image: &LdrImage, path: &Path) -> Result<(), HdrErrors> {
        write_ldr_image(image, path)
    }
}
