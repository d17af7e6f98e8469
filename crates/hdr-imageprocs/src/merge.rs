/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use hdr_core::algorithm::MergeAlgorithm;
use hdr_core::errors::HdrErrors;
use hdr_core::image::{HdrImage, LdrImage};
use log::info;

use crate::debevec::{CalibrateDebevec, MergeDebevec};
use crate::robertson::{CalibrateRobertson, MergeRobertson};

/// Calibrate the camera response and merge `images` into a radiance map
///
/// `times` holds the exposure time of each image in seconds.
///
/// # Errors
/// - [`HdrErrors::InvalidParameter`] if the stack is empty or `times` does not match it
/// - [`HdrErrors::CalibrationError`] if the response cannot be recovered
pub fn merge_exposures(
    images: &[LdrImage], times: &[f32], algorithm: MergeAlgorithm
) -> Result<HdrImage, HdrErrors> {
    match algorithm {
        MergeAlgorithm::Debevec => {
            let calibrate = CalibrateDebevec::new();
            info!("Running {}", calibrate.name());
            let response = calibrate.process(images, times)?;

            let merge = MergeDebevec::new();
            info!("Running {}", merge.name());
            merge.process(images, times, &response)
        }
        MergeAlgorithm::Robertson => {
            let calibrate = CalibrateRobertson::new();
            info!("Running {}", calibrate.name());
            let response = calibrate.process(images, times)?;

            let merge = MergeRobertson::new();
            info!("Running {}", merge.name());
            merge.process(images, times, &response)
        }
    }
}
