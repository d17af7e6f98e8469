/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Plain gamma tonemap
//!
//! The image is normalised to `[0, 1]` using its global minimum and
//! maximum, then every value is raised to `1 / gamma`.
//!
//! The other operators use this as their last step.
use hdr_core::errors::HdrErrors;
use hdr_core::image::HdrImage;
use hdr_core::tonemap::GammaParams;

use crate::traits::ToneMapOperation;
use crate::utils::min_max;

/// Gamma tonemap operator
#[derive(Copy, Clone, Debug)]
pub struct Gamma {
    gamma: f32
}

impl Gamma {
    #[must_use]
    pub fn new(params: GammaParams) -> Gamma {
        Gamma {
            gamma: params.gamma
        }
    }
}

impl ToneMapOperation for Gamma {
    fn name(&self) -> &'static str {
        "gamma"
    }

    fn process_impl(&self, image: &HdrImage) -> Result<HdrImage, HdrErrors> {
        Ok(gamma_tonemap(image, self.gamma))
    }
}

/// Normalise `image` by its range and apply `x^(1/gamma)`
///
/// An image with no range (all values equal) is not normalised.
#[must_use]
pub fn gamma_tonemap(image: &HdrImage, gamma: f32) -> HdrImage {
    let (min, max) = min_max(image.pixels());
    let range = max - min;
    let inverse = 1.0 / gamma;

    if range > f32::EPSILON {
        let scale = 1.0 / range;
        image.map(|v| ((v - min) * scale).clamp(0.0, 1.0).powf(inverse))
    } else {
        image.map(|v| v.abs().powf(inverse))
    }
}
