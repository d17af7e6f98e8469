/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Adaptive logarithmic tonemapping
//!
//! Luminance is compressed with a logarithm whose base varies between 2
//! and 10 depending on how bright the pixel is, `bias` controls how fast
//! the base grows.
//!
//! Reference: F. Drago, K. Myszkowski, T. Annen and N. Chiba,
//! "Adaptive Logarithmic Mapping For Displaying High Contrast Scenes", 2003
use hdr_core::errors::HdrErrors;
use hdr_core::image::HdrImage;
use hdr_core::tonemap::DragoParams;
use log::trace;

use crate::gamma::gamma_tonemap;
use crate::traits::ToneMapOperation;
use crate::utils::{log_plane, luminance, map_luminance};

#[derive(Copy, Clone, Debug)]
pub struct Drago {
    params: DragoParams
}

impl Drago {
    #[must_use]
    pub fn new(params: DragoParams) -> Drago {
        Drago { params }
    }
}

impl ToneMapOperation for Drago {
    fn name(&self) -> &'static str {
        "drago"
    }

    fn process_impl(&self, image: &HdrImage) -> Result<HdrImage, HdrErrors> {
        let img = gamma_tonemap(image, 1.0);

        let gray = luminance(&img);
        // geometric mean of luminance
        let mean = log_plane(&gray).mean().exp();
        let gray = gray.map(|v| v / mean);

        let (_, max) = gray.min_max();

        if max <= 0.0 || !max.is_finite() {
            trace!("Image has no luminance, skipping logarithmic mapping");
            return Ok(gamma_tonemap(&img, self.params.gamma));
        }

        let exponent = self.params.bias.ln() / 0.5_f32.ln();

        let mapped = gray.map(|v| {
            let div = (2.0 + 8.0 * (v / max).powf(exponent)).ln();
            (v + 1.0).ln() / div
        });

        let img = map_luminance(&img, &gray, &mapped, self.params.saturation);

        Ok(gamma_tonemap(&img, self.params.gamma))
    }
}
