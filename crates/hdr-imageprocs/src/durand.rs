/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Bilateral filter tonemapping
//!
//! Log luminance is split into a base layer, found with a bilateral
//! filter, and a detail layer. Only the base layer is compressed, down to
//! `contrast` in the log domain, so local detail survives.
//!
//! Reference: F. Durand and J. Dorsey, "Fast Bilateral Filtering for the
//! Display of High-Dynamic-Range Images", 2002
use hdr_core::errors::HdrErrors;
use hdr_core::image::HdrImage;
use hdr_core::tonemap::DurandParams;

use crate::bilateral_filter::bilateral_filter;
use crate::gamma::gamma_tonemap;
use crate::traits::ToneMapOperation;
use crate::utils::{log_plane, luminance, map_luminance};

#[derive(Copy, Clone, Debug)]
pub struct Durand {
    params: DurandParams
}

impl Durand {
    #[must_use]
    pub fn new(params: DurandParams) -> Durand {
        Durand { params }
    }
}

impl ToneMapOperation for Durand {
    fn name(&self) -> &'static str {
        "durand"
    }

    fn process_impl(&self, image: &HdrImage) -> Result<HdrImage, HdrErrors> {
        let params = &self.params;

        let img = gamma_tonemap(image, 1.0);
        let gray = luminance(&img);
        let log_img = log_plane(&gray);

        let base = bilateral_filter(&log_img, params.sigma_color, params.sigma_space);

        let (min, max) = base.min_max();
        let scale = if max - min > f32::EPSILON {
            params.contrast / (max - min)
        } else {
            1.0
        };

        // compress the base layer and put the detail back
        let mapped = base.zip_map(&log_img, |b, l| (b * (scale - 1.0) + l).exp());

        let img = map_luminance(&img, &gray, &mapped, params.saturation);
        let inverse = 1.0 / params.gamma;

        Ok(img.map(|v| v.abs().powf(inverse)))
    }
}
