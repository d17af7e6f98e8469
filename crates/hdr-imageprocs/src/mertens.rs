/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Exposure fusion
//!
//! Blends an exposure stack directly, without recovering radiance. Every
//! pixel of every exposure gets a weight from three quality measures
//!
//! - contrast, the magnitude of the Laplacian of gray
//! - saturation, the standard deviation across channels
//! - well-exposedness, closeness of each channel to mid gray
//!
//! each raised to its own exponent. Images are blended with Laplacian
//! pyramids so that weight changes do not show as seams.
//!
//! Reference: T. Mertens, J. Kautz and F. Van Reeth, "Exposure Fusion", 2007
use hdr_core::errors::HdrErrors;
use hdr_core::image::{HdrImage, LdrImage, CHANNELS};
use hdr_core::tonemap::MertensParams;
use log::debug;

use crate::plane::Plane;
use crate::pyramid::{collapse, gaussian_pyramid, laplacian_pyramid};
use crate::utils::{interleave, luminance, normalize_ldr, reflect101};

/// Added to every weight so that pixels bad in all exposures still average
const WEIGHT_FLOOR: f32 = 1e-12;

#[derive(Copy, Clone, Debug)]
pub struct MergeMertens {
    contrast:   f32,
    saturation: f32,
    exposure:   f32
}

impl Default for MergeMertens {
    fn default() -> Self {
        MergeMertens::new(&MertensParams::default())
    }
}

impl MergeMertens {
    /// Create a fusion with the weight exponents of `params`
    ///
    /// The gamma of `params` is applied later, by the gamma operator.
    #[must_use]
    pub fn new(params: &MertensParams) -> MergeMertens {
        MergeMertens {
            contrast:   params.contrast,
            saturation: params.saturation,
            exposure:   params.exposure
        }
    }

    pub const fn name(&self) -> &'static str {
        "merge mertens"
    }

    /// Per pixel weight of one exposure, before normalisation
    fn weights(&self, image: &HdrImage) -> Plane {
        let (width, height) = image.dimensions();

        let contrast = laplacian(&luminance(image)).map(f32::abs);

        Plane::from_fn(width, height, |x, y| {
            let px = [image.get(x, y, 0), image.get(x, y, 1), image.get(x, y, 2)];
            let mean = (px[0] + px[1] + px[2]) / CHANNELS as f32;

            let saturation = px.iter().map(|c| (c - mean) * (c - mean)).sum::<f32>().sqrt();

            let well_exposed = px
                .iter()
                .map(|c| (-(c - 0.5) * (c - 0.5) / 0.08).exp())
                .product::<f32>();

            contrast.get(x, y).powf(self.contrast)
                * saturation.powf(self.saturation)
                * well_exposed.powf(self.exposure)
                + WEIGHT_FLOOR
        })
    }

    /// Fuse an exposure stack
    ///
    /// The result is roughly in `[0, 1]` but not clamped, and has not been
    /// gamma corrected.
    ///
    /// # Errors
    /// [`HdrErrors::InvalidParameter`] if the stack is empty or images differ in size
    pub fn process(&self, images: &[LdrImage]) -> Result<HdrImage, HdrErrors> {
        let Some(first) = images.first() else {
            return Err(HdrErrors::InvalidParameter(
                "mertens",
                "at least one image is needed".to_string()
            ));
        };
        let (width, height) = first.dimensions();

        if images.iter().any(|x| x.dimensions() != (width, height)) {
            return Err(HdrErrors::InvalidParameter(
                "mertens",
                "all images must have the same dimensions".to_string()
            ));
        }

        let images: Vec<HdrImage> = images.iter().map(normalize_ldr).collect();
        let mut weights: Vec<Plane> = images.iter().map(|x| self.weights(x)).collect();

        let mut weight_sum = Plane::new(width, height);
        for weight in &weights {
            weight_sum.add_assign(weight);
        }
        for weight in &mut weights {
            *weight = weight.zip_map(&weight_sum, |w, s| w / s);
        }

        let min_dim = width.min(height);
        let max_level = if min_dim == 0 {
            0
        } else {
            min_dim.ilog2() as usize
        };
        debug!("Blending {} exposures over {} levels", images.len(), max_level + 1);

        let mut result: [Vec<Plane>; CHANNELS] = Default::default();

        for (image, weight) in images.iter().zip(&weights) {
            let weight_pyr = gaussian_pyramid(weight, max_level);

            for (c, res_pyr) in result.iter_mut().enumerate() {
                let mut img_pyr = laplacian_pyramid(&Plane::from_channel(image, c), max_level);

                for (level, w) in img_pyr.iter_mut().zip(&weight_pyr) {
                    *level = level.zip_map(w, |v, w| v * w);
                }

                if res_pyr.is_empty() {
                    *res_pyr = img_pyr;
                } else {
                    for (acc, level) in res_pyr.iter_mut().zip(&img_pyr) {
                        acc.add_assign(level);
                    }
                }
            }
        }

        let [r, g, b] = result;
        Ok(interleave(&[collapse(r), collapse(g), collapse(b)]))
    }
}

/// Discrete Laplacian with the 4-neighbour kernel, borders mirrored
fn laplacian(src: &Plane) -> Plane {
    let (width, height) = src.dimensions();

    Plane::from_fn(width, height, |x, y| {
        let left = src.get(reflect101(x as isize - 1, width), y);
        let right = src.get(reflect101(x as isize + 1, width), y);
        let up = src.get(x, reflect101(y as isize - 1, height));
        let down = src.get(x, reflect101(y as isize + 1, height));

        left + right + up + down - 4.0 * src.get(x, y)
    })
}
