/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Gradient domain tonemapping
//!
//! Log luminance is turned into a pyramid of contrasts (horizontal and
//! vertical gradients at every scale). Contrasts are mapped through a
//! perceptual response, multiplied by `scale`, mapped back, and the
//! luminance that best reproduces them is recovered with conjugate
//! gradients.
//!
//! Reference: R. Mantiuk, K. Myszkowski and H.-P. Seidel, "A Perceptual
//! Framework for Contrast Processing of High Dynamic Range Images", 2006
use hdr_core::errors::HdrErrors;
use hdr_core::image::HdrImage;
use hdr_core::tonemap::MantiukParams;
use log::{debug, trace};

use crate::gamma::gamma_tonemap;
use crate::plane::Plane;
use crate::traits::ToneMapOperation;
use crate::utils::{log_plane, luminance, map_luminance};

/// Exponent of the contrast response
const RESPONSE_POWER: f32 = 0.4185;
/// Relative residual at which the solver stops
const TARGET_ERROR: f64 = 1e-3;
const MAX_ITERATIONS: usize = 100;

#[derive(Copy, Clone, Debug)]
pub struct Mantiuk {
    params: MantiukParams
}

impl Mantiuk {
    #[must_use]
    pub fn new(params: MantiukParams) -> Mantiuk {
        Mantiuk { params }
    }

    fn map_contrast(&self, contrast: &Plane) -> Plane {
        contrast.map(|v| {
            let response = signed_pow(v, RESPONSE_POWER) * self.params.scale;
            signed_pow(response, 1.0 / RESPONSE_POWER)
        })
    }
}

impl ToneMapOperation for Mantiuk {
    fn name(&self) -> &'static str {
        "mantiuk"
    }

    fn process_impl(&self, image: &HdrImage) -> Result<HdrImage, HdrErrors> {
        let img = gamma_tonemap(image, 1.0);
        let gray = luminance(&img);
        let log_img = log_plane(&gray);

        let (x_contrast, y_contrast) = contrast_pyramid(&log_img);

        let solution = if x_contrast.is_empty() {
            debug!("Image too small for a contrast pyramid, luminance is kept");
            log_img
        } else {
            let x_contrast: Vec<Plane> = x_contrast.iter().map(|c| self.map_contrast(c)).collect();
            let y_contrast: Vec<Plane> = y_contrast.iter().map(|c| self.map_contrast(c)).collect();

            let right = divergence_sum(&x_contrast, &y_contrast);
            solve(&right, log_img)
        };

        let new_lum = solution.map(f32::exp);
        let img = map_luminance(&img, &gray, &new_lum, self.params.saturation);

        Ok(gamma_tonemap(&img, self.params.gamma))
    }
}

#[inline]
fn signed_pow(value: f32, power: f32) -> f32 {
    let sign = if value > 0.0 { 1.0 } else { -1.0 };
    value.abs().powf(power) * sign
}

/// Differences along each row
///
/// With `backward == false` this is the forward difference
/// `dst[j] = src[j + 1] - src[j]` with the last column zero. With
/// `backward == true` it is `dst[j] = src[j] - src[j - 1]` with the first
/// column copied, which is the adjoint of the forward difference up to sign.
fn row_gradient(src: &Plane, backward: bool) -> Plane {
    let (width, height) = src.dimensions();

    Plane::from_fn(width, height, |x, y| {
        if backward {
            if x == 0 {
                src.get(0, y)
            } else {
                src.get(x, y) - src.get(x - 1, y)
            }
        } else if x + 1 < width {
            src.get(x + 1, y) - src.get(x, y)
        } else {
            0.0
        }
    })
}

/// Horizontal and vertical contrasts of `src` at every pyramid level
///
/// Vertical contrasts are stored transposed.
fn contrast_pyramid(src: &Plane) -> (Vec<Plane>, Vec<Plane>) {
    let min_dim = src.width().min(src.height());

    let levels = if min_dim == 0 {
        0
    } else {
        (min_dim as f32).log2().floor() as usize
    };

    let mut x_contrast = Vec::with_capacity(levels);
    let mut y_contrast = Vec::with_capacity(levels);

    let mut layer = src.clone();

    for _ in 0..levels {
        x_contrast.push(row_gradient(&layer, false));
        y_contrast.push(row_gradient(&layer.transpose(), false));

        layer = layer.resize_bilinear(layer.width() / 2, layer.height() / 2);
    }
    (x_contrast, y_contrast)
}

/// Collapse a contrast pyramid back into a single plane
fn divergence_sum(x_contrast: &[Plane], y_contrast: &[Plane]) -> Plane {
    let Some(last) = x_contrast.last() else {
        return Plane::new(0, 0);
    };
    let mut sum = Plane::new(last.width(), last.height());

    for (x_level, y_level) in x_contrast.iter().zip(y_contrast.iter()).rev() {
        let grad_x = row_gradient(x_level, true);
        let grad_y = row_gradient(y_level, true).transpose();

        sum = sum.resize_bilinear(x_level.width(), x_level.height());
        sum.add_assign(&grad_x);
        sum.add_assign(&grad_y);
    }
    sum
}

/// The linear operator of the system, contrasts then divergence
fn product(src: &Plane) -> Plane {
    let (x_contrast, y_contrast) = contrast_pyramid(src);
    divergence_sum(&x_contrast, &y_contrast)
}

/// Conjugate gradients on `product(x) = right`, starting from `x`
fn solve(right: &Plane, mut x: Plane) -> Plane {
    let mut r = right.zip_map(&product(&x), |a, b| a - b);
    let mut p = r.clone();

    let target_norm = right.dot(right) * TARGET_ERROR * TARGET_ERROR;
    let mut rr = r.dot(&r);

    for iteration in 0..MAX_ITERATIONS {
        if rr < target_norm {
            trace!("Converged after {iteration} iterations");
            break;
        }
        let ap = product(&p);
        let dprod = p.dot(&ap);

        if dprod.abs() <= f64::EPSILON {
            debug!("Conjugate gradient stalled after {iteration} iterations");
            break;
        }
        let alpha = (rr / dprod) as f32;

        r = r.zip_map(&ap, |r, ap| r - alpha * ap);
        x = x.zip_map(&p, |x, p| x + alpha * p);

        let new_rr = r.dot(&r);
        let beta = (new_rr / rr) as f32;

        p = r.zip_map(&p, |r, p| r + beta * p);
        rr = new_rr;
    }
    x
}
