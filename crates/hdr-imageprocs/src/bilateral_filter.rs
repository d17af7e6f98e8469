/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Edge preserving smoothing of a floating point plane
use crate::plane::Plane;
use crate::utils::reflect101;

/// Bilateral filter a plane
///
/// Each output value is the average of the values in a circular window,
/// weighted by a gaussian on their distance (`sigma_space`) and a gaussian
/// on their difference to the center value (`sigma_color`).
///
/// # Arguments
///
/// * `src`: Plane to filter
/// * `sigma_color`: Range sigma, larger values blur across stronger edges
/// * `sigma_space`: Spatial sigma, the window radius is `1.5 * sigma_space`
///
/// Borders are handled by mirroring, excluding the edge pixel.
#[must_use]
pub fn bilateral_filter(src: &Plane, sigma_color: f32, sigma_space: f32) -> Plane {
    let sigma_color = if sigma_color <= 0.0 { 1.0 } else { sigma_color };
    let sigma_space = if sigma_space <= 0.0 { 1.0 } else { sigma_space };

    let gauss_color_coeff = -0.5 / (sigma_color * sigma_color);
    let gauss_space_coeff = -0.5 / (sigma_space * sigma_space);

    let radius = ((sigma_space * 1.5).round() as isize).max(1);

    // initialize space-related bilateral coeffs
    let mut space_weight = Vec::new();
    let mut space_offs = Vec::new();

    for i in -radius..=radius {
        for j in -radius..=radius {
            let r = ((i * i + j * j) as f32).sqrt();
            if r > radius as f32 {
                continue;
            }
            space_weight.push((r * r * gauss_space_coeff).exp());
            space_offs.push((j, i));
        }
    }

    let (width, height) = src.dimensions();

    Plane::from_fn(width, height, |x, y| {
        let val0 = src.get(x, y);

        let mut sum = 0.0;
        let mut wsum = 0.0;

        for (weight, (dx, dy)) in space_weight.iter().zip(space_offs.iter()) {
            let sx = reflect101(x as isize + dx, width);
            let sy = reflect101(y as isize + dy, height);

            let val = src.get(sx, sy);
            let diff = val - val0;

            let w = weight * (diff * diff * gauss_color_coeff).exp();
            sum += val * w;
            wsum += w;
        }
        sum / wsum
    })
}
