/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Gaussian and Laplacian image pyramids
//!
//! Both directions use the 5 tap binomial kernel `[1 4 6 4 1] / 16`,
//! borders are mirrored.
use crate::plane::Plane;
use crate::utils::reflect101;

const KERNEL: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];

/// Convolve rows then columns with the binomial kernel scaled by `scale`
fn separable_blur(src: &Plane, scale: f32) -> Plane {
    let (width, height) = src.dimensions();

    let horizontal = Plane::from_fn(width, height, |x, y| {
        let mut sum = 0.0;
        for (k, weight) in KERNEL.iter().enumerate() {
            let sx = reflect101(x as isize + k as isize - 2, width);
            sum += weight * src.get(sx, y);
        }
        sum * scale
    });

    Plane::from_fn(width, height, |x, y| {
        let mut sum = 0.0;
        for (k, weight) in KERNEL.iter().enumerate() {
            let sy = reflect101(y as isize + k as isize - 2, height);
            sum += weight * horizontal.get(x, sy);
        }
        sum * scale
    })
}

/// Blur and drop every other row and column
///
/// The result is `((w + 1) / 2, (h + 1) / 2)`
#[must_use]
pub fn pyr_down(src: &Plane) -> Plane {
    let (width, height) = src.dimensions();

    if width == 0 || height == 0 {
        return src.clone();
    }
    let blurred = separable_blur(src, 1.0 / 16.0);

    Plane::from_fn((width + 1) / 2, (height + 1) / 2, |x, y| blurred.get(2 * x, 2 * y))
}

/// Upsample to `(out_width, out_height)` by inserting zeros and blurring
///
/// The blur kernel is scaled by four to make up for the zeros.
#[must_use]
pub fn pyr_up(src: &Plane, out_width: usize, out_height: usize) -> Plane {
    if src.width() == 0 || src.height() == 0 {
        return Plane::new(out_width, out_height);
    }
    let mut upsampled = Plane::new(out_width, out_height);

    for y in 0..src.height() {
        for x in 0..src.width() {
            if 2 * x < out_width && 2 * y < out_height {
                upsampled.set(2 * x, 2 * y, src.get(x, y));
            }
        }
    }
    separable_blur(&upsampled, 1.0 / 8.0)
}

/// Gaussian pyramid with `levels + 1` planes, the input first
pub fn gaussian_pyramid(src: &Plane, levels: usize) -> Vec<Plane> {
    let mut pyramid = Vec::with_capacity(levels + 1);
    pyramid.push(src.clone());

    for level in 0..levels {
        let next = pyr_down(&pyramid[level]);
        pyramid.push(next);
    }
    pyramid
}

/// Laplacian pyramid with `levels + 1` planes
///
/// Each level holds the detail lost between it and the next coarser
/// level, the last one holds the coarsest gaussian level.
pub fn laplacian_pyramid(src: &Plane, levels: usize) -> Vec<Plane> {
    let mut pyramid = gaussian_pyramid(src, levels);

    for level in 0..levels {
        let (w, h) = pyramid[level].dimensions();
        let up = pyr_up(&pyramid[level + 1], w, h);

        pyramid[level] = pyramid[level].zip_map(&up, |a, b| a - b);
    }
    pyramid
}

/// Rebuild an image from a Laplacian pyramid
pub fn collapse(mut pyramid: Vec<Plane>) -> Plane {
    while pyramid.len() > 1 {
        let Some(coarse) = pyramid.pop() else {
            break;
        };
        let Some(finer) = pyramid.last_mut() else {
            break;
        };
        let (w, h) = finer.dimensions();
        finer.add_assign(&pyr_up(&coarse, w, h));
    }
    pyramid.pop().unwrap_or_else(|| Plane::new(0, 0))
}
