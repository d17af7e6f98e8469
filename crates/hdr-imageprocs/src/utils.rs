/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use hdr_core::image::{HdrImage, LdrImage, CHANNELS};

use crate::plane::Plane;

/// Rec.601 luma coefficients for R, G and B
pub const LUMA_COEFFICIENTS: [f32; CHANNELS] = [0.299, 0.587, 0.114];

/// Smallest value passed to the logarithm of luminance
pub const LOG_FLOOR: f32 = 1e-4;

/// Map an index that may fall outside `0..len` back inside by mirroring
/// around the edge pixels, without repeating them
///
/// `-1` maps to `1`, `len` maps to `len - 2`
#[inline]
pub fn reflect101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let mut i = index.rem_euclid(period);

    if i >= len as isize {
        i = period - i;
    }
    i as usize
}

/// Minimum and maximum of `values` ignoring NaN
///
/// Returns `(0.0, 0.0)` if there is nothing to compare
pub fn min_max(values: &[f32]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;

    for value in values.iter().filter(|x| !x.is_nan()) {
        min = min.min(*value);
        max = max.max(*value);
    }
    if min > max {
        return (0.0, 0.0);
    }
    (min, max)
}

/// Weighted sum of the three channels
pub fn luminance(image: &HdrImage) -> Plane {
    let (width, height) = image.dimensions();
    let data = image
        .pixels()
        .chunks_exact(CHANNELS)
        .map(|px| {
            px[0] * LUMA_COEFFICIENTS[0] + px[1] * LUMA_COEFFICIENTS[1] + px[2] * LUMA_COEFFICIENTS[2]
        })
        .collect();

    Plane::from_vec(data, width, height)
}

/// 8-bit gray conversion, rounded to nearest
pub fn luminance_u8(image: &LdrImage) -> Vec<u8> {
    image
        .pixels()
        .chunks_exact(CHANNELS)
        .map(|px| {
            let gray = f32::from(px[0]) * LUMA_COEFFICIENTS[0]
                + f32::from(px[1]) * LUMA_COEFFICIENTS[1]
                + f32::from(px[2]) * LUMA_COEFFICIENTS[2];
            gray.round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// Natural log with small values clamped to [`LOG_FLOOR`]
pub fn log_plane(plane: &Plane) -> Plane {
    plane.map(|v| v.max(LOG_FLOOR).ln())
}

/// Convert bytes to floats in `[0, 1]`
pub fn normalize_ldr(image: &LdrImage) -> HdrImage {
    image.map(|v| f32::from(v) / 255.0)
}

/// Interleave three planes of equal size into an image
pub fn interleave(planes: &[Plane; CHANNELS]) -> HdrImage {
    let (width, height) = planes[0].dimensions();

    HdrImage::from_fn(width, height, |x, y, c| planes[c].get(x, y))
}

/// Replace the luminance of `image` by `new_lum`
///
/// Each channel is divided by the old luminance, raised to `saturation`,
/// then multiplied by the new luminance. A pixel with zero luminance
/// becomes black.
pub fn map_luminance(image: &HdrImage, lum: &Plane, new_lum: &Plane, saturation: f32) -> HdrImage {
    let mut output = image.clone();

    for ((px, old), new) in output
        .pixels_mut()
        .chunks_exact_mut(CHANNELS)
        .zip(lum.data())
        .zip(new_lum.data())
    {
        for c in px.iter_mut() {
            let ratio = if *old == 0.0 { 0.0 } else { *c / *old };
            *c = ratio.abs().powf(saturation) * *new;
        }
    }
    output
}
