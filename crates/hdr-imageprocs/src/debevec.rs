/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Debevec response calibration and radiance merging
//!
//! The log inverse response `g` satisfies `g(Z) = ln(E) + ln(t)` for a pixel
//! of radiance `E` exposed for `t` seconds. Sampling a grid of pixels across
//! all exposures gives an overdetermined linear system in `g` and the sample
//! radiances, regularised by a second derivative smoothness term. It is
//! solved in the least squares sense with an SVD.
//!
//! Reference: P. Debevec and J. Malik, "Recovering High Dynamic Range
//! Radiance Maps from Photographs", 1997
use hdr_core::errors::HdrErrors;
use hdr_core::image::{HdrImage, LdrImage, CHANNELS};
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};

use crate::response::{triangle_weights, CameraResponse, LDR_SIZE};

/// Singular values below this are treated as zero
const SVD_EPSILON: f64 = 1e-10;

/// Recover a camera response from an exposure stack
#[derive(Copy, Clone, Debug)]
pub struct CalibrateDebevec {
    samples: usize,
    lambda:  f32
}

impl Default for CalibrateDebevec {
    fn default() -> Self {
        CalibrateDebevec {
            samples: 70,
            lambda:  10.0
        }
    }
}

impl CalibrateDebevec {
    #[must_use]
    pub fn new() -> CalibrateDebevec {
        CalibrateDebevec::default()
    }

    /// Number of pixel locations sampled, on a regular grid
    #[must_use]
    pub fn set_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(1);
        self
    }

    /// Weight of the smoothness term
    #[must_use]
    pub fn set_lambda(mut self, lambda: f32) -> Self {
        self.lambda = lambda;
        self
    }

    pub const fn name(&self) -> &'static str {
        "calibrate debevec"
    }

    /// Grid of sample locations, roughly `samples` points spread evenly
    fn sample_points(&self, width: usize, height: usize) -> Vec<(usize, usize)> {
        let x_points = ((self.samples as f64 * width as f64 / height as f64).sqrt() as usize)
            .clamp(1, width);
        let y_points = (self.samples / x_points).clamp(1, height);

        let step_x = width / x_points;
        let step_y = height / y_points;

        let mut points = Vec::with_capacity(x_points * y_points);

        for i in 0..x_points {
            let x = step_x / 2 + i * step_x;
            for j in 0..y_points {
                let y = step_y / 2 + j * step_y;
                if x < width && y < height {
                    points.push((x, y));
                }
            }
        }
        points
    }

    /// Estimate the response of each channel
    ///
    /// # Errors
    /// - [`HdrErrors::InvalidParameter`] if the stack is empty or `times` does not match it
    /// - [`HdrErrors::CalibrationError`] if the least squares solve fails
    pub fn process(&self, images: &[LdrImage], times: &[f32]) -> Result<CameraResponse, HdrErrors> {
        check_stack(images, times)?;

        let (width, height) = images[0].dimensions();
        let points = self.sample_points(width, height);

        debug!("Calibrating response from {} sample points", points.len());

        let weights = triangle_weights();
        let log_times: Vec<f64> = times.iter().map(|t| f64::from(*t).ln()).collect();
        let lambda = f64::from(self.lambda);

        let rows = points.len() * images.len() + LDR_SIZE + 1;
        let cols = LDR_SIZE + points.len();

        let mut channels: [Vec<f32>; CHANNELS] = Default::default();

        for (ch, result) in channels.iter_mut().enumerate() {
            let mut a = DMatrix::<f64>::zeros(rows, cols);
            let mut b = DVector::<f64>::zeros(rows);

            // data fitting equations
            let mut k = 0;
            for (i, (x, y)) in points.iter().enumerate() {
                for (j, image) in images.iter().enumerate() {
                    let val = image.get(*x, *y, ch);
                    let wij = f64::from(weights[usize::from(val)]);

                    a[(k, usize::from(val))] = wij;
                    a[(k, LDR_SIZE + i)] = -wij;
                    b[k] = wij * log_times[j];
                    k += 1;
                }
            }

            // fix the curve by setting its middle value to zero
            a[(k, LDR_SIZE / 2)] = 1.0;
            k += 1;

            // smoothness equations
            for i in 0..(LDR_SIZE - 2) {
                let wi = f64::from(weights[i + 1]);

                a[(k, i)] = lambda * wi;
                a[(k, i + 1)] = -2.0 * lambda * wi;
                a[(k, i + 2)] = lambda * wi;
                k += 1;
            }

            let solution = a
                .svd(true, true)
                .solve(&b, SVD_EPSILON)
                .map_err(|e| HdrErrors::CalibrationError(format!("channel {ch}: {e}")))?;

            *result = solution
                .iter()
                .take(LDR_SIZE)
                .map(|g| g.exp() as f32)
                .collect();

            trace!("Channel {ch} response at mid gray: {}", result[LDR_SIZE / 2]);
        }
        Ok(CameraResponse::from_channels(&channels))
    }
}

/// Merge an exposure stack into radiance using a calibrated response
#[derive(Copy, Clone, Debug, Default)]
pub struct MergeDebevec;

impl MergeDebevec {
    #[must_use]
    pub fn new() -> MergeDebevec {
        MergeDebevec
    }

    pub const fn name(&self) -> &'static str {
        "merge debevec"
    }

    /// Weighted average of `ln(response(Z)) - ln(t)` across the stack, exponentiated
    ///
    /// # Errors
    /// [`HdrErrors::InvalidParameter`] if the stack is empty or `times` does not match it
    pub fn process(
        &self, images: &[LdrImage], times: &[f32], response: &CameraResponse
    ) -> Result<HdrImage, HdrErrors> {
        check_stack(images, times)?;

        let weights = triangle_weights();
        let (width, height) = images[0].dimensions();
        let pixel_count = width * height;

        let mut log_response = response.clone();
        for entry in log_response.curve_mut() {
            for v in entry.iter_mut() {
                *v = v.ln();
            }
        }

        let mut result = vec![0.0_f32; pixel_count * CHANNELS];
        let mut weight_sum = vec![0.0_f32; pixel_count];

        for (image, time) in images.iter().zip(times) {
            let log_time = time.ln();

            for ((px, out), w_sum) in image
                .pixels()
                .chunks_exact(CHANNELS)
                .zip(result.chunks_exact_mut(CHANNELS))
                .zip(weight_sum.iter_mut())
            {
                let w = px.iter().map(|v| weights[usize::from(*v)]).sum::<f32>() / CHANNELS as f32;

                for (c, (value, acc)) in px.iter().zip(out.iter_mut()).enumerate() {
                    *acc += w * (log_response.get(*value, c) - log_time);
                }
                *w_sum += w;
            }
        }

        for (out, w_sum) in result.chunks_exact_mut(CHANNELS).zip(weight_sum.iter()) {
            for v in out.iter_mut() {
                *v = (*v / *w_sum).exp();
            }
        }
        HdrImage::new(result, width, height)
    }
}

/// Validate a stack of images and its exposure times
pub(crate) fn check_stack(images: &[LdrImage], times: &[f32]) -> Result<(), HdrErrors> {
    if images.is_empty() {
        return Err(HdrErrors::InvalidParameter(
            "merge",
            "at least one image is needed".to_string()
        ));
    }
    if images.len() != times.len() {
        return Err(HdrErrors::InvalidParameter(
            "merge",
            format!("{} images but {} exposure times", images.len(), times.len())
        ));
    }
    let dimensions = images[0].dimensions();

    if images.iter().any(|x| x.dimensions() != dimensions) {
        return Err(HdrErrors::InvalidParameter(
            "merge",
            "all images must have the same dimensions".to_string()
        ));
    }
    Ok(())
}
