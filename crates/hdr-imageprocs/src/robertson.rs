/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Robertson response calibration and radiance merging
//!
//! Calibration alternates between merging radiance with the current
//! response and re-estimating the response as the average radiance times
//! exposure of every pixel with a given value, until the curve settles.
//!
//! Reference: M. Robertson, S. Borman and R. Stevenson, "Dynamic range
//! improvement through multiple exposures", 1999
use hdr_core::errors::HdrErrors;
use hdr_core::image::{HdrImage, LdrImage, CHANNELS};
use log::{debug, trace};

use crate::debevec::check_stack;
use crate::response::{robertson_weights, CameraResponse, LDR_SIZE};

/// Recover a camera response iteratively
#[derive(Copy, Clone, Debug)]
pub struct CalibrateRobertson {
    max_iter:  usize,
    threshold: f32
}

impl Default for CalibrateRobertson {
    fn default() -> Self {
        CalibrateRobertson {
            max_iter:  30,
            threshold: 0.01
        }
    }
}

impl CalibrateRobertson {
    #[must_use]
    pub fn new() -> CalibrateRobertson {
        CalibrateRobertson::default()
    }

    #[must_use]
    pub fn set_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Stop once the mean absolute change of the curve falls below this
    #[must_use]
    pub fn set_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub const fn name(&self) -> &'static str {
        "calibrate robertson"
    }

    /// Estimate the response of each channel
    ///
    /// Values that never occur in the stack get a response of zero. Each
    /// channel is normalised so mid gray maps to one, unless mid gray never
    /// occurs on that channel.
    ///
    /// # Errors
    /// [`HdrErrors::InvalidParameter`] if the stack is empty or `times` does not match it
    pub fn process(&self, images: &[LdrImage], times: &[f32]) -> Result<CameraResponse, HdrErrors> {
        check_stack(images, times)?;

        let mut response = CameraResponse::linear(1.0 / (LDR_SIZE as f32 / 2.0));

        // number of occurrences of each value, inverted
        let mut card = vec![[0.0_f32; CHANNELS]; LDR_SIZE];

        for image in images {
            for px in image.pixels().chunks_exact(CHANNELS) {
                for (c, value) in px.iter().enumerate() {
                    card[usize::from(*value)][c] += 1.0;
                }
            }
        }
        for entry in &mut card {
            for v in entry.iter_mut() {
                *v = if *v == 0.0 { 0.0 } else { 1.0 / *v };
            }
        }

        let merge = MergeRobertson::new();

        for iteration in 0..self.max_iter {
            let radiance = merge.process(images, times, &response)?;

            let mut new_response = vec![[0.0_f32; CHANNELS]; LDR_SIZE];

            for (image, time) in images.iter().zip(times) {
                for (px, rad) in image
                    .pixels()
                    .chunks_exact(CHANNELS)
                    .zip(radiance.pixels().chunks_exact(CHANNELS))
                {
                    for (c, (value, r)) in px.iter().zip(rad).enumerate() {
                        new_response[usize::from(*value)][c] += time * r;
                    }
                }
            }
            for (entry, count) in new_response.iter_mut().zip(&card) {
                for (v, inv) in entry.iter_mut().zip(count) {
                    *v *= inv;
                }
            }
            for c in 0..CHANNELS {
                let middle = new_response[LDR_SIZE / 2][c];

                if middle != 0.0 {
                    for entry in &mut new_response {
                        entry[c] /= middle;
                    }
                }
            }

            let diff: f32 = new_response
                .iter()
                .zip(response.curve())
                .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()))
                .sum::<f32>()
                / CHANNELS as f32;

            response.curve_mut().copy_from_slice(&new_response);

            trace!("Iteration {iteration}: response changed by {diff}");

            if diff < self.threshold {
                debug!("Response converged after {} iterations", iteration + 1);
                break;
            }
        }
        Ok(response)
    }
}

/// Merge an exposure stack into radiance using a calibrated response
#[derive(Copy, Clone, Debug, Default)]
pub struct MergeRobertson;

impl MergeRobertson {
    #[must_use]
    pub fn new() -> MergeRobertson {
        MergeRobertson
    }

    pub const fn name(&self) -> &'static str {
        "merge robertson"
    }

    /// Maximum likelihood radiance, `sum(t * w * f(Z)) / sum(t^2 * w)`
    ///
    /// # Errors
    /// [`HdrErrors::InvalidParameter`] if the stack is empty or `times` does not match it
    pub fn process(
        &self, images: &[LdrImage], times: &[f32], response: &CameraResponse
    ) -> Result<HdrImage, HdrErrors> {
        check_stack(images, times)?;

        let weights = robertson_weights();
        let (width, height) = images[0].dimensions();
        let len = width * height * CHANNELS;

        let mut result = vec![0.0_f32; len];
        let mut wsum = vec![0.0_f32; len];

        for (image, time) in images.iter().zip(times) {
            for (i, value) in image.pixels().iter().enumerate() {
                let w = weights[usize::from(*value)];
                let c = i % CHANNELS;

                result[i] += time * w * response.get(*value, c);
                wsum[i] += time * time * w;
            }
        }

        let epsilon = f64::EPSILON as f32;

        for (r, w) in result.iter_mut().zip(wsum.iter()) {
            *r /= *w + epsilon;
        }
        HdrImage::new(result, width, height)
    }
}
