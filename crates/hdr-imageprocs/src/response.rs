/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Camera response curves and pixel weighting functions
use hdr_core::image::CHANNELS;

/// Number of distinct values of an 8-bit component
pub const LDR_SIZE: usize = 256;

/// Map from an 8-bit pixel value to relative radiance, per channel
#[derive(Clone, Debug, PartialEq)]
pub struct CameraResponse {
    curve: Vec<[f32; CHANNELS]>
}

impl CameraResponse {
    /// Response where value `i` maps to `i * scale` on every channel
    pub fn linear(scale: f32) -> CameraResponse {
        CameraResponse {
            curve: (0..LDR_SIZE).map(|i| [i as f32 * scale; CHANNELS]).collect()
        }
    }

    /// Build a response from per channel curves of [`LDR_SIZE`] values
    ///
    /// Missing values are zero.
    pub fn from_channels(channels: &[Vec<f32>; CHANNELS]) -> CameraResponse {
        let curve = (0..LDR_SIZE)
            .map(|i| {
                let mut entry = [0.0; CHANNELS];
                for (c, channel) in channels.iter().enumerate() {
                    entry[c] = channel.get(i).copied().unwrap_or(0.0);
                }
                entry
            })
            .collect();

        CameraResponse { curve }
    }

    #[inline]
    pub fn get(&self, value: u8, channel: usize) -> f32 {
        self.curve[usize::from(value)][channel]
    }

    /// The curve of a single channel
    pub fn channel(&self, channel: usize) -> Vec<f32> {
        self.curve.iter().map(|x| x[channel]).collect()
    }

    pub fn curve(&self) -> &[[f32; CHANNELS]] {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut [[f32; CHANNELS]] {
        &mut self.curve
    }
}

/// Hat shaped weights peaking at mid gray
///
/// Values near the ends of the range are least trusted, the weight of
/// `i` is `i + 1` below 128 and `256 - i` above.
pub fn triangle_weights() -> [f32; LDR_SIZE] {
    let mut weights = [0.0; LDR_SIZE];
    let half = LDR_SIZE / 2;

    for (i, weight) in weights.iter_mut().enumerate() {
        *weight = if i < half {
            (i + 1) as f32
        } else {
            (LDR_SIZE - i) as f32
        };
    }
    weights
}

/// Gaussian like weights that reach exactly zero at 0 and 255
pub fn robertson_weights() -> [f32; LDR_SIZE] {
    let mut weights = [0.0; LDR_SIZE];

    let q = (LDR_SIZE - 1) as f32 / 4.0;
    let e4 = 4.0_f32.exp();
    let scale = e4 / (e4 - 1.0);
    let shift = 1.0 / (1.0 - e4);

    for (i, weight) in weights.iter_mut().enumerate() {
        let value = i as f32 / q - 2.0;
        *weight = scale * (-value * value).exp() + shift;
    }
    weights
}
