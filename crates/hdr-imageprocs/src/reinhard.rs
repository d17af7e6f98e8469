/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Photoreceptor based global tonemapping
//!
//! Each channel is compressed by `c / (c + (i * a)^m)` where `a` is an
//! adaptation level mixed from the pixel, its luminance and the image
//! averages, `i` comes from `intensity` and the exponent `m` from the key
//! of the image.
//!
//! Reference: E. Reinhard and K. Devlin, "Dynamic Range Reduction inspired
//! by Photoreceptor Physiology", 2005
use hdr_core::errors::HdrErrors;
use hdr_core::image::{HdrImage, CHANNELS};
use hdr_core::tonemap::ReinhardParams;

use crate::gamma::gamma_tonemap;
use crate::plane::Plane;
use crate::traits::ToneMapOperation;
use crate::utils::{log_plane, luminance};

#[derive(Copy, Clone, Debug)]
pub struct Reinhard {
    params: ReinhardParams
}

impl Reinhard {
    #[must_use]
    pub fn new(params: ReinhardParams) -> Reinhard {
        Reinhard { params }
    }
}

impl ToneMapOperation for Reinhard {
    fn name(&self) -> &'static str {
        "reinhard"
    }

    fn process_impl(&self, image: &HdrImage) -> Result<HdrImage, HdrErrors> {
        let params = &self.params;

        let img = gamma_tonemap(image, 1.0);
        let gray = luminance(&img);

        let log_img = log_plane(&gray);
        let log_mean = log_img.mean();
        let (log_min, log_max) = log_img.min_max();

        let key = if log_max - log_min > f32::EPSILON {
            (log_max - log_mean) / (log_max - log_min)
        } else {
            0.0
        };
        let map_key = 0.3 + 0.7 * key.powf(1.4);
        let intensity = (-params.intensity).exp();

        let gray_mean = gray.mean();
        let color_adapt = params.color_adapt;
        let light_adapt = params.light_adapt;

        let mut channels: [Plane; CHANNELS] = [0, 1, 2].map(|c| Plane::from_channel(&img, c));

        for channel in &mut channels {
            let chan_mean = channel.mean();
            let global = color_adapt * chan_mean + (1.0 - color_adapt) * gray_mean;

            *channel = channel.zip_map(&gray, |c, g| {
                let adapt = color_adapt * c + (1.0 - color_adapt) * g;
                let adapt = light_adapt * adapt + (1.0 - light_adapt) * global;
                let adapt = (intensity * adapt).powf(map_key);

                let denominator = adapt + c;
                if denominator == 0.0 {
                    0.0
                } else {
                    c / denominator
                }
            });
        }

        let img = crate::utils::interleave(&channels);

        Ok(gamma_tonemap(&img, params.gamma))
    }
}

#[cfg(test)]
mod tests {
    use hdr_core::image::HdrImage;
    use hdr_core::tonemap::ReinhardParams;

    use crate::reinhard::Reinhard;
    use crate::traits::ToneMapOperation;

    fn radiance() -> HdrImage {
        HdrImage::from_fn(16, 8, |x, y, c| 0.01 * 2_f32.powf((x + y) as f32 * 0.6) + c as f32 * 0.05)
    }

    #[test]
    fn output_is_normalised_and_ordered() {
        let mapped = Reinhard::new(ReinhardParams::default())
            .process(&radiance())
            .unwrap();

        assert_eq!(mapped.dimensions(), (16, 8));
        assert!(mapped.pixels().iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
        assert!(mapped.get(15, 7, 0) > mapped.get(0, 0, 0));
    }

    #[test]
    fn full_adaptation_settings_stay_finite() {
        let params = ReinhardParams {
            gamma:       2.2,
            intensity:   -3.0,
            light_adapt: 0.0,
            color_adapt: 1.0
        };
        let mapped = Reinhard::new(params).process(&radiance()).unwrap();

        assert!(mapped.pixels().iter().all(|v| v.is_finite()));
    }
}
