/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Tonemap operator selection and per-operator parameters
//!
//! Each operator owns a parameter struct holding exactly the fields it
//! understands. [`ToneMapSettings`] tags which operator is in use.
//!
//! Settings can also be built from `(field, value)` pairs with
//! [`ToneMapSettings::from_fields`], which rejects fields the operator
//! does not take.
use std::str::FromStr;

use crate::errors::HdrErrors;

/// Plain gamma tonemap, normalises by min/max and applies `1/gamma`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GammaParams {
    pub gamma: f32
}

impl Default for GammaParams {
    fn default() -> Self {
        GammaParams { gamma: 2.2 }
    }
}

/// Adaptive logarithmic mapping (Drago et al.)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragoParams {
    pub gamma:      f32,
    pub saturation: f32,
    /// Value of the bias function, in (0, 1]
    pub bias:       f32
}

impl Default for DragoParams {
    fn default() -> Self {
        DragoParams {
            gamma:      1.0,
            saturation: 1.0,
            bias:       0.85
        }
    }
}

/// Bilateral filter base/detail decomposition (Durand & Dorsey)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DurandParams {
    pub gamma:       f32,
    /// Target contrast of the base layer, in log units
    pub contrast:    f32,
    pub saturation:  f32,
    pub sigma_space: f32,
    pub sigma_color: f32
}

impl Default for DurandParams {
    fn default() -> Self {
        DurandParams {
            gamma:       2.2,
            contrast:    4.0,
            saturation:  1.0,
            sigma_space: 2.0,
            sigma_color: 2.0
        }
    }
}

/// Gradient domain contrast compression (Mantiuk et al.)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MantiukParams {
    pub gamma:      f32,
    /// Contrast scale factor, lower compresses more
    pub scale:      f32,
    pub saturation: f32
}

impl Default for MantiukParams {
    fn default() -> Self {
        MantiukParams {
            gamma:      2.2,
            scale:      0.7,
            saturation: 1.0
        }
    }
}

/// Exposure fusion (Mertens et al.), followed by a gamma tonemap
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MertensParams {
    pub gamma:      f32,
    /// Exponent of the contrast weight
    pub contrast:   f32,
    /// Exponent of the saturation weight
    pub saturation: f32,
    /// Exponent of the well-exposedness weight
    pub exposure:   f32
}

impl Default for MertensParams {
    fn default() -> Self {
        MertensParams {
            gamma:      2.2,
            contrast:   1.0,
            saturation: 1.0,
            exposure:   0.0
        }
    }
}

/// Photoreceptor based global operator (Reinhard & Devlin)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReinhardParams {
    pub gamma:       f32,
    /// Overall brightness, in log2 steps
    pub intensity:   f32,
    /// 0 is global adaptation, 1 is per pixel
    pub light_adapt: f32,
    /// 0 treats channels equally, 1 adapts each channel on its own
    pub color_adapt: f32
}

impl Default for ReinhardParams {
    fn default() -> Self {
        ReinhardParams {
            gamma:       1.0,
            intensity:   0.0,
            light_adapt: 1.0,
            color_adapt: 0.0
        }
    }
}

/// Which tonemap operator to run, along with its parameters
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ToneMapSettings {
    Gamma(GammaParams),
    Drago(DragoParams),
    Durand(DurandParams),
    Mantiuk(MantiukParams),
    Mertens(MertensParams),
    Reinhard(ReinhardParams)
}

/// Operator names, without parameters
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ToneMapOperator {
    Gamma,
    Drago,
    Durand,
    Mantiuk,
    Mertens,
    Reinhard
}

impl ToneMapOperator {
    pub const fn name(self) -> &'static str {
        match self {
            ToneMapOperator::Gamma => "gamma",
            ToneMapOperator::Drago => "drago",
            ToneMapOperator::Durand => "durand",
            ToneMapOperator::Mantiuk => "mantiuk",
            ToneMapOperator::Mertens => "mertens",
            ToneMapOperator::Reinhard => "reinhard"
        }
    }

    /// Field names accepted by this operator
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            ToneMapOperator::Gamma => &["gamma"],
            ToneMapOperator::Drago => &["gamma", "saturation", "bias"],
            ToneMapOperator::Durand => &[
                "gamma",
                "contrast",
                "saturation",
                "sigma-space",
                "sigma-color"
            ],
            ToneMapOperator::Mantiuk => &["gamma", "scale", "saturation"],
            ToneMapOperator::Mertens => &["gamma", "contrast", "saturation", "exposure"],
            ToneMapOperator::Reinhard => &["gamma", "intensity", "light-adapt", "color-adapt"]
        }
    }

    /// Settings for this operator with every field at its default
    pub fn default_settings(self) -> ToneMapSettings {
        match self {
            ToneMapOperator::Gamma => ToneMapSettings::Gamma(GammaParams::default()),
            ToneMapOperator::Drago => ToneMapSettings::Drago(DragoParams::default()),
            ToneMapOperator::Durand => ToneMapSettings::Durand(DurandParams::default()),
            ToneMapOperator::Mantiuk => ToneMapSettings::Mantiuk(MantiukParams::default()),
            ToneMapOperator::Mertens => ToneMapSettings::Mertens(MertensParams::default()),
            ToneMapOperator::Reinhard => ToneMapSettings::Reinhard(ReinhardParams::default())
        }
    }

    pub const fn variants() -> &'static [ToneMapOperator] {
        &[
            ToneMapOperator::Gamma,
            ToneMapOperator::Drago,
            ToneMapOperator::Durand,
            ToneMapOperator::Mantiuk,
            ToneMapOperator::Mertens,
            ToneMapOperator::Reinhard
        ]
    }
}

impl FromStr for ToneMapOperator {
    type Err = HdrErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();

        // `create` is the command name of the plain gamma operator
        if lowered == "create" {
            return Ok(ToneMapOperator::Gamma);
        }
        for variant in Self::variants() {
            if variant.name() == lowered {
                return Ok(*variant);
            }
        }
        Err(HdrErrors::UnsupportedAlgorithm(s.to_string()))
    }
}

impl ToneMapSettings {
    pub const fn operator(&self) -> ToneMapOperator {
        match self {
            ToneMapSettings::Gamma(_) => ToneMapOperator::Gamma,
            ToneMapSettings::Drago(_) => ToneMapOperator::Drago,
            ToneMapSettings::Durand(_) => ToneMapOperator::Durand,
            ToneMapSettings::Mantiuk(_) => ToneMapOperator::Mantiuk,
            ToneMapSettings::Mertens(_) => ToneMapOperator::Mertens,
            ToneMapSettings::Reinhard(_) => ToneMapOperator::Reinhard
        }
    }

    pub const fn name(&self) -> &'static str {
        self.operator().name()
    }

    /// Build settings for `operator` starting from defaults and
    /// overriding the named fields
    ///
    /// # Errors
    /// - [`HdrErrors::UnsupportedAlgorithm`] if the operator is unknown
    /// - [`HdrErrors::InvalidParameter`] if a field does not belong to
    ///   the operator or its value is out of range
    pub fn from_fields(operator: &str, fields: &[(&str, f32)]) -> Result<Self, HdrErrors> {
        let mut settings = operator.parse::<ToneMapOperator>()?.default_settings();

        for (field, value) in fields {
            settings.set_field(field, *value)?;
        }
        settings.validate()?;

        Ok(settings)
    }

    /// Override a single field
    ///
    /// # Errors
    /// If the field is not one of [`ToneMapOperator::fields`]
    pub fn set_field(&mut self, field: &str, value: f32) -> Result<(), HdrErrors> {
        let name = self.name();

        let slot = match (self, field) {
            (ToneMapSettings::Gamma(p), "gamma") => &mut p.gamma,

            (ToneMapSettings::Drago(p), "gamma") => &mut p.gamma,
            (ToneMapSettings::Drago(p), "saturation") => &mut p.saturation,
            (ToneMapSettings::Drago(p), "bias") => &mut p.bias,

            (ToneMapSettings::Durand(p), "gamma") => &mut p.gamma,
            (ToneMapSettings::Durand(p), "contrast") => &mut p.contrast,
            (ToneMapSettings::Durand(p), "saturation") => &mut p.saturation,
            (ToneMapSettings::Durand(p), "sigma-space") => &mut p.sigma_space,
            (ToneMapSettings::Durand(p), "sigma-color") => &mut p.sigma_color,

            (ToneMapSettings::Mantiuk(p), "gamma") => &mut p.gamma,
            (ToneMapSettings::Mantiuk(p), "scale") => &mut p.scale,
            (ToneMapSettings::Mantiuk(p), "saturation") => &mut p.saturation,

            (ToneMapSettings::Mertens(p), "gamma") => &mut p.gamma,
            (ToneMapSettings::Mertens(p), "contrast") => &mut p.contrast,
            (ToneMapSettings::Mertens(p), "saturation") => &mut p.saturation,
            (ToneMapSettings::Mertens(p), "exposure") => &mut p.exposure,

            (ToneMapSettings::Reinhard(p), "gamma") => &mut p.gamma,
            (ToneMapSettings::Reinhard(p), "intensity") => &mut p.intensity,
            (ToneMapSettings::Reinhard(p), "light-adapt") => &mut p.light_adapt,
            (ToneMapSettings::Reinhard(p), "color-adapt") => &mut p.color_adapt,

            (_, field) => {
                return Err(HdrErrors::InvalidParameter(
                    name,
                    format!("{name} does not take a {field:?} parameter")
                ));
            }
        };
        *slot = value;

        Ok(())
    }

    /// Check that every field holds a usable value
    ///
    /// # Errors
    /// [`HdrErrors::InvalidParameter`] naming the first bad field
    pub fn validate(&self) -> Result<(), HdrErrors> {
        let name = self.name();

        let (fields, values): (&[&str], Vec<f32>) = match self {
            ToneMapSettings::Gamma(p) => (self.operator().fields(), vec![p.gamma]),
            ToneMapSettings::Drago(p) => {
                check_range(name, "bias", p.bias, f32::MIN_POSITIVE, 1.0)?;
                (self.operator().fields(), vec![p.gamma, p.saturation, p.bias])
            }
            ToneMapSettings::Durand(p) => {
                check_positive(name, "sigma-space", p.sigma_space)?;
                check_positive(name, "sigma-color", p.sigma_color)?;
                (
                    self.operator().fields(),
                    vec![p.gamma, p.contrast, p.saturation, p.sigma_space, p.sigma_color]
                )
            }
            ToneMapSettings::Mantiuk(p) => {
                (self.operator().fields(), vec![p.gamma, p.scale, p.saturation])
            }
            ToneMapSettings::Mertens(p) => (
                self.operator().fields(),
                vec![p.gamma, p.contrast, p.saturation, p.exposure]
            ),
            ToneMapSettings::Reinhard(p) => {
                check_range(name, "light-adapt", p.light_adapt, 0.0, 1.0)?;
                check_range(name, "color-adapt", p.color_adapt, 0.0, 1.0)?;
                (
                    self.operator().fields(),
                    vec![p.gamma, p.intensity, p.light_adapt, p.color_adapt]
                )
            }
        };

        for (field, value) in fields.iter().zip(values) {
            if !value.is_finite() {
                return Err(HdrErrors::InvalidParameter(
                    name,
                    format!("{field} must be a finite number, got {value}")
                ));
            }
        }
        // gamma is always the first field
        check_positive(name, "gamma", gamma_of(self))
    }
}

fn gamma_of(settings: &ToneMapSettings) -> f32 {
    match settings {
        ToneMapSettings::Gamma(p) => p.gamma,
        ToneMapSettings::Drago(p) => p.gamma,
        ToneMapSettings::Durand(p) => p.gamma,
        ToneMapSettings::Mantiuk(p) => p.gamma,
        ToneMapSettings::Mertens(p) => p.gamma,
        ToneMapSettings::Reinhard(p) => p.gamma
    }
}

fn check_positive(operator: &'static str, field: &str, value: f32) -> Result<(), HdrErrors> {
    if value > 0.0 {
        return Ok(());
    }
    Err(HdrErrors::InvalidParameter(
        operator,
        format!("{field} must be greater than zero, got {value}")
    ))
}

fn check_range(
    operator: &'static str, field: &str, value: f32, min: f32, max: f32
) -> Result<(), HdrErrors> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(HdrErrors::InvalidParameter(
        operator,
        format!("{field} must be between {min} and {max}, got {value}")
    ))
}
