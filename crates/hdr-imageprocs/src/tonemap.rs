/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use hdr_core::errors::HdrErrors;
use hdr_core::image::HdrImage;
use hdr_core::tonemap::ToneMapSettings;

use crate::drago::Drago;
use crate::durand::Durand;
use crate::gamma::Gamma;
use crate::mantiuk::Mantiuk;
use crate::reinhard::Reinhard;
use crate::traits::ToneMapOperation;

/// Create the operator described by `settings`
///
/// # Errors
/// - [`HdrErrors::InvalidParameter`] if a parameter is out of range
/// - [`HdrErrors::InvalidParameter`] for exposure fusion settings, fusion
///   works on the exposures and has no radiance map to tonemap
pub fn operation_for(settings: &ToneMapSettings) -> Result<Box<dyn ToneMapOperation>, HdrErrors> {
    settings.validate()?;

    let operation: Box<dyn ToneMapOperation> = match settings {
        ToneMapSettings::Gamma(params) => Box::new(Gamma::new(*params)),
        ToneMapSettings::Drago(params) => Box::new(Drago::new(*params)),
        ToneMapSettings::Durand(params) => Box::new(Durand::new(*params)),
        ToneMapSettings::Mantiuk(params) => Box::new(Mantiuk::new(*params)),
        ToneMapSettings::Reinhard(params) => Box::new(Reinhard::new(*params)),
        ToneMapSettings::Mertens(_) => {
            return Err(HdrErrors::InvalidParameter(
                "mertens",
                "exposure fusion blends the source exposures and cannot tonemap a radiance map"
                    .to_string()
            ))
        }
    };
    Ok(operation)
}

/// Tonemap `image` with the operator described by `settings`
///
/// # Errors
/// See [`operation_for`]
pub fn tonemap(image: &HdrImage, settings: &ToneMapSettings) -> Result<HdrImage, HdrErrors> {
    operation_for(settings)?.process(image)
}
