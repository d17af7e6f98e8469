/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use hdr_core::errors::HdrErrors;
use hdr_core::image::HdrImage;
use log::trace;

/// A tonemap operator
///
/// Operators take a linear radiance map and return an image of the
/// same dimensions, ready to be scaled to 8 bits.
pub trait ToneMapOperation {
    /// Name of the operator, used in logs and errors
    fn name(&self) -> &'static str;

    /// Run the operator
    ///
    /// Implementations should not be called directly, use
    /// [`process`](ToneMapOperation::process), which adds logging and
    /// checks the result keeps the input dimensions.
    fn process_impl(&self, image: &HdrImage) -> Result<HdrImage, HdrErrors>;

    /// Tonemap `image`
    ///
    /// # Errors
    /// Any error raised by the operator, or [`HdrErrors::GenericString`]
    /// if the operator changed the image dimensions
    fn process(&self, image: &HdrImage) -> Result<HdrImage, HdrErrors> {
        trace!("Running tonemap operator {}", self.name());

        let result = self.process_impl(image)?;

        if result.dimensions() != image.dimensions() {
            return Err(HdrErrors::GenericString(format!(
                "Operator {} changed dimensions from {:?} to {:?}",
                self.name(),
                image.dimensions(),
                result.dimensions()
            )));
        }
        Ok(result)
    }
}
