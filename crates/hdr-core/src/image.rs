/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! In-memory rasters passed between pipeline stages
//!
//! All rasters are three channel RGB, interleaved, row major.
use crate::errors::HdrErrors;

/// Number of interleaved components per pixel
pub const CHANNELS: usize = 3;

/// A three channel interleaved raster
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<T> {
    width:  usize,
    height: usize,
    pixels: Vec<T>
}

/// Decoded 8-bit camera frame
pub type LdrImage = Raster<u8>;

/// Floating point image, used for radiance maps and tonemapped output
pub type HdrImage = Raster<f32>;

impl<T: Copy> Raster<T> {
    /// Create a raster from interleaved RGB pixels
    ///
    /// # Errors
    /// If `pixels.len()` is not `width * height * 3`
    pub fn new(pixels: Vec<T>, width: usize, height: usize) -> Result<Raster<T>, HdrErrors> {
        let expected = width * height * CHANNELS;

        if pixels.len() != expected {
            let reason = format!(
                "Raster of {width}x{height} expects {expected} components but got {}",
                pixels.len()
            );
            return Err(reason.into());
        }
        Ok(Raster {
            width,
            height,
            pixels
        })
    }

    /// Create a raster with every component set to `value`
    pub fn fill(value: T, width: usize, height: usize) -> Raster<T> {
        Raster {
            width,
            height,
            pixels: vec![value; width * height * CHANNELS]
        }
    }

    /// Create a raster by calling `func(x, y, channel)` for each component
    pub fn from_fn<F>(width: usize, height: usize, mut func: F) -> Raster<T>
    where
        F: FnMut(usize, usize, usize) -> T
    {
        let mut pixels = Vec::with_capacity(width * height * CHANNELS);

        for y in 0..height {
            for x in 0..width {
                for c in 0..CHANNELS {
                    pixels.push(func(x, y, c));
                }
            }
        }
        Raster {
            width,
            height,
            pixels
        }
    }

    /// Return `(width, height)`
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Interleaved pixel components
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    /// Apply `func` to every component, producing a raster of the same size
    pub fn map<U, F>(&self, func: F) -> Raster<U>
    where
        F: FnMut(T) -> U
    {
        Raster {
            width:  self.width,
            height: self.height,
            pixels: self.pixels.iter().copied().map(func).collect()
        }
    }

    /// Return the component at `(x, y, channel)`
    pub fn get(&self, x: usize, y: usize, channel: usize) -> T {
        self.pixels[(y * self.width + x) * CHANNELS + channel]
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::HdrErrors;
    use crate::image::{HdrImage, LdrImage, CHANNELS};

    #[test]
    fn new_rejects_wrong_length() {
        let result = LdrImage::new(vec![0; 10], 2, 2);
        assert!(matches!(result, Err(HdrErrors::GenericString(_))));
        assert!(LdrImage::new(vec![0; 2 * 2 * CHANNELS], 2, 2).is_ok());
    }

    #[test]
    fn from_fn_is_row_major_interleaved() {
        let image = HdrImage::from_fn(3, 2, |x, y, c| (y * 100 + x * 10 + c) as f32);

        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get(2, 1, 1), 121.0);
        assert_eq!(image.pixels()[CHANNELS], 10.0);
    }
}
