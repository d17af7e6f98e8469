/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Single channel floating point planes
//!
//! Most operators work on luminance or on one channel at a time, this is
//! the storage they share.
use hdr_core::image::{HdrImage, CHANNELS};

/// A single channel `f32` image, row major
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    width:  usize,
    height: usize,
    data:   Vec<f32>
}

impl Plane {
    /// Create a plane with every value set to zero
    pub fn new(width: usize, height: usize) -> Plane {
        Plane::fill(0.0, width, height)
    }

    pub fn fill(value: f32, width: usize, height: usize) -> Plane {
        Plane {
            width,
            height,
            data: vec![value; width * height]
        }
    }

    /// Wrap existing row major data
    ///
    /// `data.len()` must be `width * height`
    pub fn from_vec(data: Vec<f32>, width: usize, height: usize) -> Plane {
        debug_assert_eq!(data.len(), width * height);
        Plane {
            width,
            height,
            data
        }
    }

    pub fn from_fn<F>(width: usize, height: usize, mut func: F) -> Plane
    where
        F: FnMut(usize, usize) -> f32
    {
        let mut data = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                data.push(func(x, y));
            }
        }
        Plane {
            width,
            height,
            data
        }
    }

    /// Extract one channel of an interleaved image
    pub fn from_channel(image: &HdrImage, channel: usize) -> Plane {
        let (width, height) = image.dimensions();
        let data = image
            .pixels()
            .iter()
            .skip(channel)
            .step_by(CHANNELS)
            .copied()
            .collect();

        Plane {
            width,
            height,
            data
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    /// Apply `func` to every value
    #[must_use]
    pub fn map<F: FnMut(f32) -> f32>(&self, func: F) -> Plane {
        Plane {
            width:  self.width,
            height: self.height,
            data:   self.data.iter().copied().map(func).collect()
        }
    }

    /// Combine two planes of equal size value by value
    #[must_use]
    pub fn zip_map<F: FnMut(f32, f32) -> f32>(&self, other: &Plane, mut func: F) -> Plane {
        debug_assert_eq!(self.dimensions(), other.dimensions());

        Plane {
            width:  self.width,
            height: self.height,
            data:   self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| func(*a, *b))
                .collect()
        }
    }

    /// Add `other` to this plane in place
    pub fn add_assign(&mut self, other: &Plane) {
        debug_assert_eq!(self.dimensions(), other.dimensions());

        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += *b;
        }
    }

    /// Sum of products of two equally sized planes, accumulated in f64
    pub fn dot(&self, other: &Plane) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| f64::from(*a) * f64::from(*b))
            .sum()
    }

    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|x| f64::from(*x)).sum();
        (sum / self.data.len() as f64) as f32
    }

    /// Minimum and maximum value, NaN values are ignored
    pub fn min_max(&self) -> (f32, f32) {
        crate::utils::min_max(&self.data)
    }

    /// Swap rows and columns
    #[must_use]
    pub fn transpose(&self) -> Plane {
        let mut out = vec![0.0; self.data.len()];

        for (y, row) in self.data.chunks_exact(self.width.max(1)).enumerate() {
            for (x, value) in row.iter().enumerate() {
                out[x * self.height + y] = *value;
            }
        }
        Plane {
            width:  self.height,
            height: self.width,
            data:   out
        }
    }

    /// Resize with bilinear interpolation
    ///
    /// Sample positions use pixel centers, so upscaling and downscaling by
    /// two lines up with the pixel grid. Samples outside the source are
    /// clamped to the border.
    #[must_use]
    pub fn resize_bilinear(&self, out_width: usize, out_height: usize) -> Plane {
        if (out_width, out_height) == self.dimensions() {
            return self.clone();
        }
        if self.width == 0 || self.height == 0 {
            return Plane::new(out_width, out_height);
        }
        let w_ratio = self.width as f32 / out_width as f32;
        let h_ratio = self.height as f32 / out_height as f32;

        let x_coords: Vec<(usize, usize, f32)> = (0..out_width)
            .map(|x| source_coordinate(x, w_ratio, self.width))
            .collect();

        let mut out = Vec::with_capacity(out_width * out_height);

        for y in 0..out_height {
            let (y0, y1, b) = source_coordinate(y, h_ratio, self.height);

            let row0 = &self.data[y0 * self.width..(y0 + 1) * self.width];
            let row1 = &self.data[y1 * self.width..(y1 + 1) * self.width];

            for &(x0, x1, a) in &x_coords {
                let top = row0[x0] * (1.0 - a) + row0[x1] * a;
                let bottom = row1[x0] * (1.0 - a) + row1[x1] * a;

                out.push(top * (1.0 - b) + bottom * b);
            }
        }
        Plane {
            width:  out_width,
            height: out_height,
            data:   out
        }
    }
}

/// Map a destination index to the two source indices and the weight of the second
#[inline]
fn source_coordinate(index: usize, ratio: f32, len: usize) -> (usize, usize, f32) {
    let position = (index as f32 + 0.5) * ratio - 0.5;

    if position <= 0.0 {
        return (0, 0, 0.0);
    }
    let first = position.floor() as usize;

    if first >= len - 1 {
        return (len - 1, len - 1, 0.0);
    }
    (first, first + 1, position - first as f32)
}
