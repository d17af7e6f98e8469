/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Median threshold bitmap alignment
//!
//! Handheld exposure stacks are rarely pixel aligned. Every image is turned
//! into a bitmap thresholded at its median gray value, which is mostly
//! independent of exposure, and the shift that minimises the number of
//! differing bits is searched coarse to fine over an image pyramid.
//!
//! Only integer translations are recovered.
//!
//! Reference: G. Ward, "Fast, Robust Image Registration for Compositing
//! High Dynamic Range Photographs from Handheld Exposures", 2003
use hdr_core::errors::HdrErrors;
use hdr_core::image::LdrImage;
use log::{debug, trace};

use crate::utils::luminance_u8;

/// Offsets tried around the current estimate at each level, the
/// estimate itself first so that ties keep it
const CANDIDATES: [(isize, isize); 9] = [
    (0, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1)
];

/// An integer translation, positive values move content right and down
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Shift {
    pub x: isize,
    pub y: isize
}

impl Shift {
    pub const fn new(x: isize, y: isize) -> Shift {
        Shift { x, y }
    }
}

/// A single channel 8-bit image used while searching shifts
#[derive(Clone)]
struct GrayImage {
    width:  usize,
    height: usize,
    pixels: Vec<u8>
}

impl GrayImage {
    /// Nearest neighbour downscale by two
    fn half(&self) -> GrayImage {
        let width = self.width / 2;
        let height = self.height / 2;
        let mut pixels = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                pixels.push(self.pixels[(2 * y) * self.width + 2 * x]);
            }
        }
        GrayImage {
            width,
            height,
            pixels
        }
    }
}

/// Median threshold bitmap aligner
///
/// # Example
/// ```
/// use hdr_core::image::LdrImage;
/// use hdr_imageprocs::align::AlignMtb;
///
/// let mut images = vec![LdrImage::fill(20, 64, 64), LdrImage::fill(200, 64, 64)];
/// AlignMtb::new().process(&mut images).unwrap();
/// ```
#[derive(Copy, Clone, Debug)]
pub struct AlignMtb {
    max_bits:      usize,
    exclude_range: u8,
    cut:           bool
}

impl Default for AlignMtb {
    fn default() -> Self {
        AlignMtb {
            max_bits:      6,
            exclude_range: 4,
            cut:           true
        }
    }
}

impl AlignMtb {
    #[must_use]
    pub fn new() -> AlignMtb {
        AlignMtb::default()
    }

    /// Set the pyramid depth, the largest shift found is `2^max_bits - 1`
    #[must_use]
    pub fn set_max_bits(mut self, max_bits: usize) -> Self {
        self.max_bits = max_bits.max(1);
        self
    }

    /// Pixels within this range of the median are ignored when comparing
    #[must_use]
    pub fn set_exclude_range(mut self, exclude_range: u8) -> Self {
        self.exclude_range = exclude_range;
        self
    }

    /// Crop all images to the region every shifted image covers
    #[must_use]
    pub fn set_cut(mut self, cut: bool) -> Self {
        self.cut = cut;
        self
    }

    pub const fn name(&self) -> &'static str {
        "align mtb"
    }

    /// Align `images` in place against the middle image
    ///
    /// Returns the shift applied to each image.
    ///
    /// # Errors
    /// If images have different dimensions, or when cutting leaves no
    /// region shared by every image
    pub fn process(&self, images: &mut [LdrImage]) -> Result<Vec<Shift>, HdrErrors> {
        if images.len() < 2 {
            return Ok(vec![Shift::default(); images.len()]);
        }
        let dimensions = images[0].dimensions();

        if images.iter().any(|x| x.dimensions() != dimensions) {
            return Err("All images must have the same dimensions to be aligned".into());
        }
        let pivot = images.len() / 2;
        let base = to_gray(&images[pivot]);

        let mut shifts = Vec::with_capacity(images.len());

        for (i, image) in images.iter_mut().enumerate() {
            if i == pivot {
                shifts.push(Shift::default());
                continue;
            }
            let shift = self.calculate_shift(&base, &to_gray(image));
            debug!("Image {i} shifted by ({}, {})", shift.x, shift.y);

            *image = shift_image(image, shift);
            shifts.push(shift);
        }

        if self.cut {
            crop_to_common(images, &shifts)?;
        }
        Ok(shifts)
    }

    /// Find the shift that moves `img` onto `base`
    fn calculate_shift(&self, base: &GrayImage, img: &GrayImage) -> Shift {
        let min_dim = base.width.min(base.height);
        // the coarsest level keeps at least 8 pixels on its short side
        let max_level = if min_dim == 0 {
            0
        } else {
            (self.max_bits - 1).min(min_dim.ilog2().saturating_sub(3) as usize)
        };

        let base_pyr = build_pyramid(base, max_level);
        let img_pyr = build_pyramid(img, max_level);

        let mut shift = Shift::default();

        for level in (0..=max_level).rev() {
            shift = Shift::new(shift.x * 2, shift.y * 2);

            let (tb1, eb1) = compute_bitmaps(&base_pyr[level], self.exclude_range);
            let (tb2, eb2) = compute_bitmaps(&img_pyr[level], self.exclude_range);

            let (width, height) = (base_pyr[level].width, base_pyr[level].height);

            let mut min_err = width * height;
            let mut new_shift = shift;

            for (dx, dy) in CANDIDATES {
                let test_shift = Shift::new(shift.x + dx, shift.y + dy);

                if test_shift.x.unsigned_abs() >= width || test_shift.y.unsigned_abs() >= height {
                    continue;
                }
                let err = bitmap_error(&tb1, &eb1, &tb2, &eb2, width, height, test_shift);

                if err < min_err {
                    new_shift = test_shift;
                    min_err = err;
                }
            }
            trace!("Level {level}: shift ({}, {}), error {min_err}", new_shift.x, new_shift.y);
            shift = new_shift;
        }
        shift
    }
}

fn to_gray(image: &LdrImage) -> GrayImage {
    let (width, height) = image.dimensions();

    GrayImage {
        width,
        height,
        pixels: luminance_u8(image)
    }
}

fn build_pyramid(img: &GrayImage, max_level: usize) -> Vec<GrayImage> {
    let mut pyramid = Vec::with_capacity(max_level + 1);
    pyramid.push(img.clone());

    for level in 0..max_level {
        let next = pyramid[level].half();
        pyramid.push(next);
    }
    pyramid
}

#[must_use]
pub fn histogram(data: &[u8]) -> [u32; 256] {
    let mut counts = [0_u32; 256];

    for value in data {
        counts[usize::from(*value)] += 1;
    }
    counts
}

/// Smallest gray level at which at least half the pixels have been counted
fn median(pixels: &[u8]) -> u8 {
    let histogram = histogram(pixels);
    let threshold = (pixels.len() / 2) as u32;

    let mut median = 0_usize;
    let mut sum = 0_u32;

    while sum < threshold && median < 256 {
        sum += histogram[median];
        median += 1;
    }
    median.min(255) as u8
}

/// Threshold bitmap and exclusion bitmap
fn compute_bitmaps(img: &GrayImage, exclude_range: u8) -> (Vec<bool>, Vec<bool>) {
    let median = median(&img.pixels);

    let tb = img.pixels.iter().map(|v| *v > median).collect();
    let eb = img
        .pixels
        .iter()
        .map(|v| v.abs_diff(median) > exclude_range)
        .collect();

    (tb, eb)
}

/// Count the bits that differ between the two bitmaps after shifting the second
///
/// Bits shifted in from outside the image are zero.
fn bitmap_error(
    tb1: &[bool], eb1: &[bool], tb2: &[bool], eb2: &[bool], width: usize, height: usize,
    shift: Shift
) -> usize {
    let mut err = 0;

    for y in 0..height {
        let sy = y as isize - shift.y;

        for x in 0..width {
            let sx = x as isize - shift.x;

            let (t2, e2) = if sx < 0 || sy < 0 || sx >= width as isize || sy >= height as isize {
                (false, false)
            } else {
                let pos = sy as usize * width + sx as usize;
                (tb2[pos], eb2[pos])
            };
            let pos = y * width + x;

            if (tb1[pos] ^ t2) && eb1[pos] && e2 {
                err += 1;
            }
        }
    }
    err
}

/// Translate an image by `shift`, uncovered pixels are black
#[must_use]
pub fn shift_image(image: &LdrImage, shift: Shift) -> LdrImage {
    let (width, height) = image.dimensions();

    LdrImage::from_fn(width, height, |x, y, c| {
        let sx = x as isize - shift.x;
        let sy = y as isize - shift.y;

        if sx < 0 || sy < 0 || sx >= width as isize || sy >= height as isize {
            0
        } else {
            image.get(sx as usize, sy as usize, c)
        }
    })
}

/// Crop every image to the area covered by all shifted images
fn crop_to_common(images: &mut [LdrImage], shifts: &[Shift]) -> Result<(), HdrErrors> {
    let max_x = shifts.iter().map(|s| s.x).max().unwrap_or(0).max(0);
    let max_y = shifts.iter().map(|s| s.y).max().unwrap_or(0).max(0);
    let min_x = shifts.iter().map(|s| s.x).min().unwrap_or(0).min(0);
    let min_y = shifts.iter().map(|s| s.y).min().unwrap_or(0).min(0);

    if max_x == 0 && max_y == 0 && min_x == 0 && min_y == 0 {
        return Ok(());
    }
    let (width, height) = images[0].dimensions();

    let new_width = width as isize + min_x - max_x;
    let new_height = height as isize + min_y - max_y;

    if new_width <= 0 || new_height <= 0 {
        let reason = format!(
            "Images do not overlap after alignment, shifts span {}x{} pixels",
            max_x - min_x,
            max_y - min_y
        );
        return Err(reason.into());
    }
    let (x0, y0) = (max_x as usize, max_y as usize);

    debug!("Cropping aligned images to {new_width}x{new_height} at ({x0}, {y0})");

    for image in images.iter_mut() {
        *image = LdrImage::from_fn(new_width as usize, new_height as usize, |x, y, c| {
            image.get(x + x0, y + y0, c)
        });
    }
    Ok(())
}
