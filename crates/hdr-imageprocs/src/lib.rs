/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Numerical routines for building HDR images
//!
//! This implements the pixel work behind the hdr pipeline
//!
//! - Median threshold bitmap alignment, see [`align`]
//! - Camera response calibration and radiance merging, see [`debevec`], [`robertson`] and [`merge`]
//! - Tonemapping operators, see [`tonemap`]
//! - Exposure fusion, see [`mertens`]
//!
//! Every tonemap operator implements [`ToneMapOperation`](traits::ToneMapOperation)
//!
//! # Example
//! - Compress a radiance map with the Drago operator
//! ```
//! use hdr_core::image::HdrImage;
//! use hdr_core::tonemap::DragoParams;
//! use hdr_imageprocs::drago::Drago;
//! use hdr_imageprocs::traits::ToneMapOperation;
//!
//! let radiance = HdrImage::from_fn(16, 16, |x, y, _| (x * y) as f32 + 0.5);
//! let drago = Drago::new(DragoParams::default());
//! let mapped = drago.process(&radiance).unwrap();
//!
//! assert_eq!(mapped.dimensions(), (16, 16));
//! ```
#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]

pub mod align;
pub mod bilateral_filter;
pub mod debevec;
pub mod drago;
pub mod durand;
pub mod gamma;
pub mod mantiuk;
pub mod merge;
pub mod mertens;
pub mod plane;
pub mod pyramid;
pub mod reinhard;
pub mod response;
pub mod robertson;
pub mod tonemap;
pub mod traits;
pub mod utils;
