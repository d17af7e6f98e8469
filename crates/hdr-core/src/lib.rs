/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the hdr crates
//!
//! This crate holds the types passed between stages (rasters, tonemap
//! settings, merge algorithms), the error type, exposure resolution and the
//! pipeline that strings the stages together.
//!
//! It performs no pixel processing or file IO itself, those are provided by
//! an implementation of [`RadianceEngine`](engine::RadianceEngine).
#![allow(clippy::cast_precision_loss)]

pub mod algorithm;
pub mod engine;
pub mod errors;
pub mod exposure;
pub mod image;
pub mod output;
pub mod pipeline;
pub mod tonemap;
