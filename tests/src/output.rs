/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use hdr_bin::engine::NativeEngine;
use hdr_bin::file_io::read_ldr_image;
use hdr_core::errors::HdrErrors;
use hdr_core::pipeline::{create, drago, mertens, HdrRequest};
use hdr_core::tonemap::{DragoParams, GammaParams, MertensParams};

use crate::{exposure_list, scratch_dir, write_stack};

#[test]
fn default_output_follows_the_second_image() {
    let dir = scratch_dir("default-output");
    let images = write_stack(&dir, None);

    let request = HdrRequest::new(images).set_exposures(Some(exposure_list()));
    let written = drago(&NativeEngine::new(), &request, DragoParams::default()).unwrap();

    assert_eq!(written, dir.join("exposure_1_hdr.ppm"));
    assert!(written.exists());
}

#[test]
fn missing_metadata_aborts_before_writing() {
    let dir = scratch_dir("missing-metadata");
    let images = write_stack(&dir, None);

    let request = HdrRequest::new(images.clone());
    let result = create(&NativeEngine::new(), &request, GammaParams::default());

    assert!(matches!(result, Err(HdrErrors::MissingExposureMetadata(p)) if p == images[0]));
    assert!(!dir.join("exposure_1_hdr.ppm").exists());
}

#[test]
fn fusion_needs_no_exposure_times() {
    let dir = scratch_dir("fusion-no-exposures");
    let images = write_stack(&dir, None);

    let request = HdrRequest::new(images).set_output(Some(dir.join("fused.png")));
    let written = mertens(&NativeEngine::new(), &request, MertensParams::default()).unwrap();

    assert_eq!(read_ldr_image(&written).unwrap().dimensions(), (96, 80));
}

#[test]
fn wrong_exposure_count_is_rejected() {
    let dir = scratch_dir("exposure-count");
    let images = write_stack(&dir, None);

    let request = HdrRequest::new(images).set_exposures(Some("1,2".to_string()));
    let result = drago(&NativeEngine::new(), &request, DragoParams::default());

    assert!(matches!(result, Err(HdrErrors::InvalidExposureFormat(_))));
}

#[test]
fn unknown_output_format_is_a_write_error() {
    let dir = scratch_dir("unknown-format");
    let images = write_stack(&dir, None);
    let output = dir.join("result.unknown-format");

    let request = HdrRequest::new(images)
        .set_exposures(Some(exposure_list()))
        .set_output(Some(output.clone()));
    let result = create(&NativeEngine::new(), &request, GammaParams::default());

    assert!(matches!(result, Err(HdrErrors::OutputWriteError(p, _)) if p == output));
}
