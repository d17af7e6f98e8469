/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use hdr_bin::engine::NativeEngine;
use hdr_bin::file_io::{read_exposure_time, read_ldr_image};
use hdr_core::pipeline::{drago, HdrRequest};
use hdr_core::tonemap::DragoParams;

use crate::{hash, scratch_dir, write_jpeg_with_exposure};

/// Exposure times as rationals, matching the gains of each image
const EXPOSURES: [(f32, (u32, u32)); 3] = [(0.6, (3, 5)), (1.0, (1, 1)), (1.3, (13, 10))];

fn write_jpeg_stack(name: &str) -> Vec<PathBuf> {
    let dir = scratch_dir(name);

    EXPOSURES
        .iter()
        .enumerate()
        .map(|(i, (gain, exposure))| {
            let path = dir.join(format!("exposure_{i}.jpg"));
            write_jpeg_with_exposure(&path, *gain, *exposure);
            path
        })
        .collect()
}

#[test]
fn exposure_times_come_from_exif() {
    let images = write_jpeg_stack("exif-times");

    for (path, (gain, _)) in images.iter().zip(EXPOSURES) {
        assert_eq!(read_exposure_time(path).unwrap(), gain, "{path:?}");
    }
}

#[test]
fn drago_runs_without_an_exposure_list() {
    let images = write_jpeg_stack("exif-drago");
    let dir = images[0].parent().unwrap().to_path_buf();

    let from_exif = HdrRequest::new(images.clone()).set_output(Some(dir.join("exif.png")));
    let written = drago(&NativeEngine::new(), &from_exif, DragoParams::default()).unwrap();

    let result = read_ldr_image(&written).unwrap();
    let pixels = result.pixels();
    let min = pixels.iter().min().copied().unwrap_or(0);
    let max = pixels.iter().max().copied().unwrap_or(0);
    assert!(max - min >= 32, "output range {min}..{max} is too flat");

    // the same times given on the command line give the same image
    let from_list = HdrRequest::new(images)
        .set_exposures(Some("0.6,1,1.3".to_string()))
        .set_output(Some(dir.join("list.png")));
    let listed = drago(&NativeEngine::new(), &from_list, DragoParams::default()).unwrap();

    assert_eq!(hash(&written), hash(&listed));
}
