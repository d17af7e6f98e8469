/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use hdr_bin::engine::NativeEngine;
use hdr_bin::file_io::read_ldr_image;
use hdr_core::pipeline::{load_and_align, reinhard, HdrRequest};
use hdr_core::tonemap::ReinhardParams;
use hdr_imageprocs::align::AlignMtb;

use crate::{exposure_list, scratch_dir, write_exposures, write_stack};

const OFFSETS: [(isize, isize); 3] = [(3, -2), (0, 0), (0, 0)];

#[test]
fn shifted_frames_are_cropped_to_shared_region() {
    let dir = scratch_dir("shifted-stack");
    let images = write_stack(&dir, Some(&OFFSETS));

    let request = HdrRequest::new(images)
        .set_exposures(Some(exposure_list()))
        .set_output(Some(dir.join("result.png")));
    let written = reinhard(&NativeEngine::new(), &request, ReinhardParams::default()).unwrap();

    assert_eq!(read_ldr_image(&written).unwrap().dimensions(), (93, 78));
}

#[test]
fn still_stack_keeps_its_size() {
    let dir = scratch_dir("still-stack");
    let images = write_exposures(&dir, &[0.3, 1.0, 2.5], None);

    let aligned = load_and_align(&NativeEngine::new(), &images).unwrap();
    assert!(aligned.iter().all(|x| x.dimensions() == (96, 80)));

    let request = HdrRequest::new(images)
        .set_exposures(Some("0.3,1,2.5".to_string()))
        .set_output(Some(dir.join("result.png")));
    let written = reinhard(&NativeEngine::new(), &request, ReinhardParams::default()).unwrap();

    assert_eq!(read_ldr_image(&written).unwrap().dimensions(), (96, 80));
}

#[test]
fn aligned_frames_match_the_reference() {
    let dir = scratch_dir("aligned-frames");
    let images = write_stack(&dir, Some(&OFFSETS));

    let engine = NativeEngine::new().set_align(AlignMtb::new().set_cut(false));
    let aligned = load_and_align(&engine, &images).unwrap();

    assert!(aligned.iter().all(|x| x.dimensions() == (96, 80)));

    // away from the black border, the moved frame now lines up with the reference
    let moved = &aligned[0];
    let reference = &aligned[1];
    let mut mismatched = 0;

    for y in 4..76 {
        for x in 4..90 {
            let a = f32::from(moved.get(x, y, 1)) / 0.6;
            let b = f32::from(reference.get(x, y, 1));
            if (a - b).abs() > 3.0 {
                mismatched += 1;
            }
        }
    }
    assert_eq!(mismatched, 0);
}
