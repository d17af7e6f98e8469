/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::read;
use std::path::{Path, PathBuf};

use hdr_bin::engine::NativeEngine;
use hdr_bin::file_io::read_ldr_image;
use hdr_core::algorithm::MergeAlgorithm;
use hdr_core::pipeline::{run, HdrRequest};
use hdr_core::tonemap::ToneMapSettings;

use crate::{exposure_list, hash, scratch_dir, write_stack, OperatorCase};

fn cases() -> Vec<OperatorCase> {
    let file = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/operators.json");
    serde_json::from_slice(&read(file).unwrap()).unwrap()
}

fn run_case(case: &OperatorCase, images: &[PathBuf], output: PathBuf) -> PathBuf {
    let fields: Vec<(&str, f32)> = case.fields.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    let settings = ToneMapSettings::from_fields(&case.command, &fields).unwrap();

    let algorithm = case
        .algorithm
        .as_deref()
        .map_or(MergeAlgorithm::default(), |x| x.parse().unwrap());

    let request = HdrRequest::new(images.to_vec())
        .set_output(Some(output))
        .set_exposures(Some(exposure_list()))
        .set_algorithm(algorithm);

    run(&NativeEngine::new(), &request, &settings).unwrap()
}

#[test]
fn test_operators() {
    let mut failures = Vec::new();

    for (i, case) in cases().iter().enumerate() {
        let dir = scratch_dir(&format!("operator-{i}-{}", case.command));
        let images = write_stack(&dir, None);

        let written = run_case(case, &images, dir.join("result.png"));
        let result = read_ldr_image(&written).unwrap();

        let pixels = result.pixels();
        let min = pixels.iter().min().copied().unwrap_or(0);
        let max = pixels.iter().max().copied().unwrap_or(0);

        // alignment of a still stack must not crop
        if result.dimensions() != (96, 80) {
            failures.push(format!("{case:?}: dimensions {:?}", result.dimensions()));
        }
        // the scene has structure, a flat output means the operator lost it
        if max - min < 32 {
            failures.push(format!("{case:?}: output range {min}..{max} is too flat"));
        }
    }
    if !failures.is_empty() {
        panic!("Errors found while running operators\n {:#?}", failures);
    }
}

#[test]
fn operators_are_deterministic() {
    let case = &cases()[2];
    let dir = scratch_dir("deterministic");
    let images = write_stack(&dir, None);

    let first = run_case(case, &images, dir.join("first.png"));
    let second = run_case(case, &images, dir.join("second.png"));

    assert_eq!(hash(&first), hash(&second));
}

#[test]
fn operator_names_parse() {
    for case in cases() {
        assert!(
            case.command.parse::<hdr_core::tonemap::ToneMapOperator>().is_ok(),
            "{}",
            case.command
        );
    }
}
