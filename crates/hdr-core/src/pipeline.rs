/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pipeline orchestration
//!
//! Every operator runs the same single-shot sequence of stages
//!
//! ```text
//! validate -> resolve exposures -> load + align -> merge -> tonemap -> scale + write
//! ```
//!
//! except exposure fusion, which replaces merge + tonemap with a fusion
//! blend followed by a gamma tonemap and never needs exposure times.
//!
//! Any failing stage aborts the run, nothing is written unless every
//! stage before the write succeeded.
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::algorithm::MergeAlgorithm;
use crate::engine::RadianceEngine;
use crate::errors::HdrErrors;
use crate::exposure::{parse_exposures, resolve_exposures};
use crate::image::{HdrImage, LdrImage};
use crate::output::{default_output_path, to_ldr};
use crate::tonemap::{
    DragoParams, DurandParams, GammaParams, MantiukParams, MertensParams, ReinhardParams,
    ToneMapSettings
};

/// Inputs of a pipeline run that do not depend on the tonemap operator
#[derive(Clone, Debug, Default)]
pub struct HdrRequest {
    images:    Vec<PathBuf>,
    output:    Option<PathBuf>,
    exposures: Option<String>,
    algorithm: MergeAlgorithm
}

impl HdrRequest {
    /// Create a request for the given images, order is significant
    pub fn new(images: Vec<PathBuf>) -> HdrRequest {
        HdrRequest {
            images,
            ..Default::default()
        }
    }

    /// Write to `output` instead of the derived default name
    #[must_use]
    pub fn set_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// Use a comma separated exposure list instead of image metadata
    #[must_use]
    pub fn set_exposures(mut self, exposures: Option<String>) -> Self {
        self.exposures = exposures;
        self
    }

    #[must_use]
    pub fn set_algorithm(mut self, algorithm: MergeAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn exposures(&self) -> Option<&str> {
        self.exposures.as_deref()
    }

    pub const fn algorithm(&self) -> MergeAlgorithm {
        self.algorithm
    }

    /// The path the run writes to, either explicit or derived
    ///
    /// # Errors
    /// [`HdrErrors::NotEnoughImages`] if fewer than two images are present
    pub fn output_path(&self) -> Result<PathBuf, HdrErrors> {
        if self.images.len() < 2 {
            return Err(HdrErrors::NotEnoughImages(self.images.len()));
        }
        match &self.output {
            Some(output) => Ok(output.clone()),
            None => default_output_path(&self.images)
        }
    }
}

/// Merge and apply a plain gamma tonemap
pub fn create<E: RadianceEngine + ?Sized>(
    engine: &E, request: &HdrRequest, params: GammaParams
) -> Result<PathBuf, HdrErrors> {
    run(engine, request, &ToneMapSettings::Gamma(params))
}

/// Merge and apply the Drago tonemap
pub fn drago<E: RadianceEngine + ?Sized>(
    engine: &E, request: &HdrRequest, params: DragoParams
) -> Result<PathBuf, HdrErrors> {
    run(engine, request, &ToneMapSettings::Drago(params))
}

/// Merge and apply the Durand tonemap
pub fn durand<E: RadianceEngine + ?Sized>(
    engine: &E, request: &HdrRequest, params: DurandParams
) -> Result<PathBuf, HdrErrors> {
    run(engine, request, &ToneMapSettings::Durand(params))
}

/// Merge and apply the Mantiuk tonemap
pub fn mantiuk<E: RadianceEngine + ?Sized>(
    engine: &E, request: &HdrRequest, params: MantiukParams
) -> Result<PathBuf, HdrErrors> {
    run(engine, request, &ToneMapSettings::Mantiuk(params))
}

/// Fuse the exposures directly, no radiance map is built
pub fn mertens<E: RadianceEngine + ?Sized>(
    engine: &E, request: &HdrRequest, params: MertensParams
) -> Result<PathBuf, HdrErrors> {
    run(engine, request, &ToneMapSettings::Mertens(params))
}

/// Merge and apply the Reinhard tonemap
pub fn reinhard<E: RadianceEngine + ?Sized>(
    engine: &E, request: &HdrRequest, params: ReinhardParams
) -> Result<PathBuf, HdrErrors> {
    run(engine, request, &ToneMapSettings::Reinhard(params))
}

/// Run the whole pipeline for `settings` and return the written path
///
/// # Errors
/// The first error raised by any stage, later stages do not run
pub fn run<E: RadianceEngine + ?Sized>(
    engine: &E, request: &HdrRequest, settings: &ToneMapSettings
) -> Result<PathBuf, HdrErrors> {
    let output = request.output_path()?;

    info!(
        "Creating {} image from {} exposures",
        settings.name(),
        request.images().len()
    );

    let tonemapped = match settings {
        ToneMapSettings::Mertens(params) => fuse_and_tonemap(engine, request, params)?,
        _ => merge_and_tonemap(engine, request, settings)?
    };

    write_output(engine, &tonemapped, &output)?;

    Ok(output)
}

fn merge_and_tonemap<E: RadianceEngine + ?Sized>(
    engine: &E, request: &HdrRequest, settings: &ToneMapSettings
) -> Result<HdrImage, HdrErrors> {
    let exposures = resolve_exposures(engine, request.exposures(), request.images())?;
    debug!("Exposures: {:?}", exposures);

    let images = load_and_align(engine, request.images())?;

    info!("Merging exposures with {}", request.algorithm());
    let radiance = engine.merge(&images, &exposures, request.algorithm())?;
    drop(images);

    info!("Tonemapping with {}", settings.name());
    engine.tonemap(&radiance, settings)
}

fn fuse_and_tonemap<E: RadianceEngine + ?Sized>(
    engine: &E, request: &HdrRequest, params: &MertensParams
) -> Result<HdrImage, HdrErrors> {
    // fusion does not use exposure times, but a bad list is still an error
    if let Some(list) = request.exposures() {
        parse_exposures(list, request.images().len())?;
    }
    if request.algorithm() != MergeAlgorithm::default() {
        debug!(
            "Ignoring merge algorithm {}, exposure fusion does not merge radiance",
            request.algorithm()
        );
    }

    let images = load_and_align(engine, request.images())?;

    info!("Fusing exposures");
    let fused = engine.fuse(&images, params)?;
    drop(images);

    engine.tonemap(&fused, &ToneMapSettings::Gamma(GammaParams { gamma: params.gamma }))
}

/// Read every image in order and align the batch
///
/// # Errors
/// [`HdrErrors::ImageLoadError`] for the first unreadable image or one
/// whose dimensions differ from the first image
pub fn load_and_align<E: RadianceEngine + ?Sized>(
    engine: &E, paths: &[PathBuf]
) -> Result<Vec<LdrImage>, HdrErrors> {
    let mut images: Vec<LdrImage> = Vec::with_capacity(paths.len());

    for path in paths {
        debug!("Reading {:?}", path);
        let image = engine.read_image(path)?;

        if let Some(first) = images.first() {
            if first.dimensions() != image.dimensions() {
                let (w, h) = image.dimensions();
                let (fw, fh) = first.dimensions();

                return Err(HdrErrors::ImageLoadError(
                    path.clone(),
                    format!("dimensions {w}x{h} differ from the first image's {fw}x{fh}")
                ));
            }
        }
        images.push(image);
    }

    info!("Aligning {} images", images.len());
    engine.align(&mut images)?;

    Ok(images)
}

fn write_output<E: RadianceEngine + ?Sized>(
    engine: &E, image: &HdrImage, output: &Path
) -> Result<(), HdrErrors> {
    let ldr = to_ldr(image);

    info!("Writing {:?}", output);
    engine.write_image(&ldr, output)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use crate::algorithm::MergeAlgorithm;
    use crate::engine::RadianceEngine;
    use crate::errors::HdrErrors;
    use crate::image::{HdrImage, LdrImage};
    use crate::pipeline::{create, drago, mertens, reinhard, HdrRequest};
    use crate::tonemap::{
        DragoParams, GammaParams, MertensParams, ReinhardParams, ToneMapSettings
    };

    /// Engine returning fixed fixtures and recording every call
    struct FakeEngine {
        calls:          RefCell<Vec<String>>,
        written:        RefCell<Vec<(PathBuf, LdrImage)>>,
        exposures:      HashMap<PathBuf, f32>,
        unreadable:     Option<PathBuf>,
        small:          Option<PathBuf>,
        tonemap_values: Vec<f32>
    }

    impl FakeEngine {
        fn new(names: &[&str]) -> FakeEngine {
            let exposures = names
                .iter()
                .enumerate()
                .map(|(i, n)| (PathBuf::from(n), 0.25 * (i + 1) as f32))
                .collect();

            FakeEngine {
                calls: RefCell::new(Vec::new()),
                written: RefCell::new(Vec::new()),
                exposures,
                unreadable: None,
                small: None,
                tonemap_values: vec![0.5]
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn called(&self, prefix: &str) -> bool {
            self.calls.borrow().iter().any(|c| c.starts_with(prefix))
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl RadianceEngine for FakeEngine {
        fn read_image(&self, path: &Path) -> Result<LdrImage, HdrErrors> {
            self.record(format!("read {}", path.display()));

            if self.unreadable.as_deref() == Some(path) {
                return Err(HdrErrors::ImageLoadError(path.to_path_buf(), "corrupt".into()));
            }
            if self.small.as_deref() == Some(path) {
                return Ok(LdrImage::fill(10, 2, 2));
            }
            Ok(LdrImage::fill(100, 4, 3))
        }

        fn exposure_time(&self, path: &Path) -> Result<f32, HdrErrors> {
            self.record(format!("exposure {}", path.display()));

            self.exposures
                .get(path)
                .copied()
                .ok_or_else(|| HdrErrors::MissingExposureMetadata(path.to_path_buf()))
        }

        fn align(&self, images: &mut [LdrImage]) -> Result<(), HdrErrors> {
            self.record(format!("align {}", images.len()));
            Ok(())
        }

        fn merge(
            &self, images: &[LdrImage], exposures: &[f32], algorithm: MergeAlgorithm
        ) -> Result<HdrImage, HdrErrors> {
            assert_eq!(images.len(), exposures.len());
            self.record(format!("merge {algorithm} {exposures:?}"));

            let (w, h) = images[0].dimensions();
            Ok(HdrImage::fill(5.0, w, h))
        }

        fn fuse(&self, images: &[LdrImage], params: &MertensParams) -> Result<HdrImage, HdrErrors> {
            self.record(format!("fuse {} {}", images.len(), params.contrast));

            let (w, h) = images[0].dimensions();
            Ok(HdrImage::fill(0.25, w, h))
        }

        fn tonemap(
            &self, image: &HdrImage, settings: &ToneMapSettings
        ) -> Result<HdrImage, HdrErrors> {
            self.record(format!("tonemap {}", settings.name()));

            let values = &self.tonemap_values;
            let mut index = 0;

            Ok(image.map(|_| {
                let value = values[index % values.len()];
                index += 1;
                value
            }))
        }

        fn write_image(&self, image: &LdrImage, path: &Path) -> Result<(), HdrErrors> {
            self.record(format!("write {}", path.display()));
            self.written
                .borrow_mut()
                .push((path.to_path_buf(), image.clone()));
            Ok(())
        }
    }

    fn request(names: &[&str]) -> HdrRequest {
        HdrRequest::new(names.iter().map(PathBuf::from).collect())
    }

    #[test]
    fn drago_writes_default_name_from_second_image() {
        let names = ["a.jpg", "b.jpg", "c.jpg"];
        let engine = FakeEngine::new(&names);

        let output = drago(&engine, &request(&names), DragoParams::default()).unwrap();

        assert_eq!(output, Path::new("b_hdr.jpg"));
        assert_eq!(
            engine.calls(),
            vec![
                "exposure a.jpg",
                "exposure b.jpg",
                "exposure c.jpg",
                "read a.jpg",
                "read b.jpg",
                "read c.jpg",
                "align 3",
                "merge debevec [0.25, 0.5, 0.75]",
                "tonemap drago",
                "write b_hdr.jpg"
            ]
        );
    }

    #[test]
    fn explicit_output_and_algorithm_are_used() {
        let names = ["a.jpg", "b.jpg"];
        let engine = FakeEngine::new(&names);
        let request = request(&names)
            .set_output(Some(PathBuf::from("out/scene.png")))
            .set_exposures(Some("0.5, 2".to_string()))
            .set_algorithm(MergeAlgorithm::Robertson);

        let output = reinhard(&engine, &request, ReinhardParams::default()).unwrap();

        assert_eq!(output, Path::new("out/scene.png"));
        assert!(engine.called("merge robertson [0.5, 2.0]"));
        // exposures came from the list, metadata is never read
        assert!(!engine.called("exposure"));
    }

    #[test]
    fn exposure_count_mismatch_stops_before_loading() {
        let names = ["a.jpg", "b.jpg", "c.jpg"];
        let engine = FakeEngine::new(&names);
        let request = request(&names).set_exposures(Some("1,2".to_string()));

        let result = create(&engine, &request, GammaParams::default());

        assert!(matches!(result, Err(HdrErrors::InvalidExposureFormat(_))));
        assert!(engine.calls().is_empty());
        assert!(engine.written.borrow().is_empty());
    }

    #[test]
    fn missing_metadata_writes_nothing() {
        let names = ["a.jpg", "b.jpg", "c.jpg"];
        let mut engine = FakeEngine::new(&names);
        engine.exposures.remove(Path::new("c.jpg"));

        let result = drago(&engine, &request(&names), DragoParams::default());

        assert!(
            matches!(result, Err(HdrErrors::MissingExposureMetadata(ref p)) if p == Path::new("c.jpg"))
        );
        assert!(!engine.called("read"));
        assert!(engine.written.borrow().is_empty());
    }

    #[test]
    fn unreadable_image_aborts_the_run() {
        let names = ["a.jpg", "b.jpg", "c.jpg"];
        let mut engine = FakeEngine::new(&names);
        engine.unreadable = Some(PathBuf::from("b.jpg"));

        let result = drago(&engine, &request(&names), DragoParams::default());

        assert!(matches!(result, Err(HdrErrors::ImageLoadError(ref p, _)) if p == Path::new("b.jpg")));
        assert!(!engine.called("read c.jpg"));
        assert!(!engine.called("merge"));
        assert!(engine.written.borrow().is_empty());
    }

    #[test]
    fn mismatched_dimensions_are_a_load_error() {
        let names = ["a.jpg", "b.jpg"];
        let mut engine = FakeEngine::new(&names);
        engine.small = Some(PathBuf::from("b.jpg"));

        let result = create(&engine, &request(&names), GammaParams::default());

        assert!(matches!(result, Err(HdrErrors::ImageLoadError(ref p, _)) if p == Path::new("b.jpg")));
        assert!(!engine.called("align"));
    }

    #[test]
    fn single_image_is_rejected_before_any_work() {
        let engine = FakeEngine::new(&["a.jpg"]);

        let result = drago(&engine, &request(&["a.jpg"]), DragoParams::default());

        assert!(matches!(result, Err(HdrErrors::NotEnoughImages(1))));
        assert!(engine.calls().is_empty());

        // an explicit output does not lift the requirement
        let request = request(&["a.jpg"]).set_output(Some(PathBuf::from("x.jpg")));
        let result = create(&engine, &request, GammaParams::default());
        assert!(matches!(result, Err(HdrErrors::NotEnoughImages(1))));
    }

    #[test]
    fn mertens_fuses_aligned_images_without_merging() {
        let names = ["a.jpg", "b.jpg", "c.jpg"];
        let mut engine = FakeEngine::new(&names);
        // fusion has no use for exposure times
        engine.exposures.clear();

        let params = MertensParams {
            contrast: 2.0,
            ..MertensParams::default()
        };
        let output = mertens(&engine, &request(&names), params).unwrap();

        assert_eq!(output, Path::new("b_hdr.jpg"));
        assert_eq!(
            engine.calls(),
            vec![
                "read a.jpg",
                "read b.jpg",
                "read c.jpg",
                "align 3",
                "fuse 3 2",
                "tonemap gamma",
                "write b_hdr.jpg"
            ]
        );
        assert!(!engine.called("merge"));
    }

    #[test]
    fn mertens_still_validates_supplied_exposures() {
        let names = ["a.jpg", "b.jpg", "c.jpg"];
        let engine = FakeEngine::new(&names);
        let request = request(&names).set_exposures(Some("1,2".to_string()));

        let result = mertens(&engine, &request, MertensParams::default());

        assert!(matches!(result, Err(HdrErrors::InvalidExposureFormat(_))));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn written_bytes_are_clamped() {
        let names = ["a.jpg", "b.jpg"];
        let mut engine = FakeEngine::new(&names);
        engine.tonemap_values = vec![1.7, -0.3, 0.5, f32::NAN];

        create(&engine, &request(&names), GammaParams::default()).unwrap();

        let written = engine.written.borrow();
        let (path, image) = &written[0];

        assert_eq!(path, Path::new("b_hdr.jpg"));
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(&image.pixels()[..4], &[255, 0, 128, 0]);
    }
}
