/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use hdr_core::errors::HdrErrors;
use log::{debug, warn};

use crate::file_io::{read_exposure_time, read_ldr_image};
use crate::serde::ProbeInfo;

/// Gather what `probe` reports about `path`
pub fn probe_file(path: &Path) -> Result<ProbeInfo, HdrErrors> {
    let image = read_ldr_image(path)?;

    let size = std::fs::metadata(path)
        .map_err(|e| HdrErrors::ImageLoadError(path.to_path_buf(), e.to_string()))?
        .len();

    let exposure = match read_exposure_time(path) {
        Ok(exposure) => Some(exposure),
        Err(err) => {
            debug!("{err}");
            None
        }
    };
    Ok(ProbeInfo::new(path.to_path_buf(), image.dimensions(), size, exposure))
}

/// Probe input files, extract metadata, and print to standard output.
///
/// Files that cannot be read are reported as warnings and skipped.
pub fn probe_input_files(args: &ArgMatches) -> Result<(), HdrErrors> {
    let Some(images) = args.get_many::<PathBuf>("images") else {
        return Ok(());
    };

    for path in images {
        match probe_file(path) {
            Ok(info) => {
                let json = serde_json::to_string_pretty(&info)
                    .map_err(|e| HdrErrors::GenericString(e.to_string()))?;
                println!("{json}");
            }
            Err(err) => warn!("Skipping {:?}: {}", path, format!("{err}").trim_end())
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use hdr_core::image::LdrImage;

    use crate::file_io::write_ldr_image;
    use crate::probe_files::probe_file;

    #[test]
    fn probes_dimensions_and_size() {
        let dir = std::env::temp_dir().join("hdr-bin-probe");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("probe.ppm");

        write_ldr_image(&LdrImage::fill(90, 5, 4), &path).unwrap();

        let info = serde_json::to_value(probe_file(&path).unwrap()).unwrap();

        assert_eq!(info["width"], 5);
        assert_eq!(info["height"], 4);
        assert_eq!(info["file_size"], fs::metadata(&path).unwrap().len());
        assert!(info["exposure_time"].is_null());
    }

    #[test]
    fn unreadable_files_are_errors() {
        let path = std::env::temp_dir().join("hdr-bin-probe").join("absent.jpg");
        assert!(probe_file(&path).is_err());
    }
}
