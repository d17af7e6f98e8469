/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// What `probe` reports about one image
pub struct ProbeInfo {
    file:          PathBuf,
    width:         usize,
    height:        usize,
    file_size:     u64,
    exposure_time: Option<f32>
}

impl ProbeInfo {
    pub fn new(
        file: PathBuf, dimensions: (usize, usize), file_size: u64, exposure_time: Option<f32>
    ) -> ProbeInfo {
        ProbeInfo {
            file,
            width: dimensions.0,
            height: dimensions.1,
            file_size,
            exposure_time
        }
    }
}

impl Serialize for ProbeInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ProbeInfo", 5)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("file_size", &self.file_size)?;
        state.serialize_field("exposure_time", &self.exposure_time)?;

        state.end()
    }
}
