/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::HdrErrors;

/// Camera response calibration and radiance merge pair
///
/// Both variants calibrate a response curve from the exposure stack first
/// and then merge with that curve, they only differ in the numerical method.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MergeAlgorithm {
    /// Debevec & Malik, least squares response recovery
    #[default]
    Debevec,
    /// Robertson et al, iterative maximum likelihood response recovery
    Robertson
}

impl MergeAlgorithm {
    pub const fn name(self) -> &'static str {
        match self {
            MergeAlgorithm::Debevec => "debevec",
            MergeAlgorithm::Robertson => "robertson"
        }
    }

    pub const fn variants() -> &'static [MergeAlgorithm] {
        &[MergeAlgorithm::Debevec, MergeAlgorithm::Robertson]
    }
}

impl FromStr for MergeAlgorithm {
    type Err = HdrErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();

        for variant in Self::variants() {
            if variant.name() == lowered {
                return Ok(*variant);
            }
        }
        Err(HdrErrors::UnsupportedAlgorithm(s.to_string()))
    }
}

impl Display for MergeAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
