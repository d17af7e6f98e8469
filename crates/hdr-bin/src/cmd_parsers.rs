/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::ArgMatches;
use hdr_core::algorithm::MergeAlgorithm;
use hdr_core::errors::HdrErrors;
use hdr_core::pipeline::HdrRequest;
use hdr_core::tonemap::{ToneMapOperator, ToneMapSettings};
use log::{debug, info};

use crate::cmd_args::operator_flags;

pub mod global_options;

/// Collect the tonemap settings for `operator` from its subcommand arguments
///
/// Flags left out on the command line carry their defaults, so every
/// field of the operator is always present.
///
/// # Errors
/// [`HdrErrors::InvalidParameter`] if a value is out of range
pub fn parse_settings(
    operator: ToneMapOperator, args: &ArgMatches
) -> Result<ToneMapSettings, HdrErrors> {
    let mut fields = Vec::with_capacity(operator.fields().len());

    for (id, _, _) in operator_flags(operator) {
        if let Some(value) = args.get_one::<f32>(id) {
            if args.value_source(id) == Some(ValueSource::CommandLine) {
                info!("Setting {id} to {value}");
            }
            fields.push((*id, *value));
        }
    }
    ToneMapSettings::from_fields(operator.name(), &fields)
}

/// Build the pipeline request from subcommand arguments
///
/// # Errors
/// [`HdrErrors::UnsupportedAlgorithm`] for an unknown merge algorithm name,
/// exposure fusion ignores the algorithm and never fails here
pub fn parse_request(operator: ToneMapOperator, args: &ArgMatches) -> Result<HdrRequest, HdrErrors> {
    let images: Vec<PathBuf> = args
        .get_many::<PathBuf>("images")
        .map(|x| x.cloned().collect())
        .unwrap_or_default();

    let algorithm = match args.get_one::<String>("algorithm") {
        Some(name) if operator != ToneMapOperator::Mertens => name.parse::<MergeAlgorithm>()?,
        Some(name) => {
            debug!("Exposure fusion does not merge radiance, ignoring algorithm {name:?}");
            MergeAlgorithm::default()
        }
        None => MergeAlgorithm::default()
    };

    Ok(HdrRequest::new(images)
        .set_output(args.get_one::<PathBuf>("output").cloned())
        .set_exposures(args.get_one::<String>("exposures").cloned())
        .set_algorithm(algorithm))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::ArgMatches;
    use hdr_core::algorithm::MergeAlgorithm;
    use hdr_core::errors::HdrErrors;
    use hdr_core::tonemap::{DurandParams, ToneMapOperator, ToneMapSettings};

    use crate::cmd_args::create_cmd_args;
    use crate::cmd_parsers::{parse_request, parse_settings};

    fn subcommand_args(args: &[&str]) -> ArgMatches {
        let matches = create_cmd_args().try_get_matches_from(args).unwrap();
        matches.subcommand().unwrap().1.clone()
    }

    #[test]
    fn settings_take_flags_and_defaults() {
        let args = subcommand_args(&["hdr", "durand", "a.jpg", "b.jpg", "--contrast", "3"]);
        let settings = parse_settings(ToneMapOperator::Durand, &args).unwrap();

        let expected = DurandParams {
            contrast: 3.0,
            ..DurandParams::default()
        };
        assert_eq!(settings, ToneMapSettings::Durand(expected));
    }

    #[test]
    fn out_of_range_flags_are_invalid() {
        let args = subcommand_args(&["hdr", "drago", "a.jpg", "b.jpg", "--bias", "1.5"]);
        let result = parse_settings(ToneMapOperator::Drago, &args);

        assert!(matches!(result, Err(HdrErrors::InvalidParameter("drago", _))));
    }

    #[test]
    fn request_carries_paths_and_algorithm() {
        let args = subcommand_args(&[
            "hdr", "create", "a.jpg", "b.jpg", "-o", "out.png", "-a", "Robertson"
        ]);
        let request = parse_request(ToneMapOperator::Gamma, &args).unwrap();

        assert_eq!(request.images(), [PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
        assert_eq!(request.algorithm(), MergeAlgorithm::Robertson);
        assert_eq!(request.exposures(), None);
        assert_eq!(request.output_path().unwrap(), PathBuf::from("out.png"));
    }

    #[test]
    fn unknown_algorithm_is_unsupported() {
        let args = subcommand_args(&["hdr", "reinhard", "a.jpg", "b.jpg", "-a", "opencv"]);
        let result = parse_request(ToneMapOperator::Reinhard, &args);

        assert!(matches!(result, Err(HdrErrors::UnsupportedAlgorithm(name)) if name == "opencv"));
    }

    #[test]
    fn fusion_ignores_the_algorithm() {
        let args = subcommand_args(&["hdr", "mertens", "a.jpg", "b.jpg", "-a", "opencv"]);
        let request = parse_request(ToneMapOperator::Mertens, &args).unwrap();

        assert_eq!(request.algorithm(), MergeAlgorithm::Debevec);
    }
}
