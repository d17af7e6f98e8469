/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};
use hdr_core::tonemap::ToneMapOperator;

use crate::cmd_args::help_strings::{
    ALGORITHM_HELP, CREATE_HELP, DRAGO_HELP, DURAND_HELP, EXPOSURES_HELP, MANTIUK_HELP,
    MERTENS_HELP, PROBE_HELP, REINHARD_HELP
};

pub mod help_strings;

/// A numeric operator flag, `(id, default, help)`
///
/// The id doubles as the long flag and as the settings field name.
pub type OperatorFlag = (&'static str, &'static str, &'static str);

const GAMMA_FLAG: OperatorFlag = ("gamma", "2.2", "Gamma correction applied to the result");
const SATURATION_FLAG: OperatorFlag = ("saturation", "1.0", "Saturation enhancement, 1 leaves colors unchanged");

/// Flags accepted by each operator, in the order of [`ToneMapOperator::fields`]
#[rustfmt::skip]
pub const fn operator_flags(operator: ToneMapOperator) -> &'static [OperatorFlag] {
    match operator {
        ToneMapOperator::Gamma => &[GAMMA_FLAG],
        ToneMapOperator::Drago => &[
            ("gamma", "1.0", "Gamma correction applied to the result"),
            SATURATION_FLAG,
            ("bias", "0.85", "Value of the bias function, in (0, 1]")
        ],
        ToneMapOperator::Durand => &[
            GAMMA_FLAG,
            ("contrast", "4.0", "Resulting contrast of the base layer, in log units"),
            SATURATION_FLAG,
            ("sigma-space", "2.0", "Spatial sigma of the bilateral filter"),
            ("sigma-color", "2.0", "Range sigma of the bilateral filter")
        ],
        ToneMapOperator::Mantiuk => &[
            GAMMA_FLAG,
            ("scale", "0.7", "Contrast scale factor, lower values compress more"),
            SATURATION_FLAG
        ],
        ToneMapOperator::Mertens => &[
            GAMMA_FLAG,
            ("contrast", "1.0", "Exponent of the contrast weight"),
            ("saturation", "1.0", "Exponent of the saturation weight"),
            ("exposure", "0.0", "Exponent of the well-exposedness weight")
        ],
        ToneMapOperator::Reinhard => &[
            ("gamma", "1.0", "Gamma correction applied to the result"),
            ("intensity", "0.0", "Result intensity, in [-8, 8], higher is brighter"),
            ("light-adapt", "1.0", "Light adaptation, 0 is global and 1 is per pixel"),
            ("color-adapt", "0.0", "Chromatic adaptation, 0 treats channels equally and 1 adapts each")
        ]
    }
}

/// Name of the subcommand that runs `operator`
pub const fn command_name(operator: ToneMapOperator) -> &'static str {
    match operator {
        ToneMapOperator::Gamma => "create",
        _ => operator.name()
    }
}

const fn command_help(operator: ToneMapOperator) -> &'static str {
    match operator {
        ToneMapOperator::Gamma => CREATE_HELP,
        ToneMapOperator::Drago => DRAGO_HELP,
        ToneMapOperator::Durand => DURAND_HELP,
        ToneMapOperator::Mantiuk => MANTIUK_HELP,
        ToneMapOperator::Mertens => MERTENS_HELP,
        ToneMapOperator::Reinhard => REINHARD_HELP
    }
}

fn images_arg() -> Arg {
    Arg::new("images")
        .value_name("IMAGES")
        .help("Input images, the second one names the default output")
        .num_args(1..)
        .required(true)
        .value_parser(value_parser!(PathBuf))
}

#[rustfmt::skip]
fn operator_cmd(operator: ToneMapOperator) -> Command {
    let mut cmd = Command::new(command_name(operator))
        .about(command_help(operator).lines().next().unwrap_or_default())
        .long_about(command_help(operator))
        .arg(images_arg())
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("PATH")
            .help("Output image, defaults to the second image with _hdr appended")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("exposures")
            .short('e')
            .long("exposures")
            .value_name("LIST")
            .help("Comma separated exposure times in seconds, one per image")
            .long_help(EXPOSURES_HELP))
        .arg(Arg::new("algorithm")
            .short('a')
            .long("algorithm")
            .value_name("NAME")
            .default_value("debevec")
            .help("Camera response calibration and merge algorithm")
            .long_help(ALGORITHM_HELP));

    for (id, default, help) in operator_flags(operator) {
        cmd = cmd.arg(Arg::new(*id)
            .long(*id)
            .value_name("FLOAT")
            .default_value(*default)
            .allow_negative_numbers(true)
            .help_heading("TONEMAP")
            .help(*help)
            .value_parser(value_parser!(f32)));
    }
    cmd
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    let mut cmd = Command::new("hdr")
        .about("Create HDR images from bracketed exposures")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("probe")
            .about(PROBE_HELP.lines().next().unwrap_or_default())
            .long_about(PROBE_HELP)
            .arg(images_arg().help("Images to probe")))
        .arg(Arg::new("license")
            .long("license")
            .action(ArgAction::SetTrue)
            .help("Display license information and exit"))
        .arg(Arg::new("no-color")
            .long("no-color")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Remove ANSI color and styling from output"))
        .arg(Arg::new("debug")
            .long("debug")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the merge and higher"));

    for operator in ToneMapOperator::variants() {
        cmd = cmd.subcommand(operator_cmd(*operator));
    }
    cmd
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use hdr_core::tonemap::{ToneMapOperator, ToneMapSettings};

    use crate::cmd_args::{command_name, create_cmd_args, operator_flags};

    #[test]
    fn command_definition_is_valid() {
        create_cmd_args().debug_assert();
    }

    #[test]
    fn flags_follow_settings_fields() {
        for operator in ToneMapOperator::variants() {
            let ids: Vec<&str> = operator_flags(*operator).iter().map(|x| x.0).collect();
            assert_eq!(ids, operator.fields(), "{}", operator.name());
        }
    }

    #[test]
    fn flag_defaults_match_settings_defaults() {
        for operator in ToneMapOperator::variants() {
            let fields: Vec<(&str, f32)> = operator_flags(*operator)
                .iter()
                .map(|(id, default, _)| (*id, default.parse::<f32>().unwrap()))
                .collect();
            let settings = ToneMapSettings::from_fields(operator.name(), &fields).unwrap();

            assert_eq!(settings, operator.default_settings(), "{}", operator.name());
        }
    }

    #[test]
    fn parses_operator_invocation() {
        let matches = create_cmd_args()
            .try_get_matches_from([
                "hdr", "--no-color", "reinhard", "a.jpg", "b.jpg", "-e", "0.1,0.5", "--intensity",
                "-2.5"
            ])
            .unwrap();

        assert!(matches.get_flag("no-color"));

        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, command_name(ToneMapOperator::Reinhard));

        let images: Vec<&PathBuf> = args.get_many::<PathBuf>("images").unwrap().collect();
        assert_eq!(images, [&PathBuf::from("a.jpg"), &PathBuf::from("b.jpg")]);
        assert_eq!(args.get_one::<String>("exposures").unwrap(), "0.1,0.5");
        assert_eq!(*args.get_one::<f32>("intensity").unwrap(), -2.5);
        assert_eq!(args.get_one::<String>("algorithm").unwrap(), "debevec");
    }

    #[test]
    fn foreign_flags_are_rejected() {
        let result =
            create_cmd_args().try_get_matches_from(["hdr", "drago", "a.jpg", "b.jpg", "--scale", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn images_are_required() {
        assert!(create_cmd_args().try_get_matches_from(["hdr", "create"]).is_err());
    }
}
