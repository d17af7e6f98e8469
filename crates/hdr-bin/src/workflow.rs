/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::ArgMatches;
use hdr_core::engine::RadianceEngine;
use hdr_core::errors::HdrErrors;
use hdr_core::pipeline;
use hdr_core::tonemap::{ToneMapOperator, ToneMapSettings};

use crate::cmd_parsers::{parse_request, parse_settings};

/// Run the operator subcommand `command` and return the written path
///
/// # Errors
/// Argument errors, then whatever the pipeline raises
pub fn run_operator<E: RadianceEngine + ?Sized>(
    engine: &E, command: &str, args: &ArgMatches
) -> Result<PathBuf, HdrErrors> {
    let operator = command.parse::<ToneMapOperator>()?;

    let settings = parse_settings(operator, args)?;
    let request = parse_request(operator, args)?;

    match settings {
        ToneMapSettings::Gamma(params) => pipeline::create(engine, &request, params),
        ToneMapSettings::Drago(params) => pipeline::drago(engine, &request, params),
        ToneMapSettings::Durand(params) => pipeline::durand(engine, &request, params),
        ToneMapSettings::Mantiuk(params) => pipeline::mantiuk(engine, &request, params),
        ToneMapSettings::Mertens(params) => pipeline::mertens(engine, &request, params),
        ToneMapSettings::Reinhard(params) => pipeline::reinhard(engine, &request, params)
    }
}
