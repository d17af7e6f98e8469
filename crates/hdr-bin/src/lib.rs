/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::process::exit;

use log::{debug, error};

use crate::cmd_args::help_strings::LICENSE_TEXT;
use crate::console::Console;
use crate::engine::NativeEngine;
use crate::workflow::run_operator;

mod cmd_args;
mod cmd_parsers;
mod console;
pub mod engine;
pub mod file_io;
mod probe_files;
mod serde;
mod workflow;

pub fn main() {
    let cmd = cmd_args::create_cmd_args();
    let options = cmd.get_matches();

    if options.get_flag("license") {
        println!("{LICENSE_TEXT}");
        return;
    }

    cmd_parsers::global_options::setup_logger(&options);

    let console = Console::new(options.get_flag("no-color"));

    match options.subcommand() {
        Some(("probe", args)) => {
            if let Err(err) = probe_files::probe_input_files(args) {
                error!("Could not probe files, reason {:?}", err);
                exit(1);
            }
        }
        Some((name, args)) => match run_operator(&NativeEngine::new(), name, args) {
            Ok(path) => console.echo(path.display()),
            Err(err) => {
                debug!("{name} failed");
                console.echo_error(format!("{err}").trim_end());
                exit(1);
            }
        },
        None => {
            let mut cmd = cmd_args::create_cmd_args();

            if let Err(err) = cmd.print_help() {
                error!("Could not print help, reason {:?}", err);
                exit(1);
            }
        }
    }
}
