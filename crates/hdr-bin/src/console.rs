/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Styled messages for the terminal
use std::fmt::Display;
use std::io::IsTerminal;

use clap::builder::styling::{AnsiColor, Style};

/// Wrap `message` in the escape codes for `color`, or leave it as is
pub fn style_string(message: impl Display, color: Option<AnsiColor>) -> String {
    match color {
        Some(color) => {
            let style = Style::new().fg_color(Some(color.into()));
            format!("{}{message}{}", style.render(), style.render_reset())
        }
        None => message.to_string()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Console {
    no_color: bool
}

impl Console {
    pub fn new(no_color: bool) -> Console {
        Console { no_color }
    }

    fn color(&self, color: AnsiColor, is_terminal: bool) -> Option<AnsiColor> {
        if self.no_color || !is_terminal {
            return None;
        }
        Some(color)
    }

    /// Print to standard output in yellow
    pub fn echo(&self, message: impl Display) {
        let color = self.color(AnsiColor::Yellow, std::io::stdout().is_terminal());
        println!("{}", style_string(message, color));
    }

    /// Print to standard error in red
    pub fn echo_error(&self, message: impl Display) {
        let color = self.color(AnsiColor::Red, std::io::stderr().is_terminal());
        eprintln!("{}", style_string(message, color));
    }
}
