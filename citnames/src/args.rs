// SPDX-License-Identifier: GPL-3.0-or-later

//! This module contains the command line interface of the application.
//!
//! The command line parsing is implemented using the `clap` library.
//! The `Arguments` type represents a structured form of the program
//! invocation.

use clap::{ArgAction, ArgMatches, Command, arg, command};
use std::fmt;

/// The file name which stands for the standard input or output.
pub const STANDARD_STREAM: &str = "-";

/// Represents the command line arguments of the application.
#[derive(Debug, PartialEq)]
pub struct Arguments {
    // The path of the configuration file.
    pub config: Option<String>,
    // The file of the captured executions, one JSON object per line.
    pub input: String,
    // The file of the recognition results, one JSON object per line.
    pub output: String,
    // How many times the verbose flag was given.
    pub verbose: u8,
}

impl TryFrom<ArgMatches> for Arguments {
    type Error = anyhow::Error;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let config = matches.get_one::<String>("config").map(String::to_string);
        let input = matches
            .get_one::<String>("input")
            .map_or_else(|| STANDARD_STREAM.to_string(), String::to_string);
        let output = matches
            .get_one::<String>("output")
            .map_or_else(|| STANDARD_STREAM.to_string(), String::to_string);
        let verbose = matches.get_count("verbose");

        Ok(Arguments {
            config,
            input,
            output,
            verbose,
        })
    }
}

impl Arguments {
    /// The default log level filter, selected by the verbose flag count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arguments: config={}, input={}, output={}",
            self.config.as_deref().unwrap_or("(none)"),
            self.input,
            self.output
        )
    }
}

/// Represents the command line interface of the application.
pub fn cli() -> Command {
    command!().args(&[
        arg!(-v --verbose ... "Sets the level of verbosity").action(ArgAction::Count),
        arg!(-c --config <FILE> "Path of the config file"),
        arg!(-i --input <FILE> "Path of the execution events file, '-' for stdin")
            .default_value(STANDARD_STREAM)
            .hide_default_value(false),
        arg!(-o --output <FILE> "Path of the result file, '-' for stdout")
            .default_value(STANDARD_STREAM)
            .hide_default_value(false),
    ])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_all_arguments() {
        let execution = vec![
            "citnames",
            "-c",
            "~/citnames.yml",
            "-i",
            "events.json",
            "-o",
            "semantics.json",
            "-vv",
        ];

        let matches = cli().get_matches_from(execution);
        let arguments = Arguments::try_from(matches).unwrap();

        assert_eq!(
            arguments,
            Arguments {
                config: Some("~/citnames.yml".into()),
                input: "events.json".into(),
                output: "semantics.json".into(),
                verbose: 2,
            }
        );
        assert_eq!(arguments.log_level(), "debug");
    }

    #[test]
    fn test_defaults() {
        let execution = vec!["citnames"];

        let matches = cli().get_matches_from(execution);
        let arguments = Arguments::try_from(matches).unwrap();

        assert_eq!(
            arguments,
            Arguments {
                config: None,
                input: "-".into(),
                output: "-".into(),
                verbose: 0,
            }
        );
        assert_eq!(arguments.log_level(), "warn");
    }

    #[test]
    fn test_long_options() {
        let execution = vec!["citnames", "--input", "in.json", "--verbose", "--verbose", "--verbose"];

        let matches = cli().get_matches_from(execution);
        let arguments = Arguments::try_from(matches).unwrap();

        assert_eq!(arguments.input, "in.json");
        assert_eq!(arguments.output, "-");
        assert_eq!(arguments.log_level(), "trace");
    }

    #[test]
    fn test_unknown_argument_is_rejected() {
        let execution = vec!["citnames", "--append"];

        assert!(cli().try_get_matches_from(execution).is_err());
    }
}
