// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context;
use citnames::args::{self, STANDARD_STREAM};
use citnames::output::{self, Statistics};
use citnames::{config, semantic};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::ExitCode;

/// Driver function of the application.
fn main() -> anyhow::Result<ExitCode> {
    // Parse the command line arguments.
    let matches = args::cli().get_matches();
    let arguments = args::Arguments::try_from(matches)?;

    // Initialize the logging system, the verbose flags set the default level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(arguments.log_level()))
        .init();
    let pkg_name = env!("CARGO_PKG_NAME");
    let pkg_version = env!("CARGO_PKG_VERSION");
    log::info!("{pkg_name} v{pkg_version}");
    log::info!("{arguments}");

    // Load the configuration.
    let current_directory =
        std::env::current_dir().context("Failed to get the current working directory")?;
    let configuration = config::Loader::load(&current_directory, arguments.config.as_deref())?;
    log::info!("{configuration}");

    let chain = semantic::ToolChain::from(&configuration);
    let reader = open_input(&arguments.input)?;
    let writer = open_output(&arguments.output)?;

    let statistics = Statistics::default();
    output::process(&chain, reader, writer, &statistics)?;
    log::info!("{statistics}");

    Ok(ExitCode::SUCCESS)
}

fn open_input(name: &str) -> anyhow::Result<Box<dyn BufRead>> {
    if name == STANDARD_STREAM {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(name).with_context(|| format!("Failed to open input file: {name}"))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(name: &str) -> anyhow::Result<Box<dyn Write>> {
    if name == STANDARD_STREAM {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = File::create(name).with_context(|| format!("Failed to create output file: {name}"))?;
    Ok(Box::new(BufWriter::new(file)))
}
