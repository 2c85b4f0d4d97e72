//! tidyframe CLI.

use std::process::ExitCode;

use clap::Parser;
use tidyframe_cli::logging::init_logging;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_check_spec, run_clean};
use crate::summary::{print_spec, print_summary};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    let outcome = match &cli.command {
        Command::Clean(args) => run_clean(args).map(|run| {
            print_summary(&run);
            run.has_errors()
        }),
        Command::CheckSpec(args) => run_check_spec(args).map(|spec| {
            print_spec(&spec);
            false
        }),
    };
    match outcome {
        Ok(false) => ExitCode::SUCCESS,
        // some datasets failed; the summary already lists them
        Ok(true) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
