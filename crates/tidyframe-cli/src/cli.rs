//! CLI argument definitions for tidyframe.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tidyframe_cli::logging::{LogConfig, LogFormat};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "tidyframe",
    version,
    about = "Clean tabular datasets against a declarative column spec",
    long_about = "Clean tabular datasets against a declarative column spec.\n\n\
                  Each input is renamed, pruned, filled, converted, filtered,\n\
                  deduplicated, sorted and validated, then written as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging setup for these flags. `--log-level` beats `-v/-q`, and either
    /// one disables `RUST_LOG`.
    pub fn log_config(&self) -> LogConfig {
        let explicit = self.verbosity.is_present() || self.log_level.is_some();
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter: self
                .log_level
                .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from),
            use_env_filter: !explicit,
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean one or more CSV files with the same spec.
    Clean(CleanArgs),

    /// Load a spec file, check its integrity and print its columns.
    CheckSpec(CheckSpecArgs),
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Path to the TOML spec file.
    #[arg(long = "spec", short = 's', value_name = "SPEC")]
    pub spec: PathBuf,

    /// CSV files to clean.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for `<stem>.clean.csv` outputs (default: next to each input).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Datasets cleaned at once (0 = one per core).
    #[arg(long = "jobs", short = 'j', value_name = "N", default_value_t = 0)]
    pub jobs: usize,

    /// Clean and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CheckSpecArgs {
    /// Path to the TOML spec file.
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_clean() {
        let cli = Cli::try_parse_from([
            "tidyframe",
            "clean",
            "--spec",
            "scores.toml",
            "a.csv",
            "b.csv",
            "-j",
            "2",
            "--dry-run",
        ])
        .unwrap();
        let Command::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.jobs, 2);
        assert!(args.dry_run);
        assert!(args.output_dir.is_none());
    }

    #[test]
    fn test_log_level_overrides_env() {
        let cli = Cli::try_parse_from([
            "tidyframe",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "check-spec",
            "s.toml",
        ])
        .unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn test_default_log_config_reads_env() {
        let cli = Cli::try_parse_from(["tidyframe", "check-spec", "s.toml"]).unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
    }

    #[test]
    fn test_clean_requires_input() {
        assert!(Cli::try_parse_from(["tidyframe", "clean", "--spec", "s.toml"]).is_err());
    }
}
