// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pagewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pagewatch",
    version,
    about = "Check web pages for changes and send notifications.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Pagewatch.toml")]
    pub config: String,

    /// Only check the named resource(s). May be repeated.
    ///
    /// Default: every enabled `[resource.<name>]`.
    #[arg(long = "resource", value_name = "NAME")]
    pub resources: Vec<String>,

    /// Pretend the local wall-clock time is `HH:MM` when evaluating the
    /// `[schedule]` section.
    #[arg(long, value_name = "HH:MM")]
    pub at: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PAGEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print resources and schedule, but don't fetch.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
