// src/logging.rs

//! Logging setup for `pagewatch` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `PAGEWATCH_LOG` environment variable, any `EnvFilter` directive
//!    (e.g. "debug" or "pagewatch=debug,reqwest=warn")
//! 3. default to `info`
//!
//! Logs go to STDERR so that `--dry-run` output on stdout stays clean.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "PAGEWATCH_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directives = filter_directives(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(EnvFilter::try_new(&directives)?)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pick the filter directives. An unparsable environment value falls back
/// to the default.
pub fn filter_directives(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(lvl) = cli_level {
        return level_directive(lvl).to_string();
    }
    env_value
        .map(str::trim)
        .filter(|s| !s.is_empty() && EnvFilter::try_new(s).is_ok())
        .unwrap_or(DEFAULT_DIRECTIVES)
        .to_string()
}

fn level_directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
