//! Program logging.
//!
//! Messages are written to stderr so that compiled TableIR can be piped from stdout. The log level
//! is taken from the `VEDALANG_LOG_LEVEL` environment variable if set, otherwise from the program
//! settings.
use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// The default log level for the program.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable which overrides the configured log level
const LOG_LEVEL_ENV_VAR: &str = "VEDALANG_LOG_LEVEL";

/// Set once the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger.
///
/// Does nothing if the logger has already been initialised.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_file_path`: Optionally, a file to which a copy of all log messages is written
pub fn init(log_level_from_settings: &str, log_file_path: Option<&Path>) -> Result<()> {
    if is_logger_initialised() {
        return Ok(());
    }

    let log_level = env::var(LOG_LEVEL_ENV_VAR).unwrap_or(log_level_from_settings.to_string());
    let log_level = parse_log_level(&log_level)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log_level)
        .chain(std::io::stderr());

    if let Some(path) = log_file_path {
        let file = fern::log_file(path)
            .with_context(|| format!("Could not open log file {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().context("Failed to set logger")?;
    LOGGER_INIT.set(()).ok();

    Ok(())
}

/// Parse a log level string (case-insensitive)
fn parse_log_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim()).ok().with_context(|| {
        format!("Unknown log level: {level}. Options are: off, error, warn, info, debug, trace")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("info", LevelFilter::Info)]
    #[case("WARN", LevelFilter::Warn)]
    #[case(" debug ", LevelFilter::Debug)]
    #[case("off", LevelFilter::Off)]
    fn parse_log_level_valid(#[case] level: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_log_level(level).unwrap(), expected);
    }

    #[test]
    fn parse_log_level_invalid() {
        assert!(parse_log_level("loud").is_err());
    }
}
