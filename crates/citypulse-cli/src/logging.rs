//! Diagnostic log setup.
//!
//! The subscriber is installed once by `main`. `CITYPULSE_LOG` takes an
//! `EnvFilter` directive and overrides `--debug`.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

pub const LOG_ENV: &str = "CITYPULSE_LOG";

/// Installs the global subscriber. Returns the log file path when `log_dir` is set.
pub fn init(debug: bool, log_dir: Option<&Path>) -> Result<Option<PathBuf>, CliError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_filter(debug));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match log_dir {
        Some(dir) => {
            let (path, file) = open_log_file(dir, OffsetDateTime::now_utc())?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|error| CliError::Logging(error.to_string()))?;
            Ok(Some(path))
        }
        None => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|error| CliError::Logging(error.to_string()))?;
            Ok(None)
        }
    }
}

fn default_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("citypulse=debug,citypulse_core=debug")
    } else {
        EnvFilter::new("citypulse=info,citypulse_core=info")
    }
}

/// `<dir>/citypulse-YYYYMMDD.log`, using the UTC date of `now`.
pub fn log_file_path(dir: &Path, now: OffsetDateTime) -> Result<PathBuf, CliError> {
    let format = time::format_description::parse("[year][month][day]")
        .map_err(|error| CliError::Logging(error.to_string()))?;
    let stamp = now
        .format(&format)
        .map_err(|error| CliError::Logging(error.to_string()))?;
    Ok(dir.join(format!("citypulse-{stamp}.log")))
}

/// Creates `dir` if needed and opens the day's log file for appending.
fn open_log_file(dir: &Path, now: OffsetDateTime) -> Result<(PathBuf, File), CliError> {
    std::fs::create_dir_all(dir)?;
    let path = log_file_path(dir, now)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}
