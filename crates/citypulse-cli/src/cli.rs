//! CLI argument definitions for citypulse.
//!
//! # Report flags
//!
//! | Flag | Section |
//! |------|---------|
//! | `-y` | Average age per city |
//! | `-f` | Average friend count per city |
//! | `-m` | Most friends of one person, per city |
//! | `-n` | Most common first name |
//! | `-r` | Most common hobby across all friends |
//!
//! With no report flag every section is printed.
//!
//! # Examples
//!
//! ```bash
//! citypulse https://example.test/people.ndjson
//! citypulse https://example.test/people.ndjson -y -n
//! citypulse https://example.test/people.ndjson --retries 5 --backoff exponential
//! ```

use std::path::PathBuf;
use std::time::Duration;

use citypulse_core::{FetchConfig, ReportSection, ReportSections, RetryConfig};
use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "citypulse",
    author,
    version,
    about = "Per-city statistics from an NDJSON people feed",
    long_about = "Fetches a newline-delimited JSON feed of people and their friends, \
then prints per-city averages and the most common name and hobby as JSON.\n\
\n\
Report sections default to \"all\"; pass any of -y -f -m -n -r to choose."
)]
pub struct Cli {
    /// URL of the NDJSON feed.
    pub endpoint: String,

    /// Retrieve [Y]ears of life, average per city.
    #[arg(short = 'y', default_value_t = false)]
    pub average_age: bool,

    /// Retrieve [F]riend count, average per city.
    #[arg(short = 'f', default_value_t = false)]
    pub average_friend_count: bool,

    /// Retrieve user with [M]ost friend count, per city.
    #[arg(short = 'm', default_value_t = false)]
    pub most_friends_count: bool,

    /// Retrieve most common first [N]ame, across all cities.
    #[arg(short = 'n', default_value_t = false)]
    pub most_common_name: bool,

    /// Retrieve most common [R]ecreational hobby, across all friends in all cities.
    #[arg(short = 'r', default_value_t = false)]
    pub most_common_hobby: bool,

    /// Total fetch attempts before giving up (exit code 2).
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: u32,

    /// Delay between fetch attempts in milliseconds (base delay for exponential backoff).
    #[arg(long, default_value_t = 5_000)]
    pub retry_delay_ms: u64,

    /// Backoff strategy between fetch attempts.
    #[arg(long, value_enum, default_value_t = BackoffKind::Fixed)]
    pub backoff: BackoffKind,

    /// Per-attempt request timeout in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Print the report on a single line instead of pretty-printed.
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Enable debug logging.
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Write diagnostics to a dated log file in this directory instead of stderr.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Backoff strategy options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackoffKind {
    /// Same delay before every retry.
    Fixed,
    /// Doubling delay with jitter, capped at 30 seconds.
    Exponential,
}

impl Cli {
    /// Report sections chosen by flags; empty means all.
    pub fn sections(&self) -> ReportSections {
        [
            (self.average_age, ReportSection::AverageAge),
            (self.average_friend_count, ReportSection::AverageFriendCount),
            (self.most_friends_count, ReportSection::MostFriendsCount),
            (self.most_common_name, ReportSection::MostCommonName),
            (self.most_common_hobby, ReportSection::MostCommonHobby),
        ]
        .into_iter()
        .filter_map(|(selected, section)| selected.then_some(section))
        .collect()
    }

    pub fn fetch_config(&self) -> FetchConfig {
        let delay = Duration::from_millis(self.retry_delay_ms);
        let retry = match self.backoff {
            BackoffKind::Fixed => RetryConfig::fixed(delay, self.retries),
            BackoffKind::Exponential => RetryConfig::exponential(delay, self.retries),
        };

        FetchConfig {
            timeout_ms: self.timeout_ms,
            retry,
        }
    }
}
