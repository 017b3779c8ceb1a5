use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Fetch(#[from] citypulse_core::FetchError),

    #[error(transparent)]
    Report(#[from] citypulse_core::ReportError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Fetch(_) => 2,
            Self::Report(_) => 3,
            Self::Logging(_) | Self::Io(_) => 10,
        }
    }
}

/// Exit code for a failed argument parse: help and version succeed, anything else is a usage error.
pub fn usage_exit_code(error: &clap::Error) -> u8 {
    use clap::error::ErrorKind;

    match error.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}
