mod cli;
mod error;
mod logging;
mod output;

use std::io::Cursor;
use std::process::ExitCode;

use citypulse_core::{
    fetch_body, render_report, AggregationStore, LineProcessor, ReqwestHttpClient,
};
use clap::Parser;
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::error::{usage_exit_code, CliError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let code = usage_exit_code(&error);
            let _ = error.print();
            return ExitCode::from(code);
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(path) = logging::init(cli.debug, cli.log_dir.as_deref())? {
        eprintln!("logging to {}", path.display());
    }

    let config = cli.fetch_config();
    debug!(endpoint = %cli.endpoint, ?config, "starting run");

    let client = ReqwestHttpClient::new();
    let body = fetch_body(&client, &cli.endpoint, &config).await?;

    let mut store = AggregationStore::new();
    let summary = LineProcessor::new(&mut store).process_reader(Cursor::new(body))?;
    if summary.valid == 0 {
        warn!(invalid = summary.invalid, "feed contained no usable records");
    }
    debug!(cities = store.cities().count(), "aggregated feed");

    let report = render_report(&store, &cli.sections(), !cli.compact)?;
    output::render(&report)
}
