//! update-checker - Composer package update checker CLI tool
//!
//! Reads composer.json and composer.lock, asks the configured repositories
//! for every installed package's versions and reports, per package, the best
//! update within its constraint and the best update overall.
//!
//! Exit codes: 0 when every package was checked, 2 when some packages
//! failed, 1 on a fatal error.

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use update_checker::cli::CliArgs;
use update_checker::logging;
use update_checker::orchestrator::Orchestrator;
use update_checker::output::{create_formatter, OutputConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose, args.quiet);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        path = %args.path.display(),
        "starting"
    );

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let orchestrator = Orchestrator::new(args);
    let summary = orchestrator.run().await?;

    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&summary, &mut stdout)?;
    stdout.flush()?;

    if summary.has_failures() {
        // Partial success - some packages could not be checked
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
