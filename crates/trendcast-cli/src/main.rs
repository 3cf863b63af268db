mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let result = commands::run(&cli).await?;
    output::render(&result, cli.format, cli.pretty, &mut std::io::stdout().lock())?;

    if cli.strict && !result.warnings.is_empty() {
        return Err(CliError::StrictModeViolation {
            warning_count: result.warnings.len(),
        });
    }

    Ok(ExitCode::SUCCESS)
}
