mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::Renderer;

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
    init_logging(cli.verbose);

    let mut renderer = Renderer::new(cli.format, cli.pretty, cli.strict);
    commands::run(&cli, &mut renderer).await?;

    if renderer.error_count() > 0 {
        return Err(CliError::DataUnavailable {
            error_count: renderer.error_count(),
        });
    }

    Ok(ExitCode::SUCCESS)
}

/// Warn for dependencies, info (debug with `--verbose`) for our own crates.
/// `RUST_LOG` is applied last and wins.
fn init_logging(verbose: bool) {
    let own_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter(None, LevelFilter::Warn)
        .filter(Some("pricedash"), own_level)
        .filter(Some("pricedash_core"), own_level)
        .parse_default_env()
        .init();
}
