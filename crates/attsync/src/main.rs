//! attsync CLI - Confluence attachment pull/push.
//!
//! Pulls one attachment from a Confluence page (optionally a historical
//! version via a `.v<N>` filename suffix) or pushes a local file as a new
//! attachment or a new version of an existing one.

mod commands;
mod error;
mod output;
mod prompt;
mod scratch;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use commands::SyncArgs;
use error::CliError;
use output::Output;

/// Exit status for a pull rejected with bad credentials (clap owns 2).
const EXIT_AUTH_FAILED: u8 = 3;

/// Exit status after SIGINT/SIGTERM.
const EXIT_INTERRUPTED: u8 = 130;

/// attsync - Pull and push Confluence page attachments.
#[derive(Parser)]
#[command(name = "attsync", version, about)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.sync.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.sync.execute(&output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::FatalAuth(err)) => {
            output.error(&format!("Fatal: {err}. Aborting."));
            ExitCode::from(EXIT_AUTH_FAILED)
        }
        Err(CliError::Interrupted) => {
            output.error("Interrupted, scratch directory removed.");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(err) => {
            output.error(&format!("Error: {err}"));
            output.info("");
            output.info(&Cli::command().render_help().to_string());
            ExitCode::FAILURE
        }
    }
}
