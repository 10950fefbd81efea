//! Entry point for jikan, a minimal streaming LLM chat for the terminal.
//!
//! This binary loads environment variables, sets up logging, parses CLI
//! arguments via [`cli`], and dispatches to the appropriate subcommand handler.

mod agent;
mod chat;
mod cli;
mod config;
mod constants;
mod error;
mod format;
mod message;
mod output;
mod provider;
mod session;
mod tools;

use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Runs the jikan CLI.
///
/// Loads `.env` files (silently ignored if absent), installs a stderr
/// tracing subscriber filtered by `JIKAN_LOG`, parses command-line arguments
/// into a [`cli::Cli`] struct, and dispatches via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_logging();
    let cli = cli::parse();
    match cli::run(cli).await {
        Err(e) if e.is::<cli::AlreadyReported>() => Ok(ExitCode::FAILURE),
        other => other.map(|()| ExitCode::SUCCESS),
    }
}

/// Logs go to stderr so they never interleave with streamed replies on stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_env(constants::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(constants::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
