//! quarcc - command-line client for the QUARCC member API.
//!
//! Restores the saved session on startup, then runs one command against
//! it: sign up, sign in or out, show status, or ask ConuAI a question.

mod commands;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quarcc_core::Config;

#[derive(Parser, Debug)]
#[command(name = "quarcc", version, about = "QUARCC member client")]
struct Cli {
    /// Backend base URL (overrides config and QUARCC_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show whether you are signed in
    Status,
    /// Create an account (does not sign you in)
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "student")]
        role: String,
        /// Mark the account as affiliated with Concordia
        #[arg(long)]
        affiliate: bool,
    },
    /// Sign in and remember the session
    Signin {
        #[arg(long)]
        email: String,
    },
    /// Forget the saved session
    Signout,
    /// Ask ConuAI a question (requires sign-in)
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so buffered lines are flushed.
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    if let Some(url) = cli.api_url {
        config.api_url = Some(url);
    }

    let session = match config.session_manager() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(api_url = %session.api_url(), "Starting");

    session.initialize().await;

    match commands::run(cli.command, &session).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
