//! tp - trip planner session CLI
//!
//! Drives the session store from a terminal: every command probes the
//! configured auth backend, runs, and prints the resulting session as JSON.
//!
//! # Examples
//!
//! ```bash
//! # Who am I, and are we online?
//! tp status --pretty
//!
//! # Sign in against a local auth server
//! tp --backend legacy --url http://127.0.0.1:5000 sign-in --email a@b.com --password secret
//!
//! # Start a Google sign-in, then finish it with the URL the browser landed on
//! tp oauth google
//! tp oauth-callback "http://localhost:5173/?token=..."
//! ```

use tp_cli::{Cli, CliError, CliResult, apply_overrides, build_store, execute, logger, report};
use tp_session::ErrorKind;

use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, error};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let CliError::Session(ref session_error) = e
                && session_error.kind() == ErrorKind::Unexpected
            {
                error!("{}", session_error);
            }
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // A missing .env is normal
    dotenvy::dotenv().ok();

    let mut config = tp_config::Config::load()?;
    apply_overrides(&mut config.session, &cli)?;

    let level = if cli.verbose {
        config.logging.level.0
    } else {
        LevelFilter::Warn
    };
    logger::initialize(level, config.log_file_path()?)?;

    let store = build_store(&config)?;
    let state = store.start().await;
    if let Some(warning) = report::offline_warning(&state) {
        eprintln!("{warning}");
    }

    let outcome = execute(&store, cli.command).await;
    store.shutdown();

    let report = outcome?;
    println!("{}", report.to_json(cli.pretty)?);

    Ok(())
}
