use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tp")]
#[command(about = "Trip planner session CLI")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Auth backend to use: "hosted" or "legacy" (overrides session.backend)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Backend base URL (overrides session.backend_url)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Hosted backend API key (overrides session.api_key)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log at the configured level instead of warnings only
    #[arg(long, short, global = true)]
    pub verbose: bool,
}
