//! tp-cli library
//!
//! Command parsing, session wiring and command execution for the `tp`
//! binary, exported for tests.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod report;
pub mod session;


pub use cli::Cli;
pub use commands::{Commands, execute};
pub use error::{CliError, Result as CliResult};
pub use report::Report;
pub use session::{apply_overrides, build_backend, build_store, build_store_at};
