use crate::{CliError, CliResult};

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fern::Dispatch;
use log::LevelFilter;

/// Initialize logger with fern.
///
/// stdout carries the JSON report, so logs go to stderr, or to `log_file`
/// when one is configured.
pub fn initialize(level: LevelFilter, log_file: Option<PathBuf>) -> CliResult<()> {
    let dispatch = Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = humantime::format_rfc3339(SystemTime::now()),
                level = record.level(),
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0),
            ))
        });

    let dispatch = match log_file {
        Some(ref path) => {
            let file = open_log_file(path).map_err(|e| CliError::Logger {
                message: format!("Failed to open log file {}: {}", path.display(), e),
            })?;
            dispatch.chain(file)
        }
        None => dispatch.chain(std::io::stderr()),
    };

    dispatch.apply().map_err(|e| CliError::Logger {
        message: format!("Failed to initialize logger: {e}"),
    })
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    fern::log_file(path)
}
