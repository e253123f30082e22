use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] tp_config::ConfigError),

    #[error("{0}")]
    Session(#[from] tp_session::SessionError),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logger error: {message}")]
    Logger { message: String },
}

impl CliError {
    /// Line to show the user; session errors use their friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Session(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
