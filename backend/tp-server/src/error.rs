use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] tp_config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] tp_db::DbError),

    #[error("OAuth setup error: {0}")]
    OAuth(#[from] crate::OAuthError),

    #[error("Logger error: {message}")]
    Logger { message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
