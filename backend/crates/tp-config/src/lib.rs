mod auth_config;
mod backend_kind;
mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod oauth_config;
mod server_config;
mod session_config;

#[cfg(test)]
mod tests;

pub use auth_config::AuthConfig;
pub use backend_kind::BackendKind;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use oauth_config::{OAuthClientConfig, OAuthConfig};
pub use server_config::ServerConfig;
pub use session_config::SessionConfig;

const CONFIG_DIR_ENV: &str = "TP_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".tp";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const MIN_PORT: u16 = 1024;

const DEFAULT_DATABASE_FILENAME: &str = "users.db";

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
