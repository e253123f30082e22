use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR,
    DatabaseConfig, LoggingConfig, OAuthConfig, ServerConfig, SessionConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub oauth: OAuthConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. `TP_CONFIG_DIR` if set, else `./.tp/`
    /// 2. Create the directory if missing
    /// 3. Read `config.toml` if it exists, else defaults
    /// 4. Apply `TP_*` environment overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: TP_CONFIG_DIR env var > ./.tp/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate every section. The JWT secret is only checked for length
    /// here; the server calls `AuthConfig::require_jwt_secret` itself.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.oauth.validate()?;
        self.session.validate()?;

        Ok(())
    }

    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.database.path))
    }

    pub fn fallback_store_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.session.fallback_file))
    }

    /// Log file location, or `None` when logging to stdout
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        let Some(ref file) = self.logging.file else {
            return Ok(None);
        };
        Ok(Some(
            Self::config_dir()?.join(&self.logging.dir).join(file),
        ))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (never logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!("  database: {}", self.database.path);
        info!(
            "  auth: {} (ttl={}s, bcrypt cost={})",
            if self.auth.jwt_secret.is_some() {
                "HS256"
            } else {
                "no secret"
            },
            self.auth.token_ttl_secs,
            self.auth.bcrypt_cost
        );

        let providers: Vec<&str> = [
            ("google", self.oauth.google.is_configured()),
            ("facebook", self.oauth.facebook.is_configured()),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect();
        info!(
            "  oauth: frontend={}, providers=[{}]",
            self.oauth.frontend_url,
            providers.join(", ")
        );

        info!(
            "  session: {} at {} (probe {}ms, store {})",
            self.session.backend,
            self.session.backend_url,
            self.session.probe_timeout_ms,
            self.session.fallback_file
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("TP_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("TP_SERVER_PORT", &mut self.server.port);

        // Database
        Self::apply_env_string("TP_DATABASE_PATH", &mut self.database.path);

        // Auth
        Self::apply_env_option_string("TP_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        Self::apply_env_parse("TP_AUTH_TOKEN_TTL_SECS", &mut self.auth.token_ttl_secs);
        Self::apply_env_parse("TP_AUTH_BCRYPT_COST", &mut self.auth.bcrypt_cost);

        // OAuth
        Self::apply_env_string("TP_OAUTH_FRONTEND_URL", &mut self.oauth.frontend_url);
        Self::apply_env_string(
            "TP_OAUTH_FAILURE_REDIRECT",
            &mut self.oauth.failure_redirect,
        );
        Self::apply_env_option_string(
            "TP_OAUTH_GOOGLE_CLIENT_ID",
            &mut self.oauth.google.client_id,
        );
        Self::apply_env_option_string(
            "TP_OAUTH_GOOGLE_CLIENT_SECRET",
            &mut self.oauth.google.client_secret,
        );
        Self::apply_env_option_string(
            "TP_OAUTH_GOOGLE_REDIRECT_URI",
            &mut self.oauth.google.redirect_uri,
        );
        Self::apply_env_option_string(
            "TP_OAUTH_FACEBOOK_CLIENT_ID",
            &mut self.oauth.facebook.client_id,
        );
        Self::apply_env_option_string(
            "TP_OAUTH_FACEBOOK_CLIENT_SECRET",
            &mut self.oauth.facebook.client_secret,
        );
        Self::apply_env_option_string(
            "TP_OAUTH_FACEBOOK_REDIRECT_URI",
            &mut self.oauth.facebook.redirect_uri,
        );

        // Session
        Self::apply_env_parse("TP_SESSION_BACKEND", &mut self.session.backend);
        Self::apply_env_string("TP_SESSION_BACKEND_URL", &mut self.session.backend_url);
        Self::apply_env_option_string("TP_SESSION_API_KEY", &mut self.session.api_key);
        Self::apply_env_option_string(
            "TP_SESSION_OAUTH_REDIRECT_TO",
            &mut self.session.oauth_redirect_to,
        );
        Self::apply_env_parse(
            "TP_SESSION_PROBE_TIMEOUT_MS",
            &mut self.session.probe_timeout_ms,
        );
        Self::apply_env_string("TP_SESSION_FALLBACK_FILE", &mut self.session.fallback_file);

        // Logging
        Self::apply_env_parse("TP_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("TP_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("TP_LOG_FILE", &mut self.logging.file);
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values are ignored and the previous value kept
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
