use crate::oauth_config::require_http_url;
use crate::{BackendKind, ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

pub const MIN_PROBE_TIMEOUT_MS: u64 = 1;
pub const MAX_PROBE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3_000;

pub const DEFAULT_FALLBACK_FILE: &str = "session.json";
pub const DEFAULT_IDENTITY_KEY: &str = "user";
pub const DEFAULT_TOKEN_KEY: &str = "auth-token";

/// Client-side session store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub backend: BackendKind,
    pub backend_url: String,
    /// Public (anon) key sent to the hosted backend
    pub api_key: Option<String>,
    /// Where the hosted backend sends the browser after OAuth
    pub oauth_redirect_to: Option<String>,
    /// Upper bound for the startup reachability probe
    pub probe_timeout_ms: u64,
    /// Local fallback store file, relative to the config dir
    pub fallback_file: String,
    /// Fallback store key holding the cached identity
    pub identity_key: String,
    /// Fallback store key holding the backend session token
    pub token_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            backend_url: String::from(DEFAULT_BACKEND_URL),
            api_key: None,
            oauth_redirect_to: None,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            fallback_file: String::from(DEFAULT_FALLBACK_FILE),
            identity_key: String::from(DEFAULT_IDENTITY_KEY),
            token_key: String::from(DEFAULT_TOKEN_KEY),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        require_http_url("session.backend_url", &self.backend_url)?;

        if self.backend == BackendKind::Hosted && self.api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err(ConfigError::session(
                "session.api_key is required for the hosted backend",
            ));
        }

        if !(MIN_PROBE_TIMEOUT_MS..=MAX_PROBE_TIMEOUT_MS).contains(&self.probe_timeout_ms) {
            return Err(ConfigError::session(format!(
                "session.probe_timeout_ms must be {}-{}, got {}",
                MIN_PROBE_TIMEOUT_MS, MAX_PROBE_TIMEOUT_MS, self.probe_timeout_ms
            )));
        }

        let fallback = std::path::Path::new(&self.fallback_file);
        if self.fallback_file.is_empty() || fallback.is_absolute() || self.fallback_file.contains("..")
        {
            return Err(ConfigError::session(
                "session.fallback_file must be relative and cannot contain '..'",
            ));
        }

        if self.identity_key.is_empty() || self.token_key.is_empty() {
            return Err(ConfigError::session(
                "session.identity_key and session.token_key cannot be empty",
            ));
        }

        if self.identity_key == self.token_key {
            return Err(ConfigError::session(
                "session.identity_key and session.token_key must differ",
            ));
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}
