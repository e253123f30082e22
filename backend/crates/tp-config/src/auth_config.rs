use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_JWT_SECRET_LENGTH: usize = 32;

pub const MIN_TOKEN_TTL_SECS: i64 = 1;
pub const MAX_TOKEN_TTL_SECS: i64 = 86_400;
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Token and password settings for the local auth service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. Required to run the server.
    pub jwt_secret: Option<String>,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(ref secret) = self.jwt_secret
            && secret.len() < MIN_JWT_SECRET_LENGTH
        {
            return Err(ConfigError::auth(format!(
                "auth.jwt_secret must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        if !(MIN_TOKEN_TTL_SECS..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(ConfigError::auth(format!(
                "auth.token_ttl_secs must be {}-{}, got {}",
                MIN_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, self.token_ttl_secs
            )));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::auth(format!(
                "auth.bcrypt_cost must be {}-{}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, self.bcrypt_cost
            )));
        }

        Ok(())
    }

    /// The signing secret, for components that cannot run without one
    pub fn require_jwt_secret(&self) -> ConfigErrorResult<&str> {
        self.jwt_secret.as_deref().ok_or_else(|| {
            ConfigError::auth("auth.jwt_secret (or TP_AUTH_JWT_SECRET) must be set")
        })
    }
}
