use crate::{OAuthSettings, ServerResult};

use tp_auth::{JwtIssuer, JwtValidator, PasswordHasher};
use tp_config::Config;
use tp_db::UserRepository;

use std::sync::Arc;

use sqlx::SqlitePool;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub users: UserRepository,
    pub issuer: Arc<JwtIssuer>,
    pub validator: Arc<JwtValidator>,
    pub hasher: PasswordHasher,
    pub oauth: Arc<OAuthSettings>,
}

impl AppState {
    /// Wire the handlers' dependencies from validated configuration.
    ///
    /// Fails when no JWT secret is configured.
    pub fn from_config(pool: SqlitePool, config: &Config) -> ServerResult<Self> {
        let secret = config.auth.require_jwt_secret()?.as_bytes();

        Ok(Self {
            users: UserRepository::new(pool.clone()),
            pool,
            issuer: Arc::new(
                JwtIssuer::with_hs256(secret).with_ttl_secs(config.auth.token_ttl_secs),
            ),
            validator: Arc::new(JwtValidator::with_hs256(secret)),
            hasher: PasswordHasher::new(config.auth.bcrypt_cost),
            oauth: Arc::new(OAuthSettings::from_config(&config.oauth)?),
        })
    }
}
