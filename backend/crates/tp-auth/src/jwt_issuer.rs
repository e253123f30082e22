use crate::{AuthError, Claims, DEFAULT_TOKEN_TTL_SECS, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

/// Mints HS256 tokens carrying `{userId}` with a fixed lifetime
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    ttl_secs: i64,
}

impl JwtIssuer {
    pub fn with_hs256(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for `user_id` valid from now
    #[track_caller]
    pub fn issue(&self, user_id: &str) -> AuthErrorResult<String> {
        self.issue_at(user_id, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if minted at `issued_at` (Unix seconds)
    #[track_caller]
    pub fn issue_at(&self, user_id: &str, issued_at: i64) -> AuthErrorResult<String> {
        let claims = Claims::new(user_id, issued_at, self.ttl_secs);
        claims.validate()?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AuthError::JwtEncode {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
