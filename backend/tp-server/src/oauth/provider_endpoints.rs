use crate::oauth::{OAuthError, Result as OAuthResult};

use tp_config::OAuthClientConfig;
use tp_core::OAuthProvider;

use std::panic::Location;

use error_location::ErrorLocation;
use url::Url;

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const GOOGLE_SCOPE: &str = "openid email profile";

const FACEBOOK_AUTHORIZE_URL: &str = "https://www.facebook.com/v19.0/dialog/oauth";
const FACEBOOK_TOKEN_URL: &str = "https://graph.facebook.com/v19.0/oauth/access_token";
const FACEBOOK_USERINFO_URL: &str = "https://graph.facebook.com/v19.0/me";
const FACEBOOK_SCOPE: &str = "email";

/// Where a provider's authorization, token and profile endpoints live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub authorize_url: Url,
    pub token_url: Url,
    pub userinfo_url: Url,
    pub scope: &'static str,
}

impl ProviderEndpoints {
    /// Public endpoints for `provider`, with any URL the client config
    /// overrides swapped in.
    pub fn resolve(provider: OAuthProvider, config: &OAuthClientConfig) -> OAuthResult<Self> {
        let (authorize, token, userinfo, scope) = match provider {
            OAuthProvider::Google => (
                GOOGLE_AUTHORIZE_URL,
                GOOGLE_TOKEN_URL,
                GOOGLE_USERINFO_URL,
                GOOGLE_SCOPE,
            ),
            OAuthProvider::Facebook => (
                FACEBOOK_AUTHORIZE_URL,
                FACEBOOK_TOKEN_URL,
                FACEBOOK_USERINFO_URL,
                FACEBOOK_SCOPE,
            ),
        };

        Ok(Self {
            authorize_url: parse_url(
                "authorize_url",
                config.authorize_url.as_deref().unwrap_or(authorize),
            )?,
            token_url: parse_url("token_url", config.token_url.as_deref().unwrap_or(token))?,
            userinfo_url: parse_url(
                "userinfo_url",
                config.userinfo_url.as_deref().unwrap_or(userinfo),
            )?,
            scope,
        })
    }
}

#[track_caller]
pub(crate) fn parse_url(field: &'static str, value: &str) -> OAuthResult<Url> {
    Url::parse(value).map_err(|source| OAuthError::InvalidUrl {
        field,
        url: value.to_string(),
        source,
        location: ErrorLocation::from(Location::caller()),
    })
}
