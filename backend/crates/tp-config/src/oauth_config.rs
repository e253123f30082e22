use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_FAILURE_REDIRECT: &str = "/login";

/// OAuth settings for the local auth service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Where successful sign-ins land, with `?token=` appended
    pub frontend_url: String,
    /// Where failed sign-ins land
    pub failure_redirect: String,
    pub google: OAuthClientConfig,
    pub facebook: OAuthClientConfig,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            frontend_url: String::from(DEFAULT_FRONTEND_URL),
            failure_redirect: String::from(DEFAULT_FAILURE_REDIRECT),
            google: OAuthClientConfig::default(),
            facebook: OAuthClientConfig::default(),
        }
    }
}

/// Client registration with one provider.
///
/// Endpoint URLs are optional overrides; the server falls back to the
/// provider's public endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OAuthClientConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub authorize_url: Option<String>,
    pub token_url: Option<String>,
    pub userinfo_url: Option<String>,
}

impl OAuthClientConfig {
    /// A provider is enabled once a client id is present
    pub fn is_configured(&self) -> bool {
        self.client_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    fn validate(&self, provider: &str) -> ConfigErrorResult<()> {
        if !self.is_configured() {
            return Ok(());
        }

        if self.client_secret.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::oauth(format!(
                "oauth.{provider}.client_secret is required when client_id is set"
            )));
        }

        let Some(redirect_uri) = self.redirect_uri.as_deref() else {
            return Err(ConfigError::oauth(format!(
                "oauth.{provider}.redirect_uri is required when client_id is set"
            )));
        };
        require_http_url(&format!("oauth.{provider}.redirect_uri"), redirect_uri)?;

        for (field, value) in [
            ("authorize_url", &self.authorize_url),
            ("token_url", &self.token_url),
            ("userinfo_url", &self.userinfo_url),
        ] {
            if let Some(url) = value {
                require_http_url(&format!("oauth.{provider}.{field}"), url)?;
            }
        }

        Ok(())
    }
}

impl OAuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        require_http_url("oauth.frontend_url", &self.frontend_url)?;

        if !self.failure_redirect.starts_with('/') && !is_http_url(&self.failure_redirect) {
            return Err(ConfigError::oauth(
                "oauth.failure_redirect must be a path or an http(s) URL",
            ));
        }

        self.google.validate("google")?;
        self.facebook.validate("facebook")?;

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

pub(crate) fn require_http_url(field: &str, value: &str) -> ConfigErrorResult<()> {
    if !is_http_url(value) {
        return Err(ConfigError::config(format!(
            "{field} must be an http(s) URL, got '{value}'"
        )));
    }
    Ok(())
}
