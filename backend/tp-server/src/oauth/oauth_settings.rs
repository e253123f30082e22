use crate::oauth::{OAuthClient, Result as OAuthResult};

use tp_config::OAuthConfig;
use tp_core::OAuthProvider;

use std::time::Duration;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the OAuth handlers need, built once at startup
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub frontend_url: String,
    pub failure_redirect: String,
    google: Option<OAuthClient>,
    facebook: Option<OAuthClient>,
}

impl OAuthSettings {
    pub fn from_config(config: &OAuthConfig) -> OAuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|e| crate::OAuthError::request("http client", e))?;

        Ok(Self {
            frontend_url: config.frontend_url.clone(),
            failure_redirect: config.failure_redirect.clone(),
            google: OAuthClient::from_config(OAuthProvider::Google, &config.google, http.clone())?,
            facebook: OAuthClient::from_config(OAuthProvider::Facebook, &config.facebook, http)?,
        })
    }

    pub fn client(&self, provider: OAuthProvider) -> Option<&OAuthClient> {
        match provider {
            OAuthProvider::Google => self.google.as_ref(),
            OAuthProvider::Facebook => self.facebook.as_ref(),
        }
    }

    pub fn configured_providers(&self) -> Vec<&'static str> {
        OAuthProvider::ALL
            .into_iter()
            .filter(|provider| self.client(*provider).is_some())
            .map(|provider| provider.as_str())
            .collect()
    }

    /// Landing page for a successful sign-in, carrying the minted token
    pub fn success_redirect(&self, token: &str) -> String {
        let separator = if self.frontend_url.contains('?') { '&' } else { '?' };
        format!("{}{}token={}", self.frontend_url, separator, token)
    }
}
