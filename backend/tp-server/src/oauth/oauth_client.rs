use crate::oauth::provider_endpoints::parse_url;
use crate::oauth::{OAuthError, ProviderEndpoints, Result as OAuthResult};

use tp_config::OAuthClientConfig;
use tp_core::{OAuthProvider, normalize_email};
use tp_db::OAuthProfile;

use std::panic::Location;

use error_location::ErrorLocation;
use log::debug;
use serde::Deserialize;
use url::Url;

const FACEBOOK_PROFILE_FIELDS: &str = "id,name,email,picture";

/// One registered client with one provider
#[derive(Clone)]
pub struct OAuthClient {
    provider: OAuthProvider,
    client_id: String,
    client_secret: String,
    redirect_uri: Url,
    endpoints: ProviderEndpoints,
    http: reqwest::Client,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri.as_str())
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct GoogleProfile {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Deserialize)]
struct FacebookProfile {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<FacebookPicture>,
}

#[derive(Deserialize)]
struct FacebookPicture {
    data: FacebookPictureData,
}

#[derive(Deserialize)]
struct FacebookPictureData {
    url: Option<String>,
}

impl OAuthClient {
    /// Build a client from a configured provider section.
    ///
    /// Returns `Ok(None)` when the section has no client id.
    pub fn from_config(
        provider: OAuthProvider,
        config: &OAuthClientConfig,
        http: reqwest::Client,
    ) -> OAuthResult<Option<Self>> {
        if !config.is_configured() {
            return Ok(None);
        }

        let client_id = config.client_id.clone().unwrap_or_default();
        let client_secret = config
            .client_secret
            .clone()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| incomplete(provider, "client_secret is missing"))?;
        let redirect_uri = config
            .redirect_uri
            .as_deref()
            .ok_or_else(|| incomplete(provider, "redirect_uri is missing"))?;

        Ok(Some(Self {
            provider,
            client_id,
            client_secret,
            redirect_uri: parse_url("redirect_uri", redirect_uri)?,
            endpoints: ProviderEndpoints::resolve(provider, config)?,
            http,
        }))
    }

    pub fn provider(&self) -> OAuthProvider {
        self.provider
    }

    pub fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }

    /// Whether the callback is served over https, so cookies can be marked secure
    pub fn redirects_over_https(&self) -> bool {
        self.redirect_uri.scheme() == "https"
    }

    /// Provider consent page for this client, carrying `state`
    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.endpoints.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", self.redirect_uri.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", self.endpoints.scope)
            .append_pair("state", state);
        url
    }

    /// Trade an authorization code for the provider's access token
    pub async fn exchange_code(&self, code: &str) -> OAuthResult<String> {
        let response = self
            .http
            .post(self.endpoints.token_url.clone())
            .header(http::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::request("token endpoint", e))?;

        let token: TokenResponse = read_json("token endpoint", response).await?;
        debug!("Exchanged {} authorization code", self.provider);
        Ok(token.access_token)
    }

    /// Read the signed-in user's profile with a fresh access token
    pub async fn fetch_profile(&self, access_token: &str) -> OAuthResult<OAuthProfile> {
        let mut url = self.endpoints.userinfo_url.clone();
        if self.provider == OAuthProvider::Facebook {
            url.query_pairs_mut()
                .append_pair("fields", FACEBOOK_PROFILE_FIELDS);
        }

        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuthError::request("userinfo endpoint", e))?;

        let (subject, email, name, avatar_url) = match self.provider {
            OAuthProvider::Google => {
                let profile: GoogleProfile = read_json("userinfo endpoint", response).await?;
                (profile.sub, profile.email, profile.name, profile.picture)
            }
            OAuthProvider::Facebook => {
                let profile: FacebookProfile = read_json("userinfo endpoint", response).await?;
                let avatar_url = profile.picture.and_then(|picture| picture.data.url);
                (profile.id, profile.email, profile.name, avatar_url)
            }
        };

        let email = email
            .as_deref()
            .and_then(normalize_email)
            .ok_or_else(|| OAuthError::MissingEmail {
                provider: self.provider,
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(OAuthProfile {
            provider: self.provider,
            subject,
            email,
            name,
            avatar_url,
        })
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> OAuthResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(OAuthError::Status {
            endpoint,
            status: status.as_u16(),
            body,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    response
        .json()
        .await
        .map_err(|e| OAuthError::request(endpoint, e))
}

#[track_caller]
fn incomplete(provider: OAuthProvider, message: &str) -> OAuthError {
    OAuthError::Incomplete {
        provider,
        message: message.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
