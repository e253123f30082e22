//! Adapter for a hosted GoTrue-compatible auth service.
//!
//! The session (access + refresh token) is kept in a [`TokenCache`] as a
//! small JSON document.

use crate::backend::http::{callback_param, parse_json, send, send_for_body, trim_base_url};
use crate::backend::token_cache::TokenCache;
use crate::backend::{OAuthRedirect, RemoteAuthBackend, SignUpOutcome};
use crate::{Result as SessionResult, SessionError, SessionEvents, SessionSubscription};

use tp_core::{Credentials, Identity, OAuthProvider};

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

const API_KEY_HEADER: &str = "apikey";

pub struct HostedAuthBackend {
    base_url: String,
    api_key: String,
    redirect_to: Option<String>,
    client: Client,
    tokens: TokenCache,
    events: SessionEvents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: HostedUser,
}

/// With email confirmation enabled, signup answers with the bare user and
/// no session.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(HostedUser),
}

#[derive(Deserialize)]
struct HostedUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Map<String, Value>,
}

impl HostedUser {
    fn into_identity(self) -> Identity {
        let metadata_str = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| self.user_metadata.get(*key).and_then(Value::as_str))
                .map(String::from)
        };
        let name = metadata_str(&["full_name", "name"]);
        let avatar_url = metadata_str(&["avatar_url", "picture"]);

        Identity::new(self.id, self.email.unwrap_or_default())
            .with_name(name)
            .with_avatar_url(avatar_url)
    }
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

impl HostedAuthBackend {
    pub fn new(base_url: &str, api_key: &str, tokens: TokenCache) -> Self {
        Self::with_client(base_url, api_key, tokens, Client::new())
    }

    pub fn with_client(base_url: &str, api_key: &str, tokens: TokenCache, client: Client) -> Self {
        Self {
            base_url: trim_base_url(base_url),
            api_key: api_key.to_string(),
            redirect_to: None,
            client,
            tokens,
            events: SessionEvents::new(),
        }
    }

    /// Where the provider sends the browser once OAuth completes
    pub fn with_redirect_to(mut self, redirect_to: Option<String>) -> Self {
        self.redirect_to = redirect_to;
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/auth/v1{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    fn stored_session(&self) -> Option<StoredSession> {
        let raw = self.tokens.get()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding unreadable cached session: {e}");
                self.tokens.clear();
                None
            }
        }
    }

    fn store_session(&self, access_token: String, refresh_token: Option<String>) {
        let session = StoredSession {
            access_token,
            refresh_token,
        };
        match serde_json::to_string(&session) {
            Ok(raw) => self.tokens.set(raw),
            Err(e) => warn!("Could not serialize session: {e}"),
        }
    }

    /// Keep the session from a token grant and announce the identity
    fn accept_tokens(&self, response: TokenResponse) -> Identity {
        let identity = response.user.into_identity();
        self.store_session(response.access_token, response.refresh_token);
        self.events.publish(Some(identity.clone()));
        identity
    }

    /// `None` when the access token is no longer accepted
    async fn fetch_user(&self, access_token: &str) -> SessionResult<Option<Identity>> {
        let request = self
            .request(reqwest::Method::GET, "/user")
            .bearer_auth(access_token);
        let (status, body) = send_for_body(request).await?;

        match status {
            s if s.is_success() => Ok(Some(parse_json::<HostedUser>(&body)?.into_identity())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Err(error_from_response(status, &body)),
        }
    }

    /// Trade the stored refresh token for a new session.
    ///
    /// Returns `None` if there is nothing to refresh. Subscribers see the
    /// refreshed identity.
    pub async fn refresh(&self) -> SessionResult<Option<Identity>> {
        let Some(refresh_token) = self.stored_session().and_then(|s| s.refresh_token) else {
            return Ok(None);
        };

        let request = self
            .request(reqwest::Method::POST, "/token")
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshBody {
                refresh_token: &refresh_token,
            });
        let (status, body) = send_for_body(request).await?;
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        debug!("Refreshed hosted session");
        Ok(Some(self.accept_tokens(parse_json(&body)?)))
    }
}

#[async_trait]
impl RemoteAuthBackend for HostedAuthBackend {
    fn name(&self) -> &'static str {
        "hosted"
    }

    async fn probe(&self) -> SessionResult<()> {
        let response = send(self.request(reqwest::Method::GET, "/health")).await?;
        if !response.status().is_success() {
            return Err(SessionError::connectivity(format!(
                "probe returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn current_session(&self) -> SessionResult<Option<Identity>> {
        let Some(session) = self.stored_session() else {
            return Ok(None);
        };

        if let Some(identity) = self.fetch_user(&session.access_token).await? {
            return Ok(Some(identity));
        }

        debug!("Access token expired, attempting refresh");
        match self.refresh().await {
            Ok(identity @ Some(_)) => Ok(identity),
            Ok(None) => {
                self.tokens.clear();
                Ok(None)
            }
            Err(e) if e.is_connectivity() => Err(e),
            Err(e) => {
                info!("Refresh rejected, discarding session: {e}");
                self.tokens.clear();
                Ok(None)
            }
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> SessionResult<SignUpOutcome> {
        let email = credentials.validate()?;
        let request = self
            .request(reqwest::Method::POST, "/signup")
            .json(&CredentialsBody {
                email: &email,
                password: &credentials.password,
            });
        let (status, body) = send_for_body(request).await?;
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        match parse_json(&body)? {
            SignUpResponse::Session(tokens) => {
                Ok(SignUpOutcome::signed_in(self.accept_tokens(tokens)))
            }
            SignUpResponse::User(user) => {
                info!("Account created, awaiting email confirmation");
                Ok(SignUpOutcome::awaiting_confirmation(user.into_identity()))
            }
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> SessionResult<Identity> {
        let email = credentials.validate()?;
        let request = self
            .request(reqwest::Method::POST, "/token")
            .query(&[("grant_type", "password")])
            .json(&CredentialsBody {
                email: &email,
                password: &credentials.password,
            });
        let (status, body) = send_for_body(request).await?;
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        Ok(self.accept_tokens(parse_json(&body)?))
    }

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> SessionResult<OAuthRedirect> {
        let mut url = Url::parse(&format!("{}/auth/v1/authorize", self.base_url))
            .map_err(|e| SessionError::unexpected(format!("Invalid backend URL: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("provider", provider.as_str());
            if let Some(ref redirect_to) = self.redirect_to {
                query.append_pair("redirect_to", redirect_to);
            }
        }

        Ok(OAuthRedirect {
            provider,
            url: url.into(),
        })
    }

    async fn complete_oauth(&self, callback_url: &str) -> SessionResult<Identity> {
        if let Some(description) = callback_param(callback_url, "error_description")? {
            return Err(SessionError::rejected("OAUTH_FAILED", description));
        }

        let Some(access_token) = callback_param(callback_url, "access_token")? else {
            return Err(SessionError::rejected(
                "OAUTH_FAILED",
                "Sign-in was cancelled or failed. Please try again.",
            ));
        };
        let refresh_token = callback_param(callback_url, "refresh_token")?;

        let identity = self.fetch_user(&access_token).await?.ok_or_else(|| {
            SessionError::rejected("OAUTH_FAILED", "The sign-in link has expired.")
        })?;

        info!("Completed OAuth sign-in for {}", identity.id);
        self.store_session(access_token, refresh_token);
        self.events.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> SessionResult<()> {
        let result = match self.stored_session() {
            Some(session) => {
                let request = self
                    .request(reqwest::Method::POST, "/logout")
                    .bearer_auth(&session.access_token);
                match send_for_body(request).await {
                    Ok((status, _)) if status.is_success() || status == StatusCode::UNAUTHORIZED => {
                        Ok(())
                    }
                    Ok((status, body)) => Err(error_from_response(status, &body)),
                    Err(e) => Err(e),
                }
            }
            None => Ok(()),
        };

        self.tokens.clear();
        self.events.publish(None);
        result
    }

    fn subscribe(&self) -> SessionSubscription {
        self.events.subscribe()
    }
}

/// GoTrue reports errors in a few shapes:
/// `{"error_code","msg"}`, `{"error","error_description"}`, `{"code","message"}`.
fn error_from_response(status: StatusCode, body: &str) -> SessionError {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let field = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);

    let code = field("error_code").or_else(|| field("error"));
    let message = field("msg")
        .or_else(|| field("error_description"))
        .or_else(|| field("message"))
        .unwrap_or_else(|| status.to_string());

    if !status.is_client_error() {
        return SessionError::unexpected(format!("{status}: {message}"));
    }

    match code.as_deref() {
        Some("user_already_exists" | "email_exists") => SessionError::duplicate_account(),
        Some("invalid_credentials" | "invalid_grant") => SessionError::invalid_credentials(),
        _ if message.to_ascii_lowercase().contains("already registered") => {
            SessionError::duplicate_account()
        }
        Some(code) => SessionError::rejected(code, message),
        None => SessionError::rejected("REJECTED", message),
    }
}
