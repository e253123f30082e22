//! Adapter for the local auth service in this workspace.
//!
//! Tokens are stateless JWTs, so signing out only forgets the token.

use crate::backend::http::{callback_param, parse_json, send, send_for_body, trim_base_url};
use crate::backend::token_cache::TokenCache;
use crate::backend::{OAuthRedirect, RemoteAuthBackend, SignUpOutcome};
use crate::{Result as SessionResult, SessionError, SessionEvents, SessionSubscription};

use tp_core::{Credentials, Identity, OAuthProvider};

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

pub struct LegacyAuthBackend {
    base_url: String,
    client: Client,
    tokens: TokenCache,
    events: SessionEvents,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// `{token, userId}`; the id is re-read from `/api/user/me`
#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(default)]
    field: Option<String>,
}

impl LegacyAuthBackend {
    pub fn new(base_url: &str, tokens: TokenCache) -> Self {
        Self::with_client(base_url, tokens, Client::new())
    }

    pub fn with_client(base_url: &str, tokens: TokenCache, client: Client) -> Self {
        Self {
            base_url: trim_base_url(base_url),
            client,
            tokens,
            events: SessionEvents::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST credentials to signup/login and keep the returned token
    async fn exchange_credentials(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> SessionResult<Identity> {
        let email = credentials.validate()?;
        let body = CredentialsBody {
            email: &email,
            password: &credentials.password,
        };

        let request = self.client.post(self.url(path)).json(&body);
        let (status, body) = send_for_body(request).await?;
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        let TokenResponse { token } = parse_json(&body)?;
        let identity = self.fetch_identity(&token).await?.ok_or_else(|| {
            SessionError::unexpected("Token was rejected immediately after it was issued")
        })?;

        self.tokens.set(token);
        self.events.publish(Some(identity.clone()));
        Ok(identity)
    }

    /// `None` when the service no longer accepts the token
    async fn fetch_identity(&self, token: &str) -> SessionResult<Option<Identity>> {
        let request = self.client.get(self.url("/api/user/me")).bearer_auth(token);
        let (status, body) = send_for_body(request).await?;

        match status {
            s if s.is_success() => Ok(Some(parse_json(&body)?)),
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(None),
            _ => Err(error_from_response(status, &body)),
        }
    }
}

#[async_trait]
impl RemoteAuthBackend for LegacyAuthBackend {
    fn name(&self) -> &'static str {
        "legacy"
    }

    async fn probe(&self) -> SessionResult<()> {
        let response = send(self.client.get(self.url("/live"))).await?;
        if !response.status().is_success() {
            return Err(SessionError::connectivity(format!(
                "probe returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn current_session(&self) -> SessionResult<Option<Identity>> {
        let Some(token) = self.tokens.get() else {
            return Ok(None);
        };

        let identity = self.fetch_identity(&token).await?;
        if identity.is_none() {
            debug!("Cached token no longer accepted, discarding");
            self.tokens.clear();
        }
        Ok(identity)
    }

    async fn sign_up(&self, credentials: &Credentials) -> SessionResult<SignUpOutcome> {
        self.exchange_credentials("/api/auth/signup", credentials)
            .await
            .map(SignUpOutcome::signed_in)
    }

    async fn sign_in(&self, credentials: &Credentials) -> SessionResult<Identity> {
        self.exchange_credentials("/api/auth/login", credentials)
            .await
    }

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> SessionResult<OAuthRedirect> {
        Ok(OAuthRedirect {
            provider,
            url: self.url(&format!("/api/auth/{}", provider.as_str())),
        })
    }

    async fn complete_oauth(&self, callback_url: &str) -> SessionResult<Identity> {
        let Some(token) = callback_param(callback_url, "token")? else {
            return Err(SessionError::rejected(
                "OAUTH_FAILED",
                "Sign-in was cancelled or failed. Please try again.",
            ));
        };

        let identity = self.fetch_identity(&token).await?.ok_or_else(|| {
            SessionError::rejected("OAUTH_FAILED", "The sign-in link has expired.")
        })?;

        info!("Completed OAuth sign-in for {}", identity.id);
        self.tokens.set(token);
        self.events.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> SessionResult<()> {
        self.tokens.clear();
        self.events.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> SessionSubscription {
        self.events.subscribe()
    }
}

/// Map `{"error":{"code","message","field"}}` onto session errors
fn error_from_response(status: StatusCode, body: &str) -> SessionError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();

    match parsed {
        Some(ErrorEnvelope { error }) if status.is_client_error() => match error.code.as_str() {
            "DUPLICATE_ACCOUNT" => SessionError::duplicate_account(),
            "INVALID_CREDENTIALS" => SessionError::invalid_credentials(),
            "VALIDATION_ERROR" => SessionError::invalid_input(error.message, error.field.as_deref()),
            _ => SessionError::rejected(error.code, error.message),
        },
        Some(ErrorEnvelope { error }) => {
            SessionError::unexpected(format!("{status}: {} ({})", error.message, error.code))
        }
        None => SessionError::unexpected(format!("{status} with unrecognized body")),
    }
}
