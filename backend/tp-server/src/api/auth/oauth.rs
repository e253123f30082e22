//! OAuth sign-in endpoints
//!
//! `GET /api/auth/{provider}` starts the flow, `GET /api/auth/{provider}/callback`
//! finishes it. Any failure in the callback lands on the configured failure
//! redirect without a payload.

use crate::{ApiError, ApiResult, AppState, OAuthClient, OAuthError};

use tp_core::OAuthProvider;

use std::panic::Location;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use error_location::ErrorLocation;
use log::{info, warn};
use rand::Rng;
use serde::Deserialize;
use time::Duration;

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_COOKIE_PATH: &str = "/api/auth";
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declines consent
    pub error: Option<String>,
}

/// GET /api/auth/{provider}
pub async fn oauth_start(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> ApiResult<Response> {
    let provider = parse_provider(&provider)?;
    let client = state
        .oauth
        .client(provider)
        .ok_or_else(|| ApiError::ProviderNotConfigured {
            provider,
            location: ErrorLocation::from(Location::caller()),
        })?;

    let oauth_state = generate_state();
    let mut cookie = state_cookie(client, oauth_state.clone());
    cookie.set_max_age(Duration::minutes(OAUTH_STATE_TTL_MINUTES));

    Ok((
        jar.add(cookie),
        Redirect::to(client.authorize_url(&oauth_state).as_str()),
    )
        .into_response())
}

/// GET /api/auth/{provider}/callback
pub async fn oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> ApiResult<Response> {
    let provider = parse_provider(&provider)?;

    let Some(client) = state.oauth.client(provider) else {
        warn!("{} callback received but the provider is not configured", provider);
        return Ok(Redirect::to(&state.oauth.failure_redirect).into_response());
    };

    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    // The state cookie is single-use whatever the outcome
    let jar = jar.remove(state_cookie(client, String::new()));

    let target = match finish_sign_in(&state, client, expected_state.as_deref(), params).await {
        Ok(token) => state.oauth.success_redirect(&token),
        Err(e) => {
            warn!("{} sign-in failed: {}", provider, e);
            state.oauth.failure_redirect.clone()
        }
    };

    Ok((jar, Redirect::to(&target)).into_response())
}

async fn finish_sign_in(
    state: &AppState,
    client: &OAuthClient,
    expected_state: Option<&str>,
    params: CallbackQuery,
) -> Result<String, CallbackFailure> {
    if let Some(reason) = params.error {
        return Err(OAuthError::denied(reason).into());
    }

    match (expected_state, params.state.as_deref()) {
        (Some(expected), Some(received)) if !expected.is_empty() && expected == received => {}
        _ => return Err(OAuthError::state_mismatch().into()),
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| OAuthError::denied("callback carried no authorization code"))?;

    let access_token = client.exchange_code(&code).await?;
    let profile = client.fetch_profile(&access_token).await?;
    let user = state.users.upsert_oauth(&profile).await.map_err(ApiError::from)?;

    let token = state
        .issuer
        .issue(&user.id.to_string())
        .map_err(ApiError::from)?;
    info!("User {} signed in with {}", user.id, client.provider());

    Ok(token)
}

/// Why a callback was sent to the failure redirect
#[derive(Debug, thiserror::Error)]
enum CallbackFailure {
    #[error(transparent)]
    OAuth(#[from] OAuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn parse_provider(raw: &str) -> ApiResult<OAuthProvider> {
    raw.parse::<OAuthProvider>()
        .map_err(|_| ApiError::not_found(format!("Unknown sign-in provider '{}'", raw)))
}

fn state_cookie(client: &OAuthClient, value: String) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, value))
        .path(OAUTH_STATE_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(client.redirects_over_https())
        .build()
}

fn generate_state() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
