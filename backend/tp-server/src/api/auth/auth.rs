//! Email/password account endpoints

use crate::{ApiError, ApiResult, AppState, LoginRequest, SignupRequest, TokenResponse};

use tp_core::{Credentials, User};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use log::info;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let Json(request) = payload?;

    let email = Credentials::new(&request.email, &request.password).validate()?;
    let name = request
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::duplicate_account());
    }

    let hasher = state.hasher;
    let password = request.password;
    let password_hash = run_blocking(move || hasher.hash(&password)).await??;

    // A concurrent sign-up can still win the race; the unique index turns
    // that into DUPLICATE_ACCOUNT through From<DbError>.
    let user = User::new(email, name, password_hash);
    state.users.create(&user).await?;

    let user_id = user.id.to_string();
    let token = state.issuer.issue(&user_id)?;
    info!("Created account {}", user_id);

    Ok((StatusCode::CREATED, Json(TokenResponse { token, user_id })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(request) = payload?;

    // Malformed input cannot match an account
    let Ok(email) = Credentials::new(&request.email, &request.password).validate() else {
        return Err(ApiError::invalid_credentials());
    };

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(ApiError::invalid_credentials)?;

    // OAuth-only accounts have no password to check
    let Some(password_hash) = user.password_hash.clone() else {
        return Err(ApiError::invalid_credentials());
    };

    let hasher = state.hasher;
    let password = request.password;
    let matches = run_blocking(move || hasher.verify(&password, &password_hash)).await??;
    if !matches {
        return Err(ApiError::invalid_credentials());
    }

    let user_id = user.id.to_string();
    let token = state.issuer.issue(&user_id)?;
    info!("User {} logged in", user_id);

    Ok(Json(TokenResponse { token, user_id }))
}

/// Run CPU-bound work (bcrypt) off the async workers
async fn run_blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::internal(format!("Blocking task failed: {}", e)))
}
