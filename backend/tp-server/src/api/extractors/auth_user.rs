//! Axum extractors for REST API authentication

use crate::{ApiError, ApiResult, AppState};

use std::future::{Future, ready};
use std::panic::Location;

use axum::{extract::FromRequestParts, http::request::Parts};
use error_location::ErrorLocation;
use http::header::AUTHORIZATION;
use uuid::Uuid;

/// The account a valid `Authorization: Bearer` token was minted for.
///
/// Rejects with 401 when the header is missing, the token does not verify,
/// or it has expired.
pub struct AuthUser(pub Uuid);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        // Signature check only; nothing to await
        ready(authenticate(parts, state))
    }
}

fn authenticate(parts: &Parts, state: &AppState) -> ApiResult<AuthUser> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = tp_auth::bearer_token(header)?;
    let claims = state.validator.validate(token)?;

    let user_id = Uuid::parse_str(&claims.user_id).map_err(|e| {
        log::warn!("Token carries a non-UUID userId: {}", e);
        ApiError::Unauthorized {
            code: "UNAUTHORIZED",
            message: "Invalid token subject".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    Ok(AuthUser(user_id))
}
