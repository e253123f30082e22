use crate::{ApiError, ApiResult, AppState, AuthUser};

use tp_core::Identity;

use axum::{Json, extract::State};

/// GET /api/user/me
///
/// Profile of the account the bearer token belongs to.
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Identity>> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", user_id)))?;

    Ok(Json(user.to_identity()))
}
