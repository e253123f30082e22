use crate::ApiError;

use tp_auth::AuthError;
use tp_core::{CoreError, OAuthProvider};
use tp_db::DbError;

use std::panic::Location;

use axum::response::IntoResponse;
use error_location::ErrorLocation;
use http::StatusCode;
use http_body_util::BodyExt;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_duplicate_account_returns_400_with_email_field() {
    let (status, json) = body_json(ApiError::duplicate_account()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "DUPLICATE_ACCOUNT");
    assert_eq!(json["error"]["field"], "email");
}

#[tokio::test]
async fn test_invalid_credentials_returns_400_without_field() {
    let (status, json) = body_json(ApiError::invalid_credentials()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_CREDENTIALS");
    assert!(json["error"].get("field").is_none());
}

#[tokio::test]
async fn test_validation_error_returns_400_with_field() {
    let error = ApiError::Validation {
        message: "password cannot be empty".into(),
        field: Some("password".into()),
        location: ErrorLocation::from(Location::caller()),
    };
    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "password");
}

#[tokio::test]
async fn test_not_found_returns_404_with_json_body() {
    let (status, json) = body_json(ApiError::not_found("User gone")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "User gone");
}

#[tokio::test]
async fn test_provider_not_configured_returns_503() {
    let error = ApiError::ProviderNotConfigured {
        provider: OAuthProvider::Facebook,
        location: ErrorLocation::from(Location::caller()),
    };
    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"]["code"], "PROVIDER_NOT_CONFIGURED");
    assert!(json["error"]["message"].as_str().unwrap().contains("Facebook"));
}

#[tokio::test]
async fn test_internal_error_returns_500() {
    let (status, json) = body_json(ApiError::internal("Database connection failed")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
}

#[test]
fn test_duplicate_email_converts_to_duplicate_account() {
    let db_err = DbError::Duplicate {
        field: "email".into(),
        location: ErrorLocation::from(Location::caller()),
    };
    let api_err: ApiError = db_err.into();

    assert!(matches!(api_err, ApiError::DuplicateAccount { .. }));
}

#[test]
fn test_other_db_errors_convert_to_internal_without_details() {
    let db_err = DbError::Initialization {
        message: "disk on fire".into(),
        location: ErrorLocation::from(Location::caller()),
    };
    let api_err: ApiError = db_err.into();

    match api_err {
        ApiError::Internal { message, .. } => assert!(!message.contains("disk")),
        other => panic!("Expected Internal error, got {other:?}"),
    }
}

#[test]
fn test_expired_token_converts_to_401_token_expired() {
    let api_err: ApiError = AuthError::TokenExpired {
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    assert_eq!(api_err.status(), StatusCode::UNAUTHORIZED);
    match api_err {
        ApiError::Unauthorized { code, .. } => assert_eq!(code, "TOKEN_EXPIRED"),
        other => panic!("Expected Unauthorized error, got {other:?}"),
    }
}

#[test]
fn test_missing_header_converts_to_401_unauthorized() {
    let api_err: ApiError = AuthError::MissingHeader {
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    match api_err {
        ApiError::Unauthorized { code, .. } => assert_eq!(code, "UNAUTHORIZED"),
        other => panic!("Expected Unauthorized error, got {other:?}"),
    }
}

#[test]
fn test_core_validation_keeps_field() {
    let core_err = CoreError::Validation {
        message: "email must look like name@domain".into(),
        field: Some("email".into()),
        location: ErrorLocation::from(Location::caller()),
    };
    let api_err: ApiError = core_err.into();

    match api_err {
        ApiError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("email")),
        other => panic!("Expected Validation error, got {other:?}"),
    }
}
