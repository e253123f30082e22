//! Integration tests for the email/password and profile endpoints
mod common;

use crate::common::{
    create_test_app_state, get, get_with_bearer, post_json, send, sign_up,
};

use axum::{body::Body, http::Request, http::StatusCode};
use googletest::prelude::*;
use serde_json::json;
use uuid::Uuid;

use tp_server::build_router;

#[tokio::test]
async fn given_new_email_when_signing_up_then_201_with_token_and_user_id() {
    // Given
    let state = create_test_app_state().await;

    // When
    let response = send(
        build_router(state.clone()),
        post_json(
            "/api/auth/signup",
            json!({ "name": "Ada", "email": "ada@example.com", "password": "hunter22" }),
        ),
    )
    .await;

    // Then
    assert_that!(response.status, eq(StatusCode::CREATED));
    let user_id = response.json["userId"].as_str().unwrap();
    let token = response.json["token"].as_str().unwrap();
    let claims = state.validator.validate(token).unwrap();
    assert_that!(claims.user_id, eq(user_id));
    assert_that!(state.users.count().await.unwrap(), eq(1));
}

#[tokio::test]
async fn given_signed_up_user_when_logging_in_then_same_user_id_is_returned() {
    // Given
    let state = create_test_app_state().await;
    let (_, signup_id) = sign_up(&state, "ada@example.com", "hunter22").await;

    // When
    let response = send(
        build_router(state.clone()),
        post_json(
            "/api/auth/login",
            json!({ "email": "ada@example.com", "password": "hunter22" }),
        ),
    )
    .await;

    // Then
    assert_that!(response.status, eq(StatusCode::OK));
    assert_that!(response.json["userId"].as_str(), some(eq(signup_id.as_str())));
}

#[tokio::test]
async fn given_existing_email_when_signing_up_again_then_duplicate_account_and_no_new_record() {
    // Given
    let state = create_test_app_state().await;
    sign_up(&state, "ada@example.com", "hunter22").await;

    // When (same address, different case and padding)
    let response = send(
        build_router(state.clone()),
        post_json(
            "/api/auth/signup",
            json!({ "email": "  ADA@example.com ", "password": "other-password" }),
        ),
    )
    .await;

    // Then
    assert_that!(response.status, eq(StatusCode::BAD_REQUEST));
    assert_that!(response.json["error"]["code"], eq(&json!("DUPLICATE_ACCOUNT")));
    assert_that!(state.users.count().await.unwrap(), eq(1));
}

#[tokio::test]
async fn given_malformed_email_when_signing_up_then_validation_error_on_email() {
    // Given
    let state = create_test_app_state().await;

    // When
    let response = send(
        build_router(state.clone()),
        post_json(
            "/api/auth/signup",
            json!({ "email": "not-an-email", "password": "hunter22" }),
        ),
    )
    .await;

    // Then
    assert_that!(response.status, eq(StatusCode::BAD_REQUEST));
    assert_that!(response.json["error"]["code"], eq(&json!("VALIDATION_ERROR")));
    assert_that!(response.json["error"]["field"], eq(&json!("email")));
    assert_that!(state.users.count().await.unwrap(), eq(0));
}

#[tokio::test]
async fn given_unparseable_body_when_signing_up_then_validation_error() {
    // Given
    let state = create_test_app_state().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();

    // When
    let response = send(build_router(state), request).await;

    // Then
    assert_that!(response.status, eq(StatusCode::BAD_REQUEST));
    assert_that!(response.json["error"]["code"], eq(&json!("VALIDATION_ERROR")));
}

#[tokio::test]
async fn given_wrong_password_when_logging_in_then_invalid_credentials() {
    // Given
    let state = create_test_app_state().await;
    sign_up(&state, "ada@example.com", "hunter22").await;

    // When
    let response = send(
        build_router(state),
        post_json(
            "/api/auth/login",
            json!({ "email": "ada@example.com", "password": "wrong" }),
        ),
    )
    .await;

    // Then
    assert_that!(response.status, eq(StatusCode::BAD_REQUEST));
    assert_that!(response.json["error"]["code"], eq(&json!("INVALID_CREDENTIALS")));
}

#[tokio::test]
async fn given_unknown_email_when_logging_in_then_invalid_credentials() {
    // Given
    let state = create_test_app_state().await;

    // When
    let response = send(
        build_router(state),
        post_json(
            "/api/auth/login",
            json!({ "email": "nobody@example.com", "password": "hunter22" }),
        ),
    )
    .await;

    // Then
    assert_that!(response.status, eq(StatusCode::BAD_REQUEST));
    assert_that!(response.json["error"]["code"], eq(&json!("INVALID_CREDENTIALS")));
}

#[tokio::test]
async fn given_login_token_when_decoded_then_valid_for_one_hour_and_expired_after() {
    // Given
    let state = create_test_app_state().await;
    let (_, user_id) = sign_up(&state, "ada@example.com", "hunter22").await;
    let response = send(
        build_router(state.clone()),
        post_json(
            "/api/auth/login",
            json!({ "email": "ada@example.com", "password": "hunter22" }),
        ),
    )
    .await;
    let token = response.json["token"].as_str().unwrap();

    // When
    let claims = state.validator.validate(token).unwrap();
    let hour_old = state
        .issuer
        .issue_at(&user_id, chrono::Utc::now().timestamp() - 3601)
        .unwrap();
    let expired = send(
        build_router(state.clone()),
        get_with_bearer("/api/user/me", &hour_old),
    )
    .await;

    // Then
    assert_that!(claims.user_id, eq(&user_id));
    assert_that!(claims.exp - claims.iat, eq(3600));
    assert_that!(expired.status, eq(StatusCode::UNAUTHORIZED));
    assert_that!(expired.json["error"]["code"], eq(&json!("TOKEN_EXPIRED")));
}

#[tokio::test]
async fn given_valid_token_when_fetching_me_then_identity_is_returned() {
    // Given
    let state = create_test_app_state().await;
    let (token, user_id) = sign_up(&state, "ada@example.com", "hunter22").await;

    // When
    let response = send(build_router(state), get_with_bearer("/api/user/me", &token)).await;

    // Then
    assert_that!(response.status, eq(StatusCode::OK));
    assert_that!(response.json["id"].as_str(), some(eq(user_id.as_str())));
    assert_that!(response.json["email"].as_str(), some(eq("ada@example.com")));
    assert_that!(response.json["name"].as_str(), some(eq("Test User")));
}

#[tokio::test]
async fn given_no_token_when_fetching_me_then_401() {
    // Given
    let state = create_test_app_state().await;

    // When
    let response = send(build_router(state), get("/api/user/me")).await;

    // Then
    assert_that!(response.status, eq(StatusCode::UNAUTHORIZED));
    assert_that!(response.json["error"]["code"], eq(&json!("UNAUTHORIZED")));
}

#[tokio::test]
async fn given_garbage_token_when_fetching_me_then_401() {
    // Given
    let state = create_test_app_state().await;

    // When
    let response = send(
        build_router(state),
        get_with_bearer("/api/user/me", "not.a.jwt"),
    )
    .await;

    // Then
    assert_that!(response.status, eq(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn given_token_for_missing_user_when_fetching_me_then_404() {
    // Given
    let state = create_test_app_state().await;
    let token = state.issuer.issue(&Uuid::new_v4().to_string()).unwrap();

    // When
    let response = send(build_router(state), get_with_bearer("/api/user/me", &token)).await;

    // Then
    assert_that!(response.status, eq(StatusCode::NOT_FOUND));
    assert_that!(response.json["error"]["code"], eq(&json!("NOT_FOUND")));
}
