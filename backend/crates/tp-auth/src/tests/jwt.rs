use crate::{AuthError, Claims, JwtIssuer, JwtValidator};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

fn create_test_token(claims: &Claims, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

#[test]
fn given_issued_token_when_validated_then_returns_user_id() {
    let issuer = JwtIssuer::with_hs256(SECRET);
    let validator = JwtValidator::with_hs256(SECRET);

    let token = issuer.issue("user-123").unwrap();
    let claims = validator.validate(&token).unwrap();

    assert_eq!(claims.user_id, "user-123");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn given_token_issued_59_minutes_ago_when_validated_then_still_valid() {
    let issuer = JwtIssuer::with_hs256(SECRET);
    let validator = JwtValidator::with_hs256(SECRET);
    let issued_at = chrono::Utc::now().timestamp() - 59 * 60;

    let token = issuer.issue_at("user-123", issued_at).unwrap();

    assert!(validator.validate(&token).is_ok());
}

#[test]
fn given_token_older_than_one_hour_when_validated_then_returns_token_expired_error() {
    let issuer = JwtIssuer::with_hs256(SECRET);
    let validator = JwtValidator::with_hs256(SECRET);
    let issued_at = chrono::Utc::now().timestamp() - 3601;

    let token = issuer.issue_at("user-123", issued_at).unwrap();
    let result = validator.validate(&token);

    assert!(matches!(result, Err(AuthError::TokenExpired { .. })));
}

#[test]
fn given_wrong_secret_when_validated_then_returns_decode_error() {
    let wrong_secret = b"wrong-secret-key-at-least-32-by";
    let validator = JwtValidator::with_hs256(wrong_secret);
    let token = JwtIssuer::with_hs256(SECRET).issue("user-123").unwrap();

    let result = validator.validate(&token);

    assert!(matches!(result, Err(AuthError::JwtDecode { .. })));
}

#[test]
fn given_token_with_empty_user_id_when_validated_then_returns_invalid_claim() {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        user_id: String::new(),
        iat: now,
        exp: now + 3600,
    };
    let token = create_test_token(&claims, SECRET);

    let result = JwtValidator::with_hs256(SECRET).validate(&token);

    assert!(matches!(
        result,
        Err(AuthError::InvalidClaim { ref claim, .. }) if claim == "userId"
    ));
}

#[test]
fn given_claims_when_serialized_then_uses_user_id_camel_case() {
    let claims = Claims::new("abc", 100, 3600);

    let token = create_test_token(&claims, SECRET);
    let payload = token.split('.').nth(1).unwrap();

    // base64url of `{"userId"` is stable regardless of the remaining fields
    assert!(payload.starts_with("eyJ1c2VySWQi"));
}

#[test]
fn given_custom_ttl_when_issued_then_expiry_matches() {
    let issuer = JwtIssuer::with_hs256(SECRET).with_ttl_secs(60);

    let token = issuer.issue("user-123").unwrap();
    let claims = JwtValidator::with_hs256(SECRET).validate(&token).unwrap();

    assert_eq!(claims.exp - claims.iat, 60);
}
