use crate::AuthConfig;

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, ok};

const GOOD_SECRET: &str = "0123456789abcdef0123456789abcdef";

#[test]
fn given_defaults_when_validate_then_ok() {
    // Given
    let config = AuthConfig::default();

    // When
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
fn given_short_secret_when_validate_then_error() {
    // Given
    let config = AuthConfig {
        jwt_secret: Some(String::from("too-short")),
        ..AuthConfig::default()
    };

    // When
    let result = config.validate();

    // Then
    assert_that!(
        result.unwrap_err().to_string(),
        contains_substring("at least 32")
    );
}

#[test]
fn given_32_char_secret_when_validate_then_ok() {
    // Given
    let config = AuthConfig {
        jwt_secret: Some(String::from(GOOD_SECRET)),
        ..AuthConfig::default()
    };

    // When
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
fn given_zero_ttl_when_validate_then_error() {
    // Given
    let config = AuthConfig {
        token_ttl_secs: 0,
        ..AuthConfig::default()
    };

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_ttl_above_one_day_when_validate_then_error() {
    // Given
    let config = AuthConfig {
        token_ttl_secs: 86_401,
        ..AuthConfig::default()
    };

    // When
    let result = config.validate();

    // Then
    assert_that!(
        result.unwrap_err().to_string(),
        contains_substring("token_ttl_secs")
    );
}

#[test]
fn given_bcrypt_cost_out_of_range_when_validate_then_error() {
    for cost in [3, 32] {
        // Given
        let config = AuthConfig {
            bcrypt_cost: cost,
            ..AuthConfig::default()
        };

        // When
        let result = config.validate();

        // Then
        assert_that!(result, err(anything()));
    }
}

#[test]
fn given_no_secret_when_require_jwt_secret_then_error() {
    // Given
    let config = AuthConfig::default();

    // When
    let result = config.require_jwt_secret();

    // Then
    assert_that!(
        result.unwrap_err().to_string(),
        contains_substring("TP_AUTH_JWT_SECRET")
    );
}

#[test]
fn given_secret_when_require_jwt_secret_then_returns_it() {
    // Given
    let config = AuthConfig {
        jwt_secret: Some(String::from(GOOD_SECRET)),
        ..AuthConfig::default()
    };

    // When
    let result = config.require_jwt_secret();

    // Then
    assert_that!(result.unwrap(), eq(GOOD_SECRET));
}
