use crate::{CoreError, Credentials, normalize_email};

use googletest::prelude::*;

#[test]
fn given_mixed_case_email_with_spaces_when_normalized_then_lowercased_and_trimmed() {
    assert_that!(
        normalize_email("  Ada@Example.COM "),
        some(eq("ada@example.com"))
    );
}

#[test]
fn given_malformed_emails_when_normalized_then_none() {
    for email in ["", "no-at-sign", "@example.com", "ada@", "a@b@c"] {
        assert!(normalize_email(email).is_none(), "{email} should be rejected");
    }
}

#[test]
fn given_valid_credentials_when_validated_then_returns_normalized_email() {
    let credentials = Credentials::new("Ada@Example.com", "hunter2");

    let result = credentials.validate();

    assert_that!(result, ok(eq("ada@example.com")));
}

#[test]
fn given_empty_password_when_validated_then_error_names_password_field() {
    let credentials = Credentials::new("ada@example.com", "");

    let result = credentials.validate();

    match result {
        Err(CoreError::Validation { field, .. }) => {
            assert_eq!(field.as_deref(), Some("password"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn given_credentials_when_debug_formatted_then_password_is_redacted() {
    let credentials = Credentials::new("ada@example.com", "super-secret");

    let debug = format!("{credentials:?}");

    assert_that!(debug, contains_substring("ada@example.com"));
    assert_that!(debug, not(contains_substring("super-secret")));
}
