use crate::{OAuthProvider, User};

use googletest::prelude::*;

#[test]
fn given_local_user_when_to_identity_then_id_is_uuid_string() {
    let user = User::new(
        "ada@example.com".into(),
        Some("Ada".into()),
        "$2b$12$hash".into(),
    );

    let identity = user.to_identity();

    assert_that!(identity.id, eq(&user.id.to_string()));
    assert_that!(identity.email.as_str(), eq("ada@example.com"));
    assert_that!(identity.name, some(eq("Ada")));
    assert!(user.has_password());
}

#[test]
fn given_oauth_user_when_created_then_links_only_that_provider() {
    let user = User::from_oauth(
        OAuthProvider::Facebook,
        "fb-42".into(),
        "ada@example.com".into(),
        None,
        None,
    );

    assert_that!(user.provider_id(OAuthProvider::Facebook), some(eq("fb-42")));
    assert_that!(user.provider_id(OAuthProvider::Google), none());
    assert!(!user.has_password());
}

#[test]
fn given_user_when_serialized_then_password_hash_is_not_exposed() {
    let user = User::new("ada@example.com".into(), None, "$2b$12$hash".into());

    let json = serde_json::to_string(&user).unwrap();

    assert_that!(json, not(contains_substring("password_hash")));
    assert_that!(json, not(contains_substring("$2b$12$hash")));
}
