use crate::{Identity, OFFLINE_USER_ID};

use googletest::prelude::*;

#[test]
fn given_offline_identity_when_created_then_uses_sentinel_id() {
    let identity = Identity::offline("a@b.com");

    assert_that!(identity.id.as_str(), eq(OFFLINE_USER_ID));
    assert_that!(identity.email.as_str(), eq("a@b.com"));
    assert!(identity.is_offline_sentinel());
}

#[test]
fn given_identity_without_optional_fields_when_serialized_then_omits_them() {
    let identity = Identity::new("offline-user", "a@b.com");

    let json = serde_json::to_string(&identity).unwrap();

    assert_eq!(json, r#"{"id":"offline-user","email":"a@b.com"}"#);
}

#[test]
fn given_cached_json_without_optional_fields_when_deserialized_then_defaults_to_none() {
    let json = r#"{"id":"offline-user","email":"a@b.com"}"#;

    let identity: Identity = serde_json::from_str(json).unwrap();

    assert_that!(identity.name, none());
    assert_that!(identity.avatar_url, none());
    assert_eq!(identity, Identity::offline("a@b.com"));
}

#[test]
fn given_no_name_when_display_name_then_uses_email_local_part() {
    let identity = Identity::new("id-1", "traveler@example.com");

    assert_that!(identity.display_name(), eq("traveler"));
}

#[test]
fn given_name_when_display_name_then_uses_name() {
    let identity =
        Identity::new("id-1", "traveler@example.com").with_name(Some("Ada Lovelace".into()));

    assert_that!(identity.display_name(), eq("Ada Lovelace"));
}
