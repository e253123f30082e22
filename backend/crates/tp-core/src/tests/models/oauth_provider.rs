use crate::OAuthProvider;

use std::str::FromStr;

#[test]
fn test_oauth_provider_as_str() {
    assert_eq!(OAuthProvider::Google.as_str(), "google");
    assert_eq!(OAuthProvider::Facebook.as_str(), "facebook");
}

#[test]
fn test_oauth_provider_from_str() {
    assert_eq!(
        OAuthProvider::from_str("google").unwrap(),
        OAuthProvider::Google
    );
    assert_eq!(
        OAuthProvider::from_str("Facebook").unwrap(),
        OAuthProvider::Facebook
    );
    assert!(OAuthProvider::from_str("github").is_err());
}

#[test]
fn test_oauth_provider_all_round_trips_through_display() {
    for provider in OAuthProvider::ALL {
        assert_eq!(
            OAuthProvider::from_str(&provider.to_string()).unwrap(),
            provider
        );
    }
}
