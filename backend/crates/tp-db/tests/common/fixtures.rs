use tp_core::{OAuthProvider, User};
use tp_db::OAuthProfile;

/// Local account with a placeholder hash (repository tests never verify it)
pub fn create_test_user(email: &str) -> User {
    User::new(
        email.to_string(),
        Some("Test Traveler".to_string()),
        "$2b$04$placeholderplaceholderplaceholderplaceholderpla".to_string(),
    )
}

pub fn create_test_profile(provider: OAuthProvider, subject: &str, email: &str) -> OAuthProfile {
    OAuthProfile {
        provider,
        subject: subject.to_string(),
        email: email.to_string(),
        name: Some("Oauth Traveler".to_string()),
        avatar_url: Some("https://example.com/avatar.png".to_string()),
    }
}
